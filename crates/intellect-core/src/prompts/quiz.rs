//! Quiz generation prompt: multiple-choice questions as a bare JSON array.

/// Placeholders: `{question_count}` and `{document_text}`.
pub const QUIZ_USER_TEMPLATE: &str = r#"Based on the following document text, generate a multiple-choice quiz with exactly {question_count} questions. Each question should have 4 options (A, B, C, D) and only one correct answer.

You MUST format the output as a valid JSON array of objects, where each object has the following structure:
{ "question": "The question text", "options": { "A": "Option A", "B": "Option B", "C": "Option C", "D": "Option D" }, "correctAnswer": "A", "explanation": "Brief explanation of why this is the correct answer" }

IMPORTANT RULES:
1. The output MUST be valid JSON
2. Do NOT include any introductory text, explanations, or markdown formatting
3. Do NOT wrap the JSON in code blocks or backticks
4. The response should start with '[' and end with ']'
5. Each question must have exactly 4 options labeled A, B, C, D
6. The correctAnswer must be one of: "A", "B", "C", or "D"
7. Questions should be clear, diverse, and directly based on the document content
8. Include a brief explanation for each correct answer

Here is the document text:

{document_text}"#;

pub fn quiz_user_prompt(document_text: &str, question_count: u32) -> String {
    QUIZ_USER_TEMPLATE
        .replace("{question_count}", &question_count.to_string())
        .replace("{document_text}", document_text)
}
