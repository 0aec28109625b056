//! Direct SVG generation prompt: the model must answer with SVG markup only.

/// System instruction for the SVG model.
pub const SVG_SYSTEM: &str = r#"You are an expert at creating interactive SVG visualizations.
Your task is to generate a visually appealing, interactive SVG based on the user's prompt.

Guidelines:
- Create an SVG that is 600px wide and 400px tall
- Use vibrant colors and clear visual elements
- Include interactive elements with hover effects where appropriate
- Make sure the SVG is well-structured and valid
- Include data-label attributes for interactive elements
- The SVG should be educational and help visualize the concept
- ONLY return the SVG code, no markdown, no explanations

The SVG should start with: <svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
and end with: </svg>"#;

/// User prompt template: placeholder is replaced with the caller's prompt.
pub const SVG_USER_TEMPLATE: &str = r#"Generate an interactive and cool looking SVG visualization for: "{prompt}"

IMPORTANT: Your response must ONLY contain the SVG code, no markdown, no explanations, no additional text. Just the raw SVG code starting with <svg and ending with </svg>."#;

pub fn svg_user_prompt(prompt: &str) -> String {
    SVG_USER_TEMPLATE.replace("{prompt}", prompt)
}
