//! Post-processing of chat completions: SVG extraction, text cleanup, fallback templates,
//! and the final response payload.

pub mod assemble;
pub mod extract;
pub mod fallback;
pub mod sanitize;
pub mod topic;

pub use assemble::{
    assemble, assemble_error, assemble_unreadable, ensure_visualization, ErrorPayload,
    ResponsePayload, TurnMode, ERROR_APOLOGY,
};
pub use extract::{extract_visualization, ExtractedVisualization, Extraction, ExtractionPattern};
pub use fallback::{synthesize, template_for, FallbackSvg, FALLBACK_NOTICE, TROUBLE_GENERATING};
pub use sanitize::sanitize;
pub use topic::Topic;
