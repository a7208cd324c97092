pub mod error;
pub mod gemini;
pub mod util;

pub use error::{AiError, Result};
pub use gemini::{Gemini, GeminiPromptBuilder};
pub use util::{extract_json_object, parse_json_lenient, strip_code_blocks, truncate_chars};
