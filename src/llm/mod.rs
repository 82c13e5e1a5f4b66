pub mod openai;
mod utils;

pub use openai::{OpenAiConfig, OpenAiPlanner};
pub use utils::extract_json_object;
