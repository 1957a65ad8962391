pub mod anthropic;
pub mod openai;

use std::sync::Arc;

pub use anthropic::AnthropicChat;
pub use openai::OpenAiChat;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::tools::TripLookupTool;

/// Builds the completion backend named by `llm.provider`. The trip lookup
/// tool is attached to the agent only when enabled in config.
pub fn build_llm(
    config: &LlmConfig,
    tool: Option<TripLookupTool>,
) -> Result<Arc<dyn LlmService>, DomainError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiChat::from_config(config, tool))),
        "anthropic" => Ok(Arc::new(AnthropicChat::from_config(config, tool))),
        other => Err(DomainError::validation(format!(
            "unknown llm provider: {other}"
        ))),
    }
}
