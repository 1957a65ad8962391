use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::anthropic;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::tools::TripLookupTool;

/// Anthropic chat completion backend, selectable via `llm.provider`.
pub struct AnthropicChat {
    client: anthropic::Client,
    model: String,
    temperature: f64,
    tool: Option<TripLookupTool>,
}

impl AnthropicChat {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: anthropic::Client::from_env(),
            model: model.into(),
            temperature: 0.0,
            tool: None,
        }
    }

    pub fn from_config(config: &LlmConfig, tool: Option<TripLookupTool>) -> Self {
        Self {
            client: anthropic::Client::from_env(),
            model: config.model.clone(),
            temperature: config.temperature,
            tool,
        }
    }
}

#[async_trait]
impl LlmService for AnthropicChat {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let builder = self
            .client
            .agent(&self.model)
            .preamble(system)
            .temperature(self.temperature);

        let agent = if let Some(tool) = &self.tool {
            builder.tool(tool.clone()).build()
        } else {
            builder.build()
        };

        agent
            .prompt(prompt)
            .await
            .map_err(|e| DomainError::external(e.to_string()))
    }
}
