use serde::Deserialize;
use std::path::Path;

use crate::domain::DomainError;

/// Runtime settings plus prompt texts, loaded from two YAML files so the
/// prompts can be tuned without touching operational config.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, DomainError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.yaml".into());
        let prompts_path =
            std::env::var("PROMPTS_PATH").unwrap_or_else(|_| "config/prompts.yaml".into());

        Ok(Self {
            config: Config::from_file(config_path)?,
            prompts: PromptsConfig::from_file(prompts_path)?,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub rerank: RerankConfig,
    #[serde(default)]
    pub toxicity: ToxicityConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::internal(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        serde_yaml::from_str(&raw)
            .map_err(|e| DomainError::validation(format!("invalid config: {e}")))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            rerank: RerankConfig::default(),
            toxicity: ToxicityConfig::default(),
            retrieval: RetrievalConfig::default(),
            vector_store: VectorStoreConfig::default(),
            sessions: SessionsConfig::default(),
            data: DataConfig::default(),
            tools: ToolsConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            timeout_seconds: default_llm_timeout(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankConfig {
    #[serde(default = "default_rerank_api_base")]
    pub api_base: String,
    #[serde(default = "default_rerank_model")]
    pub model: String,
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_rerank_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            api_base: default_rerank_api_base(),
            model: default_rerank_model(),
            timeout_ms: default_provider_timeout_ms(),
            api_key_env: default_rerank_key_env(),
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToxicityConfig {
    #[serde(default = "default_toxicity_api_base")]
    pub api_base: String,
    #[serde(default = "default_toxicity_model")]
    pub model: String,
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_toxicity_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_toxicity_threshold")]
    pub threshold: f32,
}

impl Default for ToxicityConfig {
    fn default() -> Self {
        Self {
            api_base: default_toxicity_api_base(),
            model: default_toxicity_model(),
            timeout_ms: default_provider_timeout_ms(),
            api_key_env: default_toxicity_key_env(),
            threshold: default_toxicity_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Candidates fetched from each collection per query.
    #[serde(default = "default_per_collection")]
    pub per_collection: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            per_collection: default_per_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_vector_backend")]
    pub backend: String,
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,
    #[serde(default = "default_faq_collection")]
    pub faq_collection: String,
    #[serde(default = "default_trip_collection")]
    pub trip_collection: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: default_vector_backend(),
            qdrant_url: default_qdrant_url(),
            faq_collection: default_faq_collection(),
            trip_collection: default_trip_collection(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_sessions_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            backend: default_sessions_backend(),
            redis_url: default_redis_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_faq_path")]
    pub faq_path: String,
    #[serde(default = "default_trips_path")]
    pub trips_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            faq_path: default_faq_path(),
            trips_path: default_trips_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub trip_lookup: TripLookupToolConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripLookupToolConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_trip_tool_name")]
    pub name: String,
    #[serde(default = "default_trip_tool_description")]
    pub description: String,
}

impl Default for TripLookupToolConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: default_trip_tool_name(),
            description: default_trip_tool_description(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    pub system_template: String,
    pub safety_message: String,
}

impl PromptsConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DomainError::internal(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;
        serde_yaml::from_str(&raw)
            .map_err(|e| DomainError::validation(format!("invalid prompts file: {e}")))
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system_template: "You are a helpful travel assistant.\n\
                Use the following context to answer the user's question.\n\
                If the context does not provide enough information, say so.\n\n\
                Context:\n{context}\n\n\
                Top FAQ matches:\n{faq_preview}\n\n\
                Top trip matches:\n{trip_preview}\n"
                .to_string(),
            safety_message: "I can only help with respectful conversations. \
                Please rephrase your message and I will gladly assist with your travel plans."
                .to_string(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_llm_provider() -> String {
    "openai".into()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".into()
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_rerank_api_base() -> String {
    "https://api.jina.ai/v1/rerank".into()
}

fn default_rerank_model() -> String {
    "mixedbread-ai/mxbai-rerank-xsmall-v1".into()
}

fn default_provider_timeout_ms() -> u64 {
    10_000
}

fn default_rerank_key_env() -> String {
    "RERANK_API_KEY".into()
}

fn default_top_k() -> usize {
    5
}

fn default_min_score() -> f32 {
    0.5
}

fn default_toxicity_api_base() -> String {
    "https://api-inference.huggingface.co/models".into()
}

fn default_toxicity_model() -> String {
    "textdetox/xlmr-large-toxicity-classifier".into()
}

fn default_toxicity_key_env() -> String {
    "HF_API_TOKEN".into()
}

fn default_toxicity_threshold() -> f32 {
    0.8
}

fn default_per_collection() -> usize {
    5
}

fn default_vector_backend() -> String {
    "memory".into()
}

fn default_qdrant_url() -> String {
    "http://localhost:6334".into()
}

fn default_faq_collection() -> String {
    "travel-company-faq".into()
}

fn default_trip_collection() -> String {
    "travel-company-trips".into()
}

fn default_sessions_backend() -> String {
    "memory".into()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".into()
}

fn default_faq_path() -> String {
    "data/faq.json".into()
}

fn default_trips_path() -> String {
    "data/trips_data.json".into()
}

fn default_trip_tool_name() -> String {
    "fetch_trip_details".into()
}

fn default_trip_tool_description() -> String {
    "Search the trip catalog by exact criteria. At least one argument is required: \
     country, city, start_date (YYYY-MM-DD), trip_id, count_of_days, cost, \
     extra_activities, or trip_details. Returns matching trips or an error."
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.rerank.top_k, 5);
        assert_eq!(config.toxicity.threshold, 0.8);
        assert!(!config.tools.trip_lookup.enabled);
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config: Config = serde_yaml::from_str(
            "llm:\n  model: gpt-4o\nrerank:\n  min_score: 0.35\nvector_store:\n  backend: qdrant\n",
        )
        .unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert!((config.rerank.min_score - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.vector_store.backend, "qdrant");
        // Untouched sections keep defaults.
        assert_eq!(config.retrieval.per_collection, 5);
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("no_such_section: {}\n");
        assert!(result.is_err());
    }
}
