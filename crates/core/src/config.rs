use crate::error::SchemeError;
use providers::chroma::{DEFAULT_DATABASE, DEFAULT_TENANT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embeddings: EmbeddingConfig,
    pub vectors: VectorConfig,
    pub llm: LlmConfig,
    pub recommend: RecommendConfig,
    pub ask: AskConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub provider: String,
    pub url: Option<String>,
    pub collection: String,
    pub tenant: String,
    pub database: String,
    /// Persist directory served by the vector database.
    pub path: String,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            provider: "chroma".to_string(),
            url: Some("http://localhost:8000".to_string()),
            collection: "langchain".to_string(),
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            path: "chroma".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.2,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBucket {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub top_k: usize,
    pub default_source: String,
    pub income_buckets: Vec<IncomeBucket>,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            default_source: "Government Portal".to_string(),
            income_buckets: default_income_buckets(),
        }
    }
}

pub fn default_income_buckets() -> Vec<IncomeBucket> {
    [
        ("Below 2.5 Lakh", "<250000"),
        ("2.5L-5L", "250000-500000"),
        ("5L-10L", "500000-1000000"),
        ("Above 10L", ">1000000"),
    ]
    .into_iter()
    .map(|(label, value)| IncomeBucket {
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    pub top_k: usize,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

pub fn load(path: Option<&str>) -> Result<AppConfig, SchemeError> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(config::Environment::with_prefix("SCHEMES").separator("__"));
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_extended_pipeline() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.recommend.top_k, 10);
        assert_eq!(cfg.recommend.default_source, "Government Portal");
        assert_eq!(cfg.llm.model, "llama-3.1-8b-instant");
        assert_eq!(cfg.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(cfg.vectors.path, "chroma");
        assert_eq!(cfg.vectors.tenant, "default_tenant");
        assert_eq!(cfg.vectors.database, "default_database");
        assert_eq!(cfg.recommend.income_buckets.len(), 4);
    }

    #[test]
    fn load_merges_file_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemes.toml");
        std::fs::write(
            &path,
            r#"
            [recommend]
            top_k = 6
            default_source = ""

            [llm]
            model = "llama-3.3-70b-versatile"
            "#,
        )
        .unwrap();
        let cfg = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.recommend.top_k, 6);
        assert_eq!(cfg.recommend.default_source, "");
        assert_eq!(cfg.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.llm.temperature, 0.2);
        assert_eq!(cfg.recommend.income_buckets, default_income_buckets());
        assert_eq!(cfg.vectors.collection, "langchain");
        assert_eq!(cfg.vectors.database, "default_database");
    }
}
