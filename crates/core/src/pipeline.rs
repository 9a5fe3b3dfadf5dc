//! Wiring from [`AppConfig`] to ready-to-use services. This is the only place
//! that reads credentials from the process environment.

use crate::ask::Assistant;
use crate::config::AppConfig;
use crate::error::SchemeError;
use crate::recommend::{RecommendSettings, Recommender};
use crate::vectorstore::{ChromaStore, NoopVectorStore, VectorStore};
use providers::chroma::{ChromaClient, ChromaConfig};
use providers::noop::NoopProvider;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use providers::ProviderRegistry;
use std::sync::Arc;
use tracing::{info, warn};

pub const LLM_PROVIDER: &str = "chat";

pub fn build_registry(config: &AppConfig) -> Result<ProviderRegistry, SchemeError> {
    build_registry_with(config, |key| std::env::var(key).ok())
}

/// Same as [`build_registry`] with an explicit environment lookup.
pub fn build_registry_with(
    config: &AppConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ProviderRegistry, SchemeError> {
    let mut reg = ProviderRegistry::new().with_embedding("noop", Arc::new(NoopProvider));

    if config.embeddings.provider == "openai" {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: credential(&env, &config.embeddings.api_key_env)?,
            base_url: config.embeddings.base_url.clone(),
            embedding_model: config.embeddings.model.clone(),
            chat_model: config.llm.model.clone(),
            temperature: None,
        });
        reg = reg.with_embedding("openai", Arc::new(provider));
    }

    let chat = OpenAiProvider::new(OpenAiConfig {
        api_key: credential(&env, &config.llm.api_key_env)?,
        base_url: config.llm.base_url.clone(),
        embedding_model: config.embeddings.model.clone(),
        chat_model: config.llm.model.clone(),
        temperature: Some(config.llm.temperature),
    });
    info!(model = chat.chat_model(), "chat model configured");
    reg = reg.with_llm(LLM_PROVIDER, Arc::new(chat));

    Ok(reg
        .set_preferred_embedding(&config.embeddings.provider)
        .set_preferred_llm(LLM_PROVIDER))
}

/// An empty variable name means the endpoint needs no key.
fn credential(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, SchemeError> {
    if key.is_empty() {
        return Ok(String::new());
    }
    env(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SchemeError::MissingCredential(key.to_string()))
}

pub fn build_vector_store(config: &AppConfig) -> Arc<dyn VectorStore> {
    let url = match &config.vectors.url {
        Some(url) => url.clone(),
        None => {
            warn!("vector store url not configured, retrieval will return nothing");
            return Arc::new(NoopVectorStore);
        }
    };
    match config.vectors.provider.as_str() {
        "chroma" => {
            info!(
                url = %url,
                collection = %config.vectors.collection,
                tenant = %config.vectors.tenant,
                database = %config.vectors.database,
                path = %config.vectors.path,
                "using chroma vector store"
            );
            Arc::new(ChromaStore::new(ChromaClient::new(ChromaConfig {
                url,
                collection: config.vectors.collection.clone(),
                tenant: config.vectors.tenant.clone(),
                database: config.vectors.database.clone(),
            })))
        }
        other => {
            warn!(provider = other, "unknown vector store provider, using noop store");
            Arc::new(NoopVectorStore)
        }
    }
}

pub fn build_recommender(config: &AppConfig) -> Result<Recommender, SchemeError> {
    let registry = build_registry(config)?;
    Ok(Recommender::new(
        build_vector_store(config),
        registry.embedding(None)?,
        registry.llm(None)?,
        RecommendSettings::from(&config.recommend),
    ))
}

pub fn build_assistant(config: &AppConfig) -> Result<Assistant, SchemeError> {
    let registry = build_registry(config)?;
    Ok(Assistant::new(
        build_vector_store(config),
        registry.embedding(None)?,
        registry.llm(None)?,
        config.ask.top_k,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_chat_key_is_fatal() {
        let cfg = AppConfig::default();
        match build_registry_with(&cfg, env(&[("OPENAI_API_KEY", "sk-test")])) {
            Err(SchemeError::MissingCredential(var)) => assert_eq!(var, "GROQ_API_KEY"),
            other => panic!("unexpected: {:?}", other.err()),
        }
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = AppConfig::default();
        let result = build_registry_with(
            &cfg,
            env(&[("OPENAI_API_KEY", "sk-test"), ("GROQ_API_KEY", "  ")]),
        );
        assert!(matches!(result, Err(SchemeError::MissingCredential(_))));
    }

    #[test]
    fn registers_configured_providers() {
        let cfg = AppConfig::default();
        let reg = build_registry_with(
            &cfg,
            env(&[("OPENAI_API_KEY", "sk-test"), ("GROQ_API_KEY", "gsk-test")]),
        )
        .unwrap();
        assert!(reg.embedding(None).is_ok());
        assert!(reg.llm(None).is_ok());
        assert!(reg.embedding(Some("noop")).is_ok());
    }

    #[test]
    fn keyless_local_endpoints_are_allowed() {
        let mut cfg = AppConfig::default();
        cfg.embeddings.provider = "noop".into();
        cfg.llm.api_key_env = String::new();
        let reg = build_registry_with(&cfg, env(&[])).unwrap();
        assert_eq!(reg.preferred_embedding.as_deref(), Some("noop"));
        assert!(reg.llm(None).is_ok());
    }
}
