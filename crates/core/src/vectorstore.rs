use crate::error::SchemeError;
use crate::models::RetrievedChunk;
use providers::chroma::ChromaClient;
use serde_json::Value;
use tracing::debug;

/// Similarity search over stored scheme chunks.
///
/// Results are ordered by increasing distance, best match first.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    async fn similarity_search(
        &self,
        embedding: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, SchemeError>;
}

/// Store that never returns anything.
pub struct NoopVectorStore;

#[async_trait::async_trait]
impl VectorStore for NoopVectorStore {
    async fn similarity_search(
        &self,
        _embedding: Vec<f32>,
        _k: usize,
    ) -> Result<Vec<RetrievedChunk>, SchemeError> {
        Ok(Vec::new())
    }
}

pub struct ChromaStore {
    client: ChromaClient,
}

impl ChromaStore {
    pub fn new(client: ChromaClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl VectorStore for ChromaStore {
    async fn similarity_search(
        &self,
        embedding: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, SchemeError> {
        // Collection ids change when the store is rebuilt, so resolve per call.
        let collection = self.client.get_collection().await?;
        debug!(collection = %collection.name, id = %collection.id, "opened chroma collection");
        let resp = self.client.query(&collection, embedding, k).await?;
        Ok(resp
            .into_matches()?
            .into_iter()
            .map(|m| RetrievedChunk {
                content: m.document,
                source: m.metadata.get("source").and_then(source_text),
                distance: m.distance,
            })
            .collect())
    }
}

fn source_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_text_accepts_strings_and_numbers() {
        assert_eq!(source_text(&json!("data/a.pdf")).as_deref(), Some("data/a.pdf"));
        assert_eq!(source_text(&json!(7)).as_deref(), Some("7"));
        assert_eq!(source_text(&json!(null)), None);
    }

    #[tokio::test]
    async fn noop_store_returns_nothing() {
        let hits = NoopVectorStore.similarity_search(vec![1.0], 10).await.unwrap();
        assert!(hits.is_empty());
    }
}
