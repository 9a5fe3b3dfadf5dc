//! Free-form questions answered from the same scheme store.

use crate::embeddings::embed_query;
use crate::error::SchemeError;
use crate::prompts::answer_prompt;
use crate::vectorstore::VectorStore;
use providers::{EmbeddingProvider, LlmProvider};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    /// Distinct chunk sources in retrieval order.
    pub sources: Vec<String>,
}

pub struct Assistant {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl Assistant {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            llm,
            top_k,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, SchemeError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SchemeError::EmptyQuestion);
        }

        let embedding = embed_query(self.embedder.as_ref(), question).await?;
        let chunks = self.store.similarity_search(embedding, self.top_k).await?;
        info!(retrieved = chunks.len(), "answering question");

        let contexts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let response = self.llm.complete(&answer_prompt(question, &contexts)).await?;

        let mut sources: Vec<String> = Vec::new();
        for source in chunks.iter().filter_map(|c| c.source.as_ref()) {
            if !sources.contains(source) {
                sources.push(source.clone());
            }
        }

        Ok(Answer {
            answer: response.content.trim().to_string(),
            sources,
        })
    }
}
