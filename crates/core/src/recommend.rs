//! Recommendation orchestrator: profile -> query -> retrieval -> per-chunk
//! extraction -> filtered, deduplicated scheme list.

use crate::config::RecommendConfig;
use crate::embeddings::embed_query;
use crate::error::SchemeError;
use crate::extraction::{self, ChunkOutcome, ExtractedScheme, SkipReason};
use crate::models::{Profile, RetrievedChunk, Scheme};
use crate::prompts::extraction_prompt;
use crate::query::{build_query, IncomeBuckets};
use crate::vectorstore::VectorStore;
use providers::{EmbeddingProvider, LlmProvider};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RecommendSettings {
    pub top_k: usize,
    /// Used when a chunk carries no `source` metadata.
    pub default_source: String,
    pub income_buckets: IncomeBuckets,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self::from(&RecommendConfig::default())
    }
}

impl From<&RecommendConfig> for RecommendSettings {
    fn from(cfg: &RecommendConfig) -> Self {
        Self {
            top_k: cfg.top_k,
            default_source: cfg.default_source.clone(),
            income_buckets: IncomeBuckets::new(cfg.income_buckets.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedChunk {
    /// 1-based position in the retrieval results.
    pub rank: usize,
    pub source: Option<String>,
    pub distance: f64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendation {
    pub query: String,
    pub retrieved: usize,
    pub schemes: Vec<Scheme>,
    pub skipped: Vec<SkippedChunk>,
}

pub struct Recommender {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    settings: RecommendSettings,
}

impl Recommender {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        settings: RecommendSettings,
    ) -> Self {
        Self {
            store,
            embedder,
            llm,
            settings,
        }
    }

    pub fn settings(&self) -> &RecommendSettings {
        &self.settings
    }

    pub async fn recommend(&self, profile: &Profile) -> Result<Vec<Scheme>, SchemeError> {
        Ok(self.recommend_with_report(profile).await?.schemes)
    }

    /// Like [`Recommender::recommend`], but also reports every skipped chunk.
    ///
    /// Model calls run one chunk at a time in retrieval order. Only embedding,
    /// store and model transport failures are returned as errors.
    pub async fn recommend_with_report(
        &self,
        profile: &Profile,
    ) -> Result<Recommendation, SchemeError> {
        let query = build_query(profile, &self.settings.income_buckets);
        let income = self.settings.income_buckets.normalize(&profile.income);

        let embedding = embed_query(self.embedder.as_ref(), &query).await?;
        let chunks = self
            .store
            .similarity_search(embedding, self.settings.top_k)
            .await?;
        info!(
            retrieved = chunks.len(),
            top_k = self.settings.top_k,
            "retrieved scheme chunks"
        );

        let mut report = Recommendation {
            query,
            retrieved: chunks.len(),
            ..Recommendation::default()
        };
        let mut seen_titles: HashSet<String> = HashSet::new();

        for (idx, chunk) in chunks.into_iter().enumerate() {
            let rank = idx + 1;
            let prompt = extraction_prompt(profile, income, &chunk.content);
            let response = self.llm.complete(&prompt).await?;

            let outcome = match extraction::interpret(&response.content) {
                ChunkOutcome::Accepted(s) if seen_titles.contains(&s.title) => {
                    ChunkOutcome::Skipped(SkipReason::DuplicateTitle(s.title))
                }
                other => other,
            };

            match outcome {
                ChunkOutcome::Accepted(extracted) => {
                    seen_titles.insert(extracted.title.clone());
                    let id = report.schemes.len() + 1;
                    debug!(rank, id, title = %extracted.title, "accepted scheme");
                    report.schemes.push(self.to_scheme(id, extracted, &chunk));
                }
                ChunkOutcome::Skipped(reason) => {
                    debug!(rank, %reason, "skipped chunk");
                    report.skipped.push(SkippedChunk {
                        rank,
                        source: chunk.source,
                        distance: chunk.distance,
                        reason,
                    });
                }
            }
        }

        info!(
            accepted = report.schemes.len(),
            skipped = report.skipped.len(),
            "recommendation complete"
        );
        Ok(report)
    }

    fn to_scheme(&self, id: usize, extracted: ExtractedScheme, chunk: &RetrievedChunk) -> Scheme {
        Scheme {
            id: Some(id),
            title: extracted.title,
            category: extracted.category,
            description: extracted.description,
            eligibility: extracted.eligibility,
            documents: extracted.documents,
            apply_link: extracted.apply_link,
            source: chunk
                .source
                .clone()
                .unwrap_or_else(|| self.settings.default_source.clone()),
            confidence: Some(extraction::confidence(chunk.distance)),
            why_recommended: Some(extracted.why_recommended.unwrap_or_default()),
        }
    }
}
