//! Minimal Chroma HTTP client: collection lookup and nearest-neighbour query.

use crate::ProviderError;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_TENANT: &str = "default_tenant";
pub const DEFAULT_DATABASE: &str = "default_database";

#[derive(Clone)]
pub struct ChromaConfig {
    pub url: String,
    pub collection: String,
    pub tenant: String,
    pub database: String,
}

#[derive(Clone)]
pub struct ChromaClient {
    client: Client,
    cfg: ChromaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChromaCollection {
    pub id: String,
    pub name: String,
}

impl ChromaClient {
    pub fn new(cfg: ChromaConfig) -> Self {
        Self {
            client: Client::new(),
            cfg,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.cfg.collection
    }

    /// Collections live under `/api/v2/tenants/{tenant}/databases/{database}`.
    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.cfg.url.trim_end_matches('/'),
            self.cfg.tenant,
            self.cfg.database
        )
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.collections_url(), self.cfg.collection)
    }

    pub fn query_url(&self, collection_id: &str) -> String {
        format!("{}/{}/query", self.collections_url(), collection_id)
    }

    /// Resolves the configured collection name to its id.
    pub async fn get_collection(&self) -> Result<ChromaCollection, ProviderError> {
        let url = self.collection_url();
        let resp = self.client.get(&url).send().await.map_err(|e| {
            debug!(%url, error = %e, "chroma collection lookup failed");
            ProviderError::RequestFailed(e.to_string())
        })?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    pub async fn query(
        &self,
        collection: &ChromaCollection,
        embedding: Vec<f32>,
        n_results: usize,
    ) -> Result<ChromaQueryResponse, ProviderError> {
        #[derive(Serialize)]
        struct QueryRequest {
            query_embeddings: Vec<Vec<f32>>,
            n_results: usize,
            include: [&'static str; 3],
        }
        let body = QueryRequest {
            query_embeddings: vec![embedding],
            n_results,
            include: ["documents", "metadatas", "distances"],
        };
        let url = self.query_url(&collection.id);
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(%url, error = %e, "chroma query failed");
                ProviderError::RequestFailed(e.to_string())
            })?;
        let resp = check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

async fn check_status(resp: Response) -> Result<Response, ProviderError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
    debug!(%status, "chroma returned an error status");
    Err(ProviderError::RequestFailed(format!(
        "status {} body {:?}",
        status, body
    )))
}

/// Column-oriented query result; the outer list has one entry per query embedding.
#[derive(Debug, Default, Deserialize)]
pub struct ChromaQueryResponse {
    #[serde(default)]
    pub ids: Vec<Vec<String>>,
    #[serde(default)]
    pub documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Vec<Option<serde_json::Map<String, serde_json::Value>>>>>,
    #[serde(default)]
    pub distances: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChromaMatch {
    pub id: String,
    pub document: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub distance: f64,
}

impl ChromaQueryResponse {
    /// Flattens the first query's columns into rows, keeping Chroma's order.
    /// Every row needs a distance; a short distances column is rejected.
    pub fn into_matches(self) -> Result<Vec<ChromaMatch>, ProviderError> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents = self
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let mut metadatas = self
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default()
            .into_iter();
        let distances = self
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        if distances.len() < ids.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "{} ids but {} distances",
                ids.len(),
                distances.len()
            )));
        }

        Ok(ids
            .into_iter()
            .zip(distances)
            .map(|(id, distance)| ChromaMatch {
                id,
                document: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas.next().flatten().unwrap_or_default(),
                distance,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_query_columns_in_order() {
        let raw = serde_json::json!({
            "ids": [["a", "b"]],
            "documents": [["first chunk", null]],
            "metadatas": [[{"source": "data/pmay.pdf", "page": 2}, null]],
            "distances": [[0.12, 0.4]],
            "embeddings": null
        });
        let resp: ChromaQueryResponse = serde_json::from_value(raw).unwrap();
        let matches = resp.into_matches().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "a");
        assert_eq!(matches[0].document, "first chunk");
        assert_eq!(
            matches[0].metadata.get("source").and_then(|v| v.as_str()),
            Some("data/pmay.pdf")
        );
        assert!((matches[0].distance - 0.12).abs() < 1e-9);
        assert_eq!(matches[1].document, "");
        assert!(matches[1].metadata.is_empty());
    }

    #[test]
    fn empty_response_has_no_matches() {
        let resp: ChromaQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_matches().unwrap().is_empty());
    }

    #[test]
    fn missing_distances_are_rejected() {
        let raw = serde_json::json!({
            "ids": [["a", "b"]],
            "documents": [["first", "second"]],
            "distances": [[0.12]]
        });
        let resp: ChromaQueryResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            resp.into_matches(),
            Err(ProviderError::InvalidResponse(_))
        ));

        let resp: ChromaQueryResponse =
            serde_json::from_value(serde_json::json!({"ids": [["a"]]})).unwrap();
        assert!(resp.into_matches().is_err());
    }

    #[test]
    fn urls_use_tenant_and_database_paths() {
        let client = ChromaClient::new(ChromaConfig {
            url: "http://localhost:8000/".into(),
            collection: "langchain".into(),
            tenant: DEFAULT_TENANT.into(),
            database: DEFAULT_DATABASE.into(),
        });
        assert_eq!(
            client.collection_url(),
            "http://localhost:8000/api/v2/tenants/default_tenant/databases/default_database/collections/langchain"
        );
        assert_eq!(
            client.query_url("c0ffee"),
            "http://localhost:8000/api/v2/tenants/default_tenant/databases/default_database/collections/c0ffee/query"
        );
    }
}
