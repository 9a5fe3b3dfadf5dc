use crate::error::SchemeError;
use providers::EmbeddingProvider;

/// Embeds a single query text. A missing or zero-length vector is an error.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<Vec<f32>, SchemeError> {
    let resp = provider.embed(&[text.to_string()]).await?;
    resp.vectors
        .into_iter()
        .next()
        .filter(|v| !v.is_empty())
        .ok_or(SchemeError::EmptyEmbedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use providers::noop::NoopProvider;
    use providers::{EmbedResponse, ProviderError};

    struct Fixed(Vec<Vec<f32>>);

    #[async_trait::async_trait]
    impl EmbeddingProvider for Fixed {
        async fn embed(&self, _texts: &[String]) -> Result<EmbedResponse, ProviderError> {
            Ok(EmbedResponse {
                vectors: self.0.clone(),
            })
        }
    }

    #[tokio::test]
    async fn zero_length_vector_is_rejected() {
        let err = embed_query(&NoopProvider, "farmer").await.unwrap_err();
        assert!(matches!(err, SchemeError::EmptyEmbedding));
    }

    #[tokio::test]
    async fn first_vector_is_returned() {
        let provider = Fixed(vec![vec![0.5, 0.25], vec![1.0]]);
        assert_eq!(embed_query(&provider, "farmer").await.unwrap(), vec![0.5, 0.25]);
        let err = embed_query(&Fixed(vec![]), "farmer").await.unwrap_err();
        assert!(matches!(err, SchemeError::EmptyEmbedding));
    }
}
