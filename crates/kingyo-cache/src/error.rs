use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode value for cache key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cached value for key {key} has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
