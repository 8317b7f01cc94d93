use thiserror::Error;

/// Failures from the key-value store adapter.
///
/// The store is assumed to be available in the extension runtime, so callers
/// log these and carry on with default values.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage call for `{key}` was rejected: {message}")]
    Backend { key: String, message: String },

    #[error("could not convert value for `{key}`: {message}")]
    Codec { key: String, message: String },
}

impl StoreError {
    pub fn backend(key: &str, message: impl Into<String>) -> Self {
        StoreError::Backend {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn codec(key: &str, message: impl Into<String>) -> Self {
        StoreError::Codec {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
