use thiserror::Error;

/// Failure of a single remote provider call. The display form is what ends up
/// in the HTTP error body, so it carries the upstream message unaltered.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Request(String),
    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} response is missing `{field}`")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },
    #[error("expected an embedding of dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProviderError::Request(format!("request timed out: {}", err));
        }
        ProviderError::Request(err.to_string())
    }
}
