use thiserror::Error;

/// Errors raised at the edges of the mapper: decoding input bytes and
/// unwrapping backend response envelopes.
///
/// Path resolution, mapping and chart extraction never produce these.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected response code: {0}")]
    Status(String),

    #[error("malformed response envelope: {0}")]
    Envelope(&'static str),
}

pub type Result<T> = std::result::Result<T, MapperError>;
