use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned by the Wallet Objects API.
///
/// Google wraps the details in an `{"error": {...}}` envelope; responses from
/// other endpoints (such as the OAuth token endpoint) may use the bare form,
/// so both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceError {
    pub code: i32,
    pub message: String,
    pub status: Option<String>,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "code={}", self.code)
        } else {
            write!(f, "code={}, message={}", self.code, self.message)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ResourceError,
}

impl ResourceError {
    /// Parses an error body, falling back to the raw text when it is not one
    /// of the known JSON shapes.
    pub(crate) fn from_body(status: u16, body: &[u8]) -> Self {
        let mut err = serde_json::from_slice::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .or_else(|_| serde_json::from_slice::<ResourceError>(body))
            .unwrap_or_else(|_| ResourceError {
                code: status as i32,
                message: String::from_utf8_lossy(body).to_string(),
                status: None,
            });
        if err.code == 0 {
            err.code = status as i32;
        }
        if err.message.is_empty() {
            err.message = String::from_utf8_lossy(body).to_string();
        }
        err
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("wallet api error: {0}")]
    Api(ResourceError),
}
