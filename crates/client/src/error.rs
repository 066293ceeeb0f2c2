use cliplet_http::StatusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authentication required: {0}")]
    AuthRequired(String),

    #[error("no credits left")]
    NoCredits,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("a login prompt is already pending")]
    GateBusy,
}

impl Error {
    pub(crate) fn from_http(e: cliplet_http::Error) -> Self {
        match e.downcast::<StatusError>() {
            Ok(status) => Self::from_status(*status),
            Err(e) => Error::Http(e),
        }
    }

    fn from_status(e: StatusError) -> Self {
        let message = detail_message(&e.body);
        match e.status {
            401 => Error::AuthRequired(message),
            402 => Error::NoCredits,
            status => Error::Api { status, message },
        }
    }
}

/// Non-2xx bodies are `{"detail": "..."}`; fall back to the raw body when
/// they are not.
fn detail_message(body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: String,
    }

    match serde_json::from_slice::<Detail>(body) {
        Ok(d) => d.detail,
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}
