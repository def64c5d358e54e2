//! Error handling for the backend module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure: connection refused, TLS, timeouts.
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The backend rejected the request (constraint violation, permission denial).
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// A remote procedure succeeded at the transport level but reported an error.
    #[error("{0}")]
    Procedure(String),
}

impl BackendError {
    /// Builds an `Http` error from a non-success response, preferring the
    /// backend's own `message`/`msg`/`error_description` field when the body is JSON.
    pub async fn from_response(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        BackendError::Http {
            status,
            message: Self::extract_message(&body),
        }
    }

    fn extract_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.to_string())
    }

    /// HTTP status for backend rejections, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_prefers_backend_fields() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#;
        assert_eq!(
            BackendError::extract_message(body),
            "duplicate key value violates unique constraint"
        );
        assert_eq!(
            BackendError::extract_message(r#"{"msg":"User not allowed"}"#),
            "User not allowed"
        );
        assert_eq!(BackendError::extract_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_rejection_displays_raw_message() {
        let error = BackendError::Http {
            status: 403,
            message: "permission denied for table ai_api_keys".to_string(),
        };
        assert_eq!(error.to_string(), "permission denied for table ai_api_keys");
        assert_eq!(error.status(), Some(403));
        assert_eq!(BackendError::Procedure("x".into()).status(), None);
    }
}
