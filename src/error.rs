//! Client error taxonomy
//!
//! Every failure is surfaced at the action that triggered it, so the
//! variants carry display-ready messages and are cheap to clone across
//! the actor channels.

/// Errors produced by comment operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    #[error("{0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// A local precondition failed; nothing was sent
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Build a backend error from a status and the raw response body.
    ///
    /// The `error` field of a JSON body wins; otherwise the status line is used.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<crate::models::ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status_line(status));
        ClientError::Backend {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let msg = if e.is_timeout() {
            "Request timed out".to_string()
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else if e.is_decode() {
            format!("Invalid response body: {}", e)
        } else {
            format!("Request failed: {}", e)
        };
        ClientError::Network(msg)
    }
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_backend_message_from_json_body() {
        let err = ClientError::from_response(StatusCode::FORBIDDEN, r#"{"error":"action forbidden"}"#);
        assert_eq!(
            err,
            ClientError::Backend { status: 403, message: "action forbidden".into() }
        );
        assert_eq!(err.to_string(), "action forbidden");
    }

    #[test]
    fn test_status_line_fallback() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert_eq!(err.to_string(), "502 Bad Gateway");

        let err = ClientError::from_response(StatusCode::NOT_FOUND, r#"{"detail":"nope"}"#);
        assert_eq!(err.to_string(), "404 Not Found");
    }
}
