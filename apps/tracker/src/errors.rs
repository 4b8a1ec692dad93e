use serde::Deserialize;
use thiserror::Error;

/// Failure to obtain a usable response from the jobs backend.
///
/// Both variants are recoverable: the poller records them on the handle and
/// tries again on the next tick. A job that reports `failed` is not an error
/// and never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response was received (offline, timeout, DNS, connection reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but had a non-success status or a body we could not parse.
    #[error("Protocol error (status {status}): {message}")]
    Protocol { status: u16, message: String },
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    /// HTTP status of the offending response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport(_) => None,
            FetchError::Protocol { status, .. } => Some(*status),
        }
    }

    /// Builds a protocol error from a non-2xx response body.
    /// Prefers the backend's `detail`/`error`/`message` field over the raw body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("empty response body with status {status}")
                } else {
                    trimmed.to_string()
                }
            });
        FetchError::Protocol { status, message }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Protocol {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None if e.is_decode() => FetchError::Protocol {
                status: 200,
                message: format!("unparsable response body: {e}"),
            },
            None => FetchError::Transport(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.detail, self.error, self.message]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::Null => None,
                serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_detail_is_preferred() {
        let err = FetchError::from_error_body(404, r#"{"detail": "Job not found"}"#);
        assert_eq!(
            err,
            FetchError::Protocol {
                status: 404,
                message: "Job not found".to_string()
            }
        );
    }

    #[test]
    fn test_error_body_falls_back_to_raw_text() {
        let err = FetchError::from_error_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_error_body_structured_detail_is_serialized() {
        let err = FetchError::from_error_body(422, r#"{"detail": [{"loc": ["file"]}]}"#);
        match err {
            FetchError::Protocol { message, .. } => assert!(message.contains("loc")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_gets_placeholder_message() {
        let err = FetchError::from_error_body(500, "   ");
        assert!(err.to_string().contains("empty response body"));
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = FetchError::Transport("connection refused".to_string());
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }
}
