use serde_json::Value;

use crate::lending::ReviewError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not reach the loan backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("loan backend answered {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Api { status: u16, message: Option<String> },
    #[error("unexpected payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Text suitable for the user: the backend's own message when it sent
    /// one, the caller's fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Review(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Pull the `message` field out of an error body, if it has a usable one.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::{LoanStatus, ReviewAction};

    #[test]
    fn message_comes_from_the_body_when_present() {
        assert_eq!(
            extract_message(br#"{"message":"Username already taken","status":409}"#),
            Some("Username already taken".to_string())
        );
        assert_eq!(extract_message(br#"{"message":"   "}"#), None);
        assert_eq!(extract_message(br#"{"error":"Bad Request"}"#), None);
        assert_eq!(extract_message(b"<html>502</html>"), None);
    }

    #[test]
    fn user_message_falls_back() {
        let with_message = ClientError::Api {
            status: 400,
            message: Some("Loan already reviewed".to_string()),
        };
        let without = ClientError::Api {
            status: 500,
            message: None,
        };

        assert_eq!(
            with_message.user_message("Failed to load loan queue."),
            "Loan already reviewed"
        );
        assert_eq!(
            without.user_message("Failed to load loan queue."),
            "Failed to load loan queue."
        );
        assert_eq!(without.to_string(), "loan backend answered 500");
    }

    #[test]
    fn review_guard_explains_itself() {
        let err = ClientError::from(
            LoanStatus::Approved
                .review(ReviewAction::Reject)
                .expect_err("approved loans are final"),
        );
        assert!(err.user_message("fallback").contains("SUBMITTED"));
        assert_eq!(err.status(), None);
    }
}
