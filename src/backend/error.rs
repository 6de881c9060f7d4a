//! Errors raised while talking to the REST backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection refused, timeout, TLS failure and the like.
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The bearer token was rejected (401/403). The session must be dropped.
    #[error("Session expired: {0}")]
    Unauthorized(String),

    /// Any other non-success status. `message` is the backend's `detail`
    /// when it sent one.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// A success status with a body that does not match the expected shape.
    #[error("Unexpected response from backend: {0}")]
    Decode(#[from] serde_json::Error),

    /// An envelope response with `"success": false`.
    #[error("{0}")]
    Rejected(String),
}

impl BackendError {
    pub async fn from_response(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .unwrap_or_default();
        let message = detail_message(&body).unwrap_or_else(|| format!("Request failed with status {status}"));

        if status == 401 || status == 403 {
            BackendError::Unauthorized(message)
        } else {
            BackendError::Http { status, message }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized(_))
    }

    /// Text fit for a flash message.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Transport(_) => "The server could not be reached".to_string(),
            BackendError::Decode(_) => "The server sent an unexpected response".to_string(),
            BackendError::Unauthorized(_) => "Session expired. Please login again.".to_string(),
            BackendError::Http { message, .. } | BackendError::Rejected(message) => message.clone(),
        }
    }
}

/// Pull a human-readable message out of an error body. The backend answers
/// `{"detail": "..."}`, validation failures carry a list of
/// `{"msg": "..."}` under `detail`, and enveloped endpoints use `message`.
pub fn detail_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => return Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }
    value.get("message").and_then(|m| m.as_str()).map(str::to_string)
}
