use super::{BackendClient, BackendError, MessageResponse};
use crate::models::auth::{LoginRequest, TokenResponse};

pub async fn login(client: &BackendClient, email: &str, password: &str) -> Result<TokenResponse, BackendError> {
    let body = LoginRequest { email: email.trim().to_string(), password: password.to_string() };
    client.post_json(None, "/auth/login", &body).await
}

/// Invalidates the token server-side.
pub async fn logout(client: &BackendClient, token: &str) -> Result<MessageResponse, BackendError> {
    client.post_empty(token, "/auth/logout").await
}
