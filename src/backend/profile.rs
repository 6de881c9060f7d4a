use super::client::unwrap_envelope;
use super::{BackendClient, BackendError, MessageResponse};
use crate::models::profile::{EmailUpdate, PasswordChange, UserProfile};
use crate::models::ApiEnvelope;

pub async fn get(client: &BackendClient, token: &str) -> Result<UserProfile, BackendError> {
    let envelope: ApiEnvelope<UserProfile> = client.get_json(token, "/users/profile", &[]).await?;
    unwrap_envelope(envelope)
}

pub async fn update_email(client: &BackendClient, token: &str, body: &EmailUpdate) -> Result<MessageResponse, BackendError> {
    client.put_json(token, "/users/profile/email", body).await
}

pub async fn change_password(
    client: &BackendClient,
    token: &str,
    body: &PasswordChange,
) -> Result<MessageResponse, BackendError> {
    client.post_json(Some(token), "/users/profile/change-password", body).await
}
