use super::{BackendClient, BackendError};
use crate::models::dashboard::{LabelledCounts, SuperAdminStats};
use crate::models::institute::{
    Institute, InstituteChanged, InstituteDetail, InstituteRegistered, InstituteUpdate, NewInstitute,
    ToggleInstituteResponse,
};
use crate::models::platform_user::{NewUser, PlatformUser, ResetPasswordResponse, ToggleUserResponse, UserRegistered};

pub async fn dashboard_stats(client: &BackendClient, token: &str) -> Result<SuperAdminStats, BackendError> {
    client.get_json(token, "/api/super-admin/dashboard-stats", &[]).await
}

/// `months` is clamped to the 1..=36 range the backend accepts.
pub async fn monthly_registrations(client: &BackendClient, token: &str, months: u32) -> Result<LabelledCounts, BackendError> {
    let months = months.clamp(1, 36);
    client
        .get_json(token, "/api/super-admin/monthly-registrations", &[("months", months.to_string())])
        .await
}

pub async fn subscription_distribution(client: &BackendClient, token: &str) -> Result<LabelledCounts, BackendError> {
    client.get_json(token, "/api/super-admin/subscription-distribution", &[]).await
}

/// `days` is clamped to the 7..=365 range the backend accepts.
pub async fn institute_usage(client: &BackendClient, token: &str, days: u32) -> Result<LabelledCounts, BackendError> {
    let days = days.clamp(7, 365);
    client
        .get_json(token, "/api/super-admin/institute-usage", &[("days", days.to_string())])
        .await
}

pub async fn institutes(client: &BackendClient, token: &str) -> Result<Vec<Institute>, BackendError> {
    client.get_json(token, "/api/super-admin/institutes", &[]).await
}

pub async fn toggle_institute(client: &BackendClient, token: &str, institute_id: &str) -> Result<ToggleInstituteResponse, BackendError> {
    client
        .post_empty(token, &format!("/api/super-admin/institutes/{institute_id}/toggle-status"))
        .await
}

pub async fn institute(client: &BackendClient, token: &str, institute_id: &str) -> Result<InstituteDetail, BackendError> {
    client.get_json(token, &format!("/institutes/{institute_id}"), &[]).await
}

/// Creates the institute and its admin account.
pub async fn register_institute(
    client: &BackendClient,
    token: &str,
    body: &NewInstitute,
) -> Result<InstituteRegistered, BackendError> {
    client.post_json(Some(token), "/institutes/register", body).await
}

pub async fn update_institute(
    client: &BackendClient,
    token: &str,
    institute_id: &str,
    body: &InstituteUpdate,
) -> Result<InstituteChanged, BackendError> {
    client.put_json(token, &format!("/institutes/{institute_id}"), body).await
}

/// Soft delete: the institute and all of its users are deactivated.
pub async fn deactivate_institute(
    client: &BackendClient,
    token: &str,
    institute_id: &str,
) -> Result<InstituteChanged, BackendError> {
    client.delete_json(token, &format!("/institutes/{institute_id}")).await
}

pub async fn register_user(client: &BackendClient, token: &str, body: &NewUser) -> Result<UserRegistered, BackendError> {
    client.post_json(Some(token), "/users/register", body).await
}

pub async fn users(client: &BackendClient, token: &str) -> Result<Vec<PlatformUser>, BackendError> {
    client.get_json(token, "/api/super-admin/users", &[]).await
}

pub async fn toggle_user(client: &BackendClient, token: &str, user_id: i64) -> Result<ToggleUserResponse, BackendError> {
    client.post_empty(token, &format!("/api/super-admin/users/{user_id}/toggle-status")).await
}

pub async fn reset_password(client: &BackendClient, token: &str, user_id: i64) -> Result<ResetPasswordResponse, BackendError> {
    client.post_empty(token, &format!("/api/super-admin/users/{user_id}/reset-password")).await
}
