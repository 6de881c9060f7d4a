use super::{BackendClient, BackendError, MessageResponse};
use crate::models::dashboard::FacultyDashboardStats;
use crate::models::student::{Student, StudentDraft};

/// The backend pages this list server-side; ask for everything and page
/// locally.
const FETCH_LIMIT: &str = "1000";

pub async fn stats(client: &BackendClient, token: &str) -> Result<FacultyDashboardStats, BackendError> {
    client.get_json(token, "/api/faculty/stats", &[]).await
}

pub async fn my_students(client: &BackendClient, token: &str) -> Result<Vec<Student>, BackendError> {
    client.get_json(token, "/api/faculty/students", &[("limit", FETCH_LIMIT.to_string())]).await
}

pub async fn register_student(client: &BackendClient, token: &str, body: &StudentDraft) -> Result<Student, BackendError> {
    client.post_form(token, "/api/faculty/students/register", body).await
}

pub async fn update_student(
    client: &BackendClient,
    token: &str,
    student_id: i64,
    body: &StudentDraft,
) -> Result<Student, BackendError> {
    client.put_json(token, &format!("/api/faculty/students/{student_id}"), body).await
}

pub async fn delete_student(client: &BackendClient, token: &str, student_id: i64) -> Result<MessageResponse, BackendError> {
    client.delete_json(token, &format!("/api/faculty/students/{student_id}")).await
}
