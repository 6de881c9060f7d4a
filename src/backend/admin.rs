use chrono::NaiveDate;

use super::{BackendClient, BackendError, MessageResponse};
use crate::models::attendance::{AttendanceStats, AttendanceUpdate, BulkAttendance, DailyAttendance};
use crate::models::dashboard::AdminDashboardStats;
use crate::models::faculty::{Faculty, FacultyUpdate, NewFaculty};
use crate::models::student::Student;

pub async fn dashboard_stats(client: &BackendClient, token: &str) -> Result<AdminDashboardStats, BackendError> {
    client.get_json(token, "/api/admin/dashboard-stats", &[]).await
}

pub async fn list_faculty(client: &BackendClient, token: &str) -> Result<Vec<Faculty>, BackendError> {
    client.get_json(token, "/api/admin/faculty", &[]).await
}

pub async fn create_faculty(client: &BackendClient, token: &str, body: &NewFaculty) -> Result<Faculty, BackendError> {
    client.post_json(Some(token), "/api/admin/faculty", body).await
}

pub async fn update_faculty(
    client: &BackendClient,
    token: &str,
    id: i64,
    body: &FacultyUpdate,
) -> Result<Faculty, BackendError> {
    client.put_json(token, &format!("/api/admin/faculty/{id}"), body).await
}

pub async fn delete_faculty(client: &BackendClient, token: &str, id: i64) -> Result<MessageResponse, BackendError> {
    client.delete_json(token, &format!("/api/admin/faculty/{id}")).await
}

pub async fn list_students(client: &BackendClient, token: &str) -> Result<Vec<Student>, BackendError> {
    client.get_json(token, "/api/admin/students", &[]).await
}

pub async fn daily_attendance(
    client: &BackendClient,
    token: &str,
    date: NaiveDate,
) -> Result<Vec<DailyAttendance>, BackendError> {
    client.get_json(token, "/api/admin/attendance/daily", &[("date", date.to_string())]).await
}

pub async fn attendance_stats(client: &BackendClient, token: &str, date: NaiveDate) -> Result<AttendanceStats, BackendError> {
    client.get_json(token, "/api/admin/attendance/stats", &[("date", date.to_string())]).await
}

pub async fn mark_attendance(
    client: &BackendClient,
    token: &str,
    body: &BulkAttendance,
) -> Result<MessageResponse, BackendError> {
    client.post_json(Some(token), "/api/admin/attendance/mark", body).await
}

/// Change the status of one existing record.
pub async fn update_attendance(
    client: &BackendClient,
    token: &str,
    id: i64,
    body: &AttendanceUpdate,
) -> Result<MessageResponse, BackendError> {
    client.put_json(token, &format!("/api/admin/attendance/{id}"), body).await
}
