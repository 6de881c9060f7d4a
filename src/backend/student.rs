use super::client::unwrap_envelope;
use super::{BackendClient, BackendError};
use crate::models::attendance::{StudentAttendanceRecord, StudentRecordsPayload};
use crate::models::calendar::{CalendarMonth, MonthCursor};
use crate::models::dashboard::StudentDashboard;
use crate::models::leave::{LeaveRequest, NewLeaveRequest};
use crate::models::ApiEnvelope;

const FETCH_LIMIT: &str = "1000";

pub async fn dashboard(client: &BackendClient, token: &str) -> Result<StudentDashboard, BackendError> {
    let envelope: ApiEnvelope<StudentDashboard> = client.get_json(token, "/api/student/dashboard/stats", &[]).await?;
    unwrap_envelope(envelope)
}

pub async fn attendance_records(client: &BackendClient, token: &str) -> Result<Vec<StudentAttendanceRecord>, BackendError> {
    let envelope: ApiEnvelope<StudentRecordsPayload> = client
        .get_json(token, "/api/student/attendance/records", &[("limit", FETCH_LIMIT.to_string())])
        .await?;
    unwrap_envelope(envelope).map(|payload| payload.records)
}

pub async fn calendar(client: &BackendClient, token: &str, cursor: MonthCursor) -> Result<CalendarMonth, BackendError> {
    let endpoint = format!("/api/student/attendance/calendar/{}/{}", cursor.year, cursor.month);
    let envelope: ApiEnvelope<CalendarMonth> = client.get_json(token, &endpoint, &[]).await?;
    unwrap_envelope(envelope)
}

pub async fn leave_requests(client: &BackendClient, token: &str) -> Result<Vec<LeaveRequest>, BackendError> {
    let envelope: ApiEnvelope<Vec<LeaveRequest>> = client.get_json(token, "/api/student/leave-requests", &[]).await?;
    unwrap_envelope(envelope)
}

pub async fn submit_leave(client: &BackendClient, token: &str, body: &NewLeaveRequest) -> Result<String, BackendError> {
    let envelope: ApiEnvelope<serde_json::Value> =
        client.post_json(Some(token), "/api/student/leave-requests", body).await?;
    ack(envelope, "Leave request submitted successfully!")
}

pub async fn cancel_leave(client: &BackendClient, token: &str, id: i64) -> Result<String, BackendError> {
    let envelope: ApiEnvelope<serde_json::Value> =
        client.post_empty(token, &format!("/api/student/leave-requests/{id}/cancel")).await?;
    ack(envelope, "Leave request cancelled successfully!")
}

/// Envelope acknowledgements may omit `data`; only `success` matters.
fn ack(envelope: ApiEnvelope<serde_json::Value>, default: &str) -> Result<String, BackendError> {
    if envelope.success {
        Ok(envelope.message.unwrap_or_else(|| default.to_string()))
    } else {
        Err(BackendError::Rejected(envelope.message.unwrap_or_else(|| "Request was not successful".to_string())))
    }
}
