//! Shared test infrastructure: record fixtures and a stub REST backend.
//!
//! # Stub backend
//! - `spawn_backend(routes)` - actix-web server on an ephemeral port serving
//!   the given routes; returns its base URL and a stop handle.

#![allow(dead_code)]

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use serde_json::{json, Value};

use attendance_dashboards::models::attendance::StudentAttendanceRecord;
use attendance_dashboards::models::faculty::Faculty;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_EMAIL: &str = "admin@school.edu";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_TOKEN: &str = "test-token-123";

// ============================================================================
// FIXTURES
// ============================================================================

/// `count` faculty members; the first `active` of them are ACTIVE, the rest
/// alternate between ON_LEAVE and INACTIVE.
pub fn faculty_json(count: usize, active: usize) -> Value {
    let list: Vec<Value> = (1..=count)
        .map(|i| {
            let status = if i <= active {
                "ACTIVE"
            } else if i % 2 == 0 {
                "ON_LEAVE"
            } else {
                "INACTIVE"
            };
            json!({
                "id": i,
                "full_name": format!("Teacher {i:02}"),
                "email": format!("teacher{i}@school.edu"),
                "employee_id": format!("EMP{i:03}"),
                "stream": "Science",
                "status": status,
                "is_active": status == "ACTIVE",
                "assigned_classes": [format!("{}-A", 8 + i % 3), {"class_name": "Lab"}],
            })
        })
        .collect();
    Value::Array(list)
}

pub fn faculty(count: usize, active: usize) -> Vec<Faculty> {
    serde_json::from_value(faculty_json(count, active)).expect("faculty fixture")
}

pub fn record(date: &str, status: &str, remarks: Option<&str>) -> StudentAttendanceRecord {
    serde_json::from_value(json!({
        "date": date,
        "formatted_date": date,
        "day_name": "Monday",
        "status": status,
        "remarks": remarks,
    }))
    .expect("record fixture")
}

pub fn token_json(role: &str) -> Value {
    json!({
        "access_token": TEST_TOKEN,
        "token_type": "bearer",
        "role": role,
        "redirect_to": "/",
        "user_id": 7,
        "institute_id": "INST001",
    })
}

// ============================================================================
// STUB BACKEND
// ============================================================================

pub struct StubBackend {
    pub url: String,
    handle: ServerHandle,
}

impl StubBackend {
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Serve `routes` on 127.0.0.1 with an OS-assigned port.
pub fn spawn_backend(routes: fn(&mut web::ServiceConfig)) -> StubBackend {
    let server = HttpServer::new(move || App::new().configure(routes))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub backend");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    StubBackend { url: format!("http://{addr}"), handle }
}

/// True when the request carries the test bearer token.
pub fn authorized(req: &actix_web::HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}
