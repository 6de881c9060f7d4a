//! Request-level tests: the full app (session, CSRF, auth middleware,
//! handlers, templates) in front of a stub backend.

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpRequest, HttpResponse};
use regex::Regex;
use serde_json::json;

use attendance_dashboards::auth::rate_limit::LoginThrottle;
use attendance_dashboards::backend::{BackendClient, ViewCache};
use attendance_dashboards::paging::PageSize;
use common::*;

async fn login(body: web::Json<serde_json::Value>) -> HttpResponse {
    let role = match body["email"].as_str() {
        Some("student@school.edu") => "STUDENT",
        Some("faculty@school.edu") => "FACULTY",
        Some("root@school.edu") => "SUPER_ADMIN",
        _ => "ADMIN",
    };
    if body["password"] == TEST_PASSWORD {
        HttpResponse::Ok().json(token_json(role))
    } else {
        HttpResponse::Unauthorized().json(json!({"detail": "Invalid email or password"}))
    }
}

async fn faculty_list(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(faculty_json(23, 12))
}

async fn students_down() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(json!({"detail": "Maintenance"}))
}

async fn stats_expired() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"detail": "Token expired"}))
}

async fn my_students() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {"student_id": 1, "roll_no": "R-1", "full_name": "Asha", "standard": "10-A", "status": "ACTIVE", "is_active": true}
    ]))
}

/// Only answers form-encoded bodies, like the real registration endpoint.
async fn register_student(form: web::Form<HashMap<String, String>>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "student_id": 2,
        "roll_no": form.get("roll_no"),
        "full_name": form.get("full_name"),
        "standard": form.get("standard"),
        "status": "ACTIVE",
        "is_active": true,
    }))
}

static ATTENDANCE_EDITS: AtomicUsize = AtomicUsize::new(0);

async fn update_attendance(path: web::Path<i64>, body: web::Json<serde_json::Value>) -> HttpResponse {
    if *path == 31 && body["status"] == "HALF_DAY" && body["recorded_by"] == "7" {
        ATTENDANCE_EDITS.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().json(json!({"message": "Attendance updated"}))
    } else {
        HttpResponse::UnprocessableEntity().json(json!({"detail": "Unexpected update"}))
    }
}

async fn institute_usage(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let days: f64 = query.get("days").and_then(|d| d.parse().ok()).unwrap_or(0.0);
    HttpResponse::Ok().json(json!({"labels": ["Green Valley"], "values": [days]}))
}

static CALENDAR_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Answers the first request, then fails.
async fn calendar_once(path: web::Path<(i32, u32)>) -> HttpResponse {
    if CALENDAR_CALLS.fetch_add(1, Ordering::SeqCst) > 0 {
        return HttpResponse::InternalServerError().json(json!({"detail": "Calendar service down"}));
    }
    let (year, month) = path.into_inner();
    HttpResponse::Ok().json(json!({
        "success": true,
        "data": {"year": year, "month": month, "month_name": "March 2025", "calendar_data": []},
    }))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(login))
        .route("/api/admin/faculty", web::get().to(faculty_list))
        .route("/api/admin/students", web::get().to(students_down))
        .route("/api/admin/dashboard-stats", web::get().to(stats_expired))
        .route("/api/admin/attendance/{id}", web::put().to(update_attendance))
        .route("/api/faculty/students", web::get().to(my_students))
        .route("/api/faculty/students/register", web::post().to(register_student))
        .route("/api/super-admin/institute-usage", web::get().to(institute_usage))
        .route("/api/student/attendance/calendar/{year}/{month}", web::get().to(calendar_once));
}

fn session_cookie(resp: &ServiceResponse) -> Option<Cookie<'static>> {
    resp.response().cookies().find(|c| c.name() == "id").map(|c| c.into_owned())
}

fn csrf_token(html: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]+)""#).unwrap();
    re.captures(html).expect("csrf field").get(1).unwrap().as_str().to_string()
}

macro_rules! app {
    ($backend_url:expr) => {
        test::init_service(
            App::new()
                .wrap(SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build())
                .app_data(web::Data::new(BackendClient::new($backend_url, Duration::from_secs(5)).unwrap()))
                .app_data(web::Data::new(ViewCache::new()))
                .app_data(web::Data::new(LoginThrottle::default()))
                .app_data(web::Data::new(PageSize::new(10)))
                .configure(attendance_dashboards::configure),
        )
        .await
    };
}

macro_rules! sign_in {
    ($app:expr, $email:expr, $password:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&resp).expect("session cookie on login page");
        let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        let token = csrf_token(&html);
        let form = [("email", $email), ("password", $password), ("csrf_token", token.as_str())];
        let req = test::TestRequest::post().uri("/login").cookie(cookie.clone()).set_form(form).to_request();
        let resp = test::call_service(&$app, req).await;
        let cookie = session_cookie(&resp).unwrap_or(cookie);
        (resp, cookie)
    }};
}

macro_rules! get_page {
    ($app:expr, $uri:expr, $cookie:expr) => {{
        let req = test::TestRequest::get().uri($uri).cookie($cookie.clone()).to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", $uri);
        let cookie = session_cookie(&resp).unwrap_or_else(|| $cookie.clone());
        (String::from_utf8(test::read_body(resp).await.to_vec()).unwrap(), cookie)
    }};
}

#[actix_web::test]
async fn test_protected_pages_redirect_to_login() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/admin/faculty").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
    stub.stop().await;
}

#[actix_web::test]
async fn test_login_redirects_to_role_dashboard() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);

    let (resp, _) = sign_in!(app, ADMIN_EMAIL, TEST_PASSWORD);
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/admin");
    stub.stop().await;
}

#[actix_web::test]
async fn test_bad_password_rerenders_login() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);

    let (resp, _) = sign_in!(app, ADMIN_EMAIL, "nope");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Invalid email or password"));
    stub.stop().await;
}

#[actix_web::test]
async fn test_login_without_csrf_is_forbidden() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);

    let form = [("email", ADMIN_EMAIL), ("password", TEST_PASSWORD), ("csrf_token", "forged")];
    let req = test::TestRequest::post().uri("/login").set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    stub.stop().await;
}

#[actix_web::test]
async fn test_faculty_table_pages_with_filter() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (_, cookie) = sign_in!(app, ADMIN_EMAIL, TEST_PASSWORD);

    let req = test::TestRequest::get()
        .uri("/admin/faculty?status=ACTIVE&page=2")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(html.contains("Showing 11-12 of 12 faculty members"));
    assert!(html.contains("Teacher 11"));
    assert!(html.contains("Teacher 12"));
    assert!(!html.contains("Teacher 10<"));
    let rows = Regex::new(r#"<td><span class="avatar small">"#).unwrap();
    assert_eq!(rows.find_iter(&html).count(), 2);
    stub.stop().await;
}

#[actix_web::test]
async fn test_other_roles_dashboard_is_forbidden() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (resp, cookie) = sign_in!(app, "student@school.edu", TEST_PASSWORD);
    assert_eq!(resp.headers().get("Location").unwrap(), "/student");

    let req = test::TestRequest::get().uri("/admin/faculty").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    stub.stop().await;
}

#[actix_web::test]
async fn test_backend_failure_renders_empty_table_with_toast() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (_, cookie) = sign_in!(app, ADMIN_EMAIL, TEST_PASSWORD);

    let req = test::TestRequest::get().uri("/admin/students").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Error loading students"));
    assert!(html.contains("No students found"));
    stub.stop().await;
}

#[actix_web::test]
async fn test_rejected_token_ends_session() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (_, cookie) = sign_in!(app, ADMIN_EMAIL, TEST_PASSWORD);

    let req = test::TestRequest::get().uri("/admin").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");

    // The renewed cookie no longer holds a token.
    let cookie = session_cookie(&resp).expect("session cookie rewritten");
    let req = test::TestRequest::get().uri("/admin/faculty").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    stub.stop().await;
}

#[actix_web::test]
async fn test_faculty_registers_student_with_duplicate_check() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (resp, cookie) = sign_in!(app, "faculty@school.edu", TEST_PASSWORD);
    assert_eq!(resp.headers().get("Location").unwrap(), "/faculty");

    let (html, cookie) = get_page!(app, "/faculty/students/new", cookie);
    let token = csrf_token(&html);
    let fields = |roll_no: &'static str| {
        [
            ("full_name", "Meera Das"),
            ("roll_no", roll_no),
            ("standard", "10-A"),
            ("stream", "Science"),
            ("email", "meera@school.edu"),
            ("phone", "9876543210"),
            ("csrf_token", token.as_str()),
        ]
    };

    let req = test::TestRequest::post().uri("/faculty/students").cookie(cookie.clone()).set_form(fields("R-1")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Roll number R-1 already exists in class 10-A"));

    let req = test::TestRequest::post().uri("/faculty/students").cookie(cookie.clone()).set_form(fields("R-2")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/faculty/students");
    let cookie = session_cookie(&resp).unwrap_or(cookie);

    let (html, _) = get_page!(app, "/faculty/students", cookie);
    assert!(html.contains("Student Meera Das registered successfully"));
    assert!(html.contains("/faculty/students/1/edit"));
    stub.stop().await;
}

#[actix_web::test]
async fn test_admin_edits_attendance_status() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (_, cookie) = sign_in!(app, ADMIN_EMAIL, TEST_PASSWORD);
    let (html, cookie) = get_page!(app, "/admin/faculty", cookie);
    let token = csrf_token(&html);

    let form = [("status", "half_day"), ("date", "2025-03-10"), ("csrf_token", token.as_str())];
    let req = test::TestRequest::post().uri("/admin/attendance/31/edit").cookie(cookie.clone()).set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("Location").unwrap(), "/admin/attendance?date=2025-03-10");
    assert_eq!(ATTENDANCE_EDITS.load(Ordering::SeqCst), 1);

    // LEAVE is not an editable status; nothing reaches the backend.
    let form = [("status", "LEAVE"), ("date", "2025-03-10"), ("csrf_token", token.as_str())];
    let req = test::TestRequest::post().uri("/admin/attendance/31/edit").cookie(cookie).set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(ATTENDANCE_EDITS.load(Ordering::SeqCst), 1);
    stub.stop().await;
}

#[actix_web::test]
async fn test_usage_chart_clamps_day_window() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (resp, cookie) = sign_in!(app, "root@school.edu", TEST_PASSWORD);
    assert_eq!(resp.headers().get("Location").unwrap(), "/super-admin");

    let (html, _) = get_page!(app, "/super-admin?days=3", cookie);
    assert!(html.contains("Institute usage"));
    assert!(html.contains(r#"title="Green Valley: 7""#));
    stub.stop().await;
}

#[actix_web::test]
async fn test_calendar_fallback_is_kept_per_month() {
    let stub = spawn_backend(routes);
    let app = app!(&stub.url);
    let (_, cookie) = sign_in!(app, "student@school.edu", TEST_PASSWORD);

    let (html, cookie) = get_page!(app, "/student/calendar?year=2025&month=3", cookie);
    assert!(!html.contains("Error loading calendar"));

    // Same month again: the backend fails, the cached month is shown.
    let (html, cookie) = get_page!(app, "/student/calendar?year=2025&month=3", cookie);
    assert!(html.contains("Error loading calendar"));
    assert!(!html.contains("offline view"));

    // Another month has nothing cached and gets the local grid.
    let (html, _) = get_page!(app, "/student/calendar?year=2025&month=2", cookie);
    assert!(html.contains("Error loading calendar, showing an offline view"));
    stub.stop().await;
}
