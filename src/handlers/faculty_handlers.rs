use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::csrf;
use crate::auth::session;
use crate::backend::{self, BackendClient, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::admin_handlers::{
    attendance_page, edit_attendance_record, student_table, AttendanceQuery, DeleteForm, StudentQuery,
};
use crate::handlers::fetch::{end_session, load_view, redirect, report_mutation};
use crate::models::attendance::AttendanceEditForm;
use crate::models::auth::Role;
use crate::models::charts::ChartSeries;
use crate::models::faculty::STREAMS;
use crate::models::student::{Student, StudentForm};
use crate::models::SelectOption;
use crate::paging::PageSize;
use crate::templates_structs::{FacultyOverviewTemplate, PageContext, StudentFormTemplate};

const STUDENTS_VIEW: &str = "faculty.students";

pub async fn overview(
    session: Session,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Faculty)?;
    let stats = load_view(&cache, &session, &who, "faculty.overview", "dashboard statistics",
        backend::faculty::stats(&client, &who.token)).await?.data;
    let trend = ChartSeries::from_trend(&stats.weekly_trend).bars(Some(100.0), "%");
    let ctx = PageContext::build(&session, &who, "/faculty");
    render(FacultyOverviewTemplate { ctx, stats, trend })
}

pub async fn students(
    session: Session,
    query: web::Query<StudentQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Faculty)?;
    let list = load_view(&cache, &session, &who, STUDENTS_VIEW, "students",
        backend::faculty::my_students(&client, &who.token)).await?.data;
    student_table(&session, &who, list, &query, **page_size, ("My Students", "/faculty/students", true))
}

pub async fn delete_student(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<DeleteForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Faculty)?;
    let result = backend::faculty::delete_student(&client, &who.token, path.into_inner()).await;
    report_mutation(&cache, &session, &who, "Student delete", result, |_| {
        "Student deleted successfully".to_string()
    })?;
    Ok(redirect("/faculty/students"))
}

// ---------- Register / edit ----------

/// Current list for the duplicate roll number check. A failed fetch falls
/// back to the cached list and leaves the final say to the backend.
async fn existing_students(
    client: &BackendClient,
    cache: &ViewCache,
    session: &Session,
    who: &session::Identity,
) -> Result<Vec<Student>, AppError> {
    match backend::faculty::my_students(client, &who.token).await {
        Ok(list) => Ok(list),
        Err(e) if e.is_unauthorized() => {
            end_session(cache, session, who);
            Err(AppError::SessionExpired)
        }
        Err(e) => {
            log::warn!("Roll number check skipped for user {}: {e}", who.user_key);
            Ok(cache.fallback(&who.user_key, STUDENTS_VIEW).unwrap_or_default())
        }
    }
}

fn student_form_page(
    session: &Session,
    who: &session::Identity,
    form: StudentForm,
    errors: Vec<String>,
    editing: Option<i64>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, who, "/faculty/students");
    let streams: Vec<String> = STREAMS.iter().map(|s| s.to_string()).collect();
    let stream_options = SelectOption::from_values("Select stream", &streams, &form.stream);
    let (form_action, form_title) = match editing {
        Some(id) => (format!("/faculty/students/{id}"), "Edit Student"),
        None => ("/faculty/students".to_string(), "Register Student"),
    };
    render(StudentFormTemplate { ctx, form_action, form_title, form, errors, stream_options })
}

pub async fn student_new(session: Session) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Faculty)?;
    student_form_page(&session, &who, StudentForm::default(), Vec::new(), None)
}

pub async fn student_create(
    session: Session,
    form: web::Form<StudentForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Faculty)?;
    let form = form.into_inner();
    let existing = existing_students(&client, &cache, &session, &who).await?;
    let body = match form.validate(&existing, None) {
        Ok(body) => body,
        Err(errors) => return student_form_page(&session, &who, form, errors, None),
    };
    let result = backend::faculty::register_student(&client, &who.token, &body).await;
    match report_mutation(&cache, &session, &who, "Student register", result, |s: &Student| {
        format!("Student {} registered successfully", s.full_name)
    })? {
        Some(_) => Ok(redirect("/faculty/students")),
        None => student_form_page(&session, &who, form, Vec::new(), None),
    }
}

pub async fn student_edit(
    session: Session,
    path: web::Path<i64>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Faculty)?;
    let id = path.into_inner();
    let list: Vec<Student> = load_view(&cache, &session, &who, STUDENTS_VIEW, "students",
        backend::faculty::my_students(&client, &who.token)).await?.data;
    let student = list.iter().find(|s| s.student_id == id).ok_or(AppError::NotFound)?;
    student_form_page(&session, &who, StudentForm::from_student(student), Vec::new(), Some(id))
}

pub async fn student_update(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<StudentForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Faculty)?;
    let id = path.into_inner();
    let form = form.into_inner();
    let existing = existing_students(&client, &cache, &session, &who).await?;
    let body = match form.validate(&existing, Some(id)) {
        Ok(body) => body,
        Err(errors) => return student_form_page(&session, &who, form, errors, Some(id)),
    };
    let result = backend::faculty::update_student(&client, &who.token, id, &body).await;
    match report_mutation(&cache, &session, &who, "Student update", result, |_| {
        "Student updated successfully".to_string()
    })? {
        Some(_) => Ok(redirect("/faculty/students")),
        None => student_form_page(&session, &who, form, Vec::new(), Some(id)),
    }
}

// ---------- Daily attendance ----------

pub async fn attendance(
    session: Session,
    query: web::Query<AttendanceQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Faculty)?;
    attendance_page(&session, &who, &client, &cache, query.into_inner(), **page_size, ("/faculty/attendance", false)).await
}

pub async fn edit_attendance(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<AttendanceEditForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Faculty)?;
    edit_attendance_record(&session, &who, (client.get_ref(), cache.get_ref()), path.into_inner(), &form, "/faculty/attendance").await
}
