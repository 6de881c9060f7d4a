use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::auth::session::{self, FlashKind};
use crate::backend::{self, BackendClient, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::fetch::{is_blank, list_view, load_variant, load_view, redirect, report_mutation};
use crate::models::attendance::{self, AttendanceEditForm, DailyAttendanceFilter, DailyAttendanceRow, MarkAttendanceForm};
use crate::models::auth::Role;
use crate::models::charts::{average, ChartSeries};
use crate::models::faculty::{self, Faculty, FacultyFilter, FacultyForm, FacultyRow, FacultyStats};
use crate::models::student::{self, StudentFilter, StudentRow, StudentStats};
use crate::models::SelectOption;
use crate::paging::PageSize;
use crate::templates_structs::{
    AdminOverviewTemplate, AttendanceTemplate, FacultyFormTemplate, FacultyListTemplate, PageContext,
    PaginationView, StudentListTemplate,
};

const FACULTY_VIEW: &str = "admin.faculty";

pub async fn overview(
    session: Session,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    let stats = load_view(&cache, &session, &who, "admin.overview", "dashboard statistics",
        backend::admin::dashboard_stats(&client, &who.token)).await?.data;

    let series = ChartSeries::from_trend(&stats.weekly_trend);
    let weekly_average = average(&series.values);
    let trend = series.bars(Some(100.0), "%");
    let ctx = PageContext::build(&session, &who, "/admin");
    render(AdminOverviewTemplate { ctx, stats, trend, weekly_average })
}

// ---------- Faculty ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FacultyQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

pub async fn faculty_list(
    session: Session,
    query: web::Query<FacultyQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    let list = load_view(&cache, &session, &who, FACULTY_VIEW, "faculty",
        backend::admin::list_faculty(&client, &who.token)).await?.data;

    let filter = FacultyFilter::new(&query.search, &query.status);
    let view = list_view(list, filter, query.page, **page_size);
    let stats = FacultyStats::from_list(view.items());
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "faculty members", "/admin/faculty", &*query);
    let rows = paged.rows.into_iter().map(FacultyRow::from).collect();

    let ctx = PageContext::build(&session, &who, "/admin/faculty");
    render(FacultyListTemplate {
        ctx,
        stats,
        rows,
        pagination,
        search: query.search.clone(),
        status_options: SelectOption::with_all("All Status", faculty::STATUSES, &query.status),
    })
}

fn faculty_form_page(
    session: &Session,
    who: &session::Identity,
    form: FacultyForm,
    errors: Vec<String>,
    editing: Option<i64>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, who, "/admin/faculty");
    let streams: Vec<String> = faculty::STREAMS.iter().map(|s| s.to_string()).collect();
    let stream_options = SelectOption::from_values("Select stream", &streams, &form.stream);
    let status_options = SelectOption::with_all("Unchanged", faculty::STATUSES, &form.status);
    let (form_action, form_title) = match editing {
        Some(id) => (format!("/admin/faculty/{id}"), "Edit Faculty"),
        None => ("/admin/faculty".to_string(), "Add Faculty"),
    };
    render(FacultyFormTemplate {
        ctx,
        form_action,
        form_title,
        form,
        errors,
        stream_options,
        status_options,
        editing: editing.is_some(),
    })
}

pub async fn faculty_new(session: Session) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    let form = FacultyForm { status: "ACTIVE".to_string(), ..Default::default() };
    faculty_form_page(&session, &who, form, Vec::new(), None)
}

pub async fn faculty_create(
    session: Session,
    form: web::Form<FacultyForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Admin)?;
    let form = form.into_inner();
    let body = match form.validate_create() {
        Ok(body) => body,
        Err(errors) => return faculty_form_page(&session, &who, form, errors, None),
    };
    let result = backend::admin::create_faculty(&client, &who.token, &body).await;
    match report_mutation(&cache, &session, &who, "Faculty create", result, |f: &Faculty| {
        format!("Faculty member {} added successfully", f.full_name)
    })? {
        Some(_) => Ok(redirect("/admin/faculty")),
        None => faculty_form_page(&session, &who, form, Vec::new(), None),
    }
}

pub async fn faculty_edit(
    session: Session,
    path: web::Path<i64>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    let id = path.into_inner();
    let list: Vec<Faculty> = load_view(&cache, &session, &who, FACULTY_VIEW, "faculty",
        backend::admin::list_faculty(&client, &who.token)).await?.data;
    let member = list.iter().find(|f| f.id == id).ok_or(AppError::NotFound)?;
    faculty_form_page(&session, &who, FacultyForm::from_faculty(member), Vec::new(), Some(id))
}

pub async fn faculty_update(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<FacultyForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Admin)?;
    let id = path.into_inner();
    let form = form.into_inner();
    let body = match form.validate_update() {
        Ok(body) => body,
        Err(errors) => return faculty_form_page(&session, &who, form, errors, Some(id)),
    };
    let result = backend::admin::update_faculty(&client, &who.token, id, &body).await;
    match report_mutation(&cache, &session, &who, "Faculty update", result, |_| {
        "Faculty member updated successfully".to_string()
    })? {
        Some(_) => Ok(redirect("/admin/faculty")),
        None => faculty_form_page(&session, &who, form, Vec::new(), Some(id)),
    }
}

#[derive(Deserialize)]
pub struct DeleteForm {
    pub csrf_token: String,
}

pub async fn faculty_delete(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<DeleteForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Admin)?;
    let result = backend::admin::delete_faculty(&client, &who.token, path.into_inner()).await;
    report_mutation(&cache, &session, &who, "Faculty delete", result, |_| {
        "Faculty member deleted successfully".to_string()
    })?;
    Ok(redirect("/admin/faculty"))
}

// ---------- Students ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StudentQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, rename = "class", skip_serializing_if = "is_blank")]
    pub class_name: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

/// Renders the student table for either the admin or the faculty dashboard.
pub(crate) fn student_table(
    session: &Session,
    who: &session::Identity,
    list: Vec<student::Student>,
    query: &StudentQuery,
    page_size: PageSize,
    (heading, base_path, can_manage): (&'static str, &'static str, bool),
) -> Result<HttpResponse, AppError> {
    let classes = student::distinct_classes(&list);
    let filter = StudentFilter::new(&query.search, &query.class_name, &query.status);
    let view = list_view(list, filter, query.page, page_size);
    let stats = StudentStats::from_list(view.items());
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "students", base_path, query);
    let rows = paged.rows.into_iter().map(StudentRow::from).collect();

    let ctx = PageContext::build(session, who, base_path);
    render(StudentListTemplate {
        ctx,
        heading,
        base_path,
        stats,
        rows,
        pagination,
        search: query.search.clone(),
        class_options: SelectOption::from_values("All Classes", &classes, &query.class_name),
        status_options: SelectOption::with_all("All Status", student::STATUSES, &query.status),
        can_manage,
    })
}

pub async fn students(
    session: Session,
    query: web::Query<StudentQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    let list = load_view(&cache, &session, &who, "admin.students", "students",
        backend::admin::list_students(&client, &who.token)).await?.data;
    student_table(&session, &who, list, &query, **page_size, ("Students", "/admin/students", false))
}

// ---------- Daily attendance ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AttendanceQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub date: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, rename = "class", skip_serializing_if = "is_blank")]
    pub class_name: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

/// The `date` parameter, or today when it is missing or malformed.
fn attendance_date(session: &Session, raw: &str) -> NaiveDate {
    let today = Local::now().date_naive();
    if is_blank(raw) {
        return today;
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").unwrap_or_else(|_| {
        session::set_flash(session, FlashKind::Error, format!("Invalid date '{raw}', showing today"));
        today
    })
}

/// Daily attendance table for the admin and faculty dashboards. Only the
/// admin page offers the "mark" control; both can edit a record's status.
pub(crate) async fn attendance_page(
    session: &Session,
    who: &session::Identity,
    client: &BackendClient,
    cache: &ViewCache,
    mut query: AttendanceQuery,
    page_size: PageSize,
    (base_path, can_mark): (&'static str, bool),
) -> Result<HttpResponse, AppError> {
    let date = attendance_date(session, &query.date);
    query.date = date.format("%Y-%m-%d").to_string();
    let role = who.role.as_str().to_ascii_lowercase();
    let records_view = format!("{role}.attendance");
    let stats_view = format!("{role}.attendance-stats");

    let (records, stats) = tokio::join!(
        load_variant(cache, session, who, (records_view.as_str(), query.date.as_str()), "attendance records",
            backend::admin::daily_attendance(client, &who.token, date)),
        load_variant(cache, session, who, (stats_view.as_str(), query.date.as_str()), "attendance statistics",
            backend::admin::attendance_stats(client, &who.token, date)),
    );
    let records = records?.data;
    let stats = stats?.data;

    let mut classes: Vec<String> = records.iter().filter_map(|r| r.class_name.clone()).collect();
    classes.sort();
    classes.dedup();

    let filter = DailyAttendanceFilter::new(&query.search, &query.status, &query.class_name);
    let view = list_view(records, filter, query.page, page_size);
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "records", base_path, &query);
    let rows = paged.rows.into_iter().map(DailyAttendanceRow::from).collect();

    let ctx = PageContext::build(session, who, base_path);
    render(AttendanceTemplate {
        ctx,
        base_path,
        stats,
        rows,
        pagination,
        search: query.search.clone(),
        status_options: SelectOption::with_all("All Status", attendance::STATUSES, &query.status),
        class_options: SelectOption::from_values("All Classes", &classes, &query.class_name),
        mark_options: SelectOption::with_all("Mark as...", attendance::STATUSES, ""),
        can_mark,
        date: query.date,
    })
}

pub async fn attendance(
    session: Session,
    query: web::Query<AttendanceQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Admin)?;
    attendance_page(&session, &who, &client, &cache, query.into_inner(), **page_size, ("/admin/attendance", true)).await
}

/// `PUT` a new status for record `id`, then return to the same date.
pub(crate) async fn edit_attendance_record(
    session: &Session,
    who: &session::Identity,
    (client, cache): (&BackendClient, &ViewCache),
    id: i64,
    form: &AttendanceEditForm,
    base_path: &str,
) -> Result<HttpResponse, AppError> {
    let back = if is_blank(&form.date) {
        base_path.to_string()
    } else {
        format!("{base_path}?date={}", form.date.trim())
    };
    let body = match form.validate(&who.user_key) {
        Ok(body) => body,
        Err(msg) => {
            session::set_flash(session, FlashKind::Error, msg);
            return Ok(redirect(&back));
        }
    };
    let result = backend::admin::update_attendance(client, &who.token, id, &body).await;
    report_mutation(cache, session, who, "Attendance update", result, |_| {
        "Attendance updated successfully".to_string()
    })?;
    Ok(redirect(&back))
}

pub async fn edit_attendance(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<AttendanceEditForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Admin)?;
    edit_attendance_record(&session, &who, (client.get_ref(), cache.get_ref()), path.into_inner(), &form, "/admin/attendance").await
}

pub async fn mark_attendance(
    session: Session,
    form: web::Form<MarkAttendanceForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Admin)?;
    let back = format!("/admin/attendance?date={}", form.date.trim());
    let body = match form.validate() {
        Ok(body) => body,
        Err(msg) => {
            session::set_flash(&session, FlashKind::Error, msg);
            return Ok(redirect(&back));
        }
    };
    let result = backend::admin::mark_attendance(&client, &who.token, &body).await;
    report_mutation(&cache, &session, &who, "Attendance mark", result, |_| {
        "Attendance marked successfully".to_string()
    })?;
    Ok(redirect(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_query_round_trips_without_page() {
        let query: StudentQuery = serde_urlencoded::from_str("search=ravi&class=10-A&status=&page=3").unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.class_name, "10-A");
        assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "search=ravi&class=10-A");
    }

    #[test]
    fn attendance_query_defaults() {
        let query: AttendanceQuery = serde_urlencoded::from_str("").unwrap();
        assert!(query.date.is_empty());
        assert_eq!(query.page, None);
    }
}
