use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::auth::session::{self, FlashKind};
use crate::backend::{self, BackendClient, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::fetch::{end_session, is_blank, list_view, load_view, redirect, report_mutation};
use crate::models::attendance::{self, RecordStats, RecordsFilter, StudentRecordRow};
use crate::models::auth::Role;
use crate::models::calendar::{CalendarMonth, MonthCursor, MonthGrid};
use crate::models::charts::ChartSeries;
use crate::models::dashboard::standing;
use crate::models::format::parse_date;
use crate::models::leave::{self, LeaveFilter, LeaveForm, LeaveRow, LeaveStats};
use crate::models::SelectOption;
use crate::paging::{Choice, PageSize};
use crate::templates_structs::{
    CalendarTemplate, LeaveTemplate, PageContext, PaginationView, RecordsTemplate, StudentOverviewTemplate,
};

const RECENT_ROWS: usize = 7;

pub async fn overview(
    session: Session,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Student)?;
    let dashboard = load_view(&cache, &session, &who, "student.overview", "dashboard",
        backend::student::dashboard(&client, &who.token)).await?.data;

    if !dashboard.student_info.full_name.is_empty() {
        session::set_display_name(&session, &dashboard.student_info.full_name);
    }
    let trend = ChartSeries::from_trend(&dashboard.weekly_trend).bars(Some(100.0), "%");
    let (standing, standing_class) = standing(dashboard.academic_stats.attendance_percent);
    let recent = dashboard.recent_attendance.iter().take(RECENT_ROWS).map(StudentRecordRow::from).collect();
    let ctx = PageContext::build(&session, &who, "/student");
    render(StudentOverviewTemplate { ctx, dashboard, trend, standing, standing_class, recent })
}

// ---------- Attendance records ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RecordsQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub month: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub year: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

fn month_options(selected: &str) -> Vec<SelectOption> {
    let months: Vec<(String, String)> = (1..=12u32)
        .filter_map(|m| MonthCursor::new(2000, m))
        .map(|c| (c.month.to_string(), c.name().to_string()))
        .collect();
    let pairs: Vec<(&str, &str)> = months.iter().map(|(v, l)| (v.as_str(), l.as_str())).collect();
    SelectOption::with_all("All Months", &pairs, selected)
}

/// Years present in the records plus the current one, newest first.
fn year_options(records: &[attendance::StudentAttendanceRecord], selected: &str) -> Vec<SelectOption> {
    let mut years: Vec<i32> = records.iter().filter_map(|r| parse_date(&r.date)).map(|d| d.year()).collect();
    years.push(Local::now().year());
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    SelectOption::from_values("All Years", &years, selected)
}

pub async fn records(
    session: Session,
    query: web::Query<RecordsQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Student)?;
    let list = load_view(&cache, &session, &who, "student.records", "attendance records",
        backend::student::attendance_records(&client, &who.token)).await?.data;

    let year_options = year_options(&list, &query.year);
    let filter = RecordsFilter::new(&query.month, &query.year, &query.status, &query.search);
    let view = list_view(list, filter, query.page, **page_size);
    let paged = view.current();
    let stats = RecordStats::from_records(view.items());
    let pagination = PaginationView::new(&paged, "records", "/student/records", &*query);
    let rows = paged.rows.into_iter().map(StudentRecordRow::from).collect();

    let ctx = PageContext::build(&session, &who, "/student/records");
    render(RecordsTemplate {
        ctx,
        stats,
        rows,
        pagination,
        search: query.search.clone(),
        month_options: month_options(&query.month),
        year_options,
        status_options: SelectOption::with_all("All Status", attendance::STATUSES, &query.status),
    })
}

// ---------- Calendar ----------

const CALENDAR_VIEW: &str = "student.calendar";

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

fn calendar_href(cursor: MonthCursor) -> String {
    format!("/student/calendar?year={}&month={}", cursor.year, cursor.month)
}

/// Month to show for the query, pulled back to the current month when it
/// lies in the future.
fn calendar_cursor(session: &Session, query: &CalendarQuery, today: NaiveDate) -> MonthCursor {
    let current = MonthCursor::containing(today);
    let requested = match (query.year, query.month) {
        (Some(year), Some(month)) => MonthCursor::new(year, month).unwrap_or_else(|| {
            session::set_flash(session, FlashKind::Error, "Invalid month requested");
            current
        }),
        _ => current,
    };
    let (cursor, clamped) = requested.clamp_to(today);
    if clamped {
        session::set_flash(session, FlashKind::Info, "Cannot view future months");
    }
    cursor
}

pub async fn calendar(
    session: Session,
    query: web::Query<CalendarQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Student)?;
    let today = Local::now().date_naive();
    let cursor = calendar_cursor(&session, &query, today);

    let month = format!("{}-{:02}", cursor.year, cursor.month);
    let ticket = cache.begin_variant(&who.user_key, CALENDAR_VIEW, &month);
    let grid = match backend::student::calendar(&client, &who.token, cursor).await {
        Ok(data) => {
            cache.complete(&ticket, &data);
            MonthGrid::from_backend(&data)
        }
        Err(e) if e.is_unauthorized() => {
            end_session(&cache, &session, &who);
            return Err(AppError::SessionExpired);
        }
        Err(e) => {
            log::warn!("Failed to load calendar {month} for user {}: {e}", who.user_key);
            match cache.fallback_variant::<CalendarMonth>(&who.user_key, CALENDAR_VIEW, &month) {
                Some(data) => {
                    session::set_flash(&session, FlashKind::Error, "Error loading calendar");
                    MonthGrid::from_backend(&data)
                }
                None => {
                    session::set_flash(&session, FlashKind::Error, "Error loading calendar, showing an offline view");
                    MonthGrid::fallback(cursor, today)
                }
            }
        }
    };

    let next = cursor.next();
    let ctx = PageContext::build(&session, &who, "/student/calendar");
    render(CalendarTemplate {
        ctx,
        grid,
        prev_href: calendar_href(cursor.prev()),
        next_href: (next <= MonthCursor::containing(today)).then(|| calendar_href(next)),
    })
}

// ---------- Leave requests ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LeaveQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

pub async fn leave(
    session: Session,
    query: web::Query<LeaveQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::Student)?;
    let list = load_view(&cache, &session, &who, "student.leave", "leave requests",
        backend::student::leave_requests(&client, &who.token)).await?.data;

    let stats = LeaveStats::from_requests(&list);
    let filter = LeaveFilter { status: Choice::from_param(&query.status) };
    let view = list_view(list, filter, query.page, **page_size);
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "leave requests", "/student/leave", &*query);
    let rows = paged.rows.into_iter().map(LeaveRow::from).collect();

    let ctx = PageContext::build(&session, &who, "/student/leave");
    render(LeaveTemplate {
        ctx,
        stats,
        rows,
        pagination,
        status_options: SelectOption::with_all("All Status", leave::STATUSES, &query.status),
        type_options: SelectOption::with_all("Select type", leave::TYPES, ""),
    })
}

pub async fn submit_leave(
    session: Session,
    form: web::Form<LeaveForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Student)?;
    let body = match form.validate() {
        Ok(body) => body,
        Err(msg) => {
            session::set_flash(&session, FlashKind::Error, msg);
            return Ok(redirect("/student/leave"));
        }
    };
    let result = backend::student::submit_leave(&client, &who.token, &body).await;
    report_mutation(&cache, &session, &who, "Leave request", result, |msg| msg.clone())?;
    Ok(redirect("/student/leave"))
}

#[derive(Deserialize)]
pub struct CancelForm {
    pub csrf_token: String,
}

pub async fn cancel_leave(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CancelForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::Student)?;
    let result = backend::student::cancel_leave(&client, &who.token, path.into_inner()).await;
    report_mutation(&cache, &session, &who, "Leave cancel", result, |msg| msg.clone())?;
    Ok(redirect("/student/leave"))
}
