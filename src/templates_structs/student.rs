use askama::Template;

use crate::models::attendance::{RecordStats, StudentRecordRow};
use crate::models::calendar::MonthGrid;
use crate::models::charts::Bar;
use crate::models::dashboard::StudentDashboard;
use crate::models::leave::{LeaveRow, LeaveStats};
use crate::models::SelectOption;
use super::{PageContext, PaginationView};

#[derive(Template)]
#[template(path = "student/overview.html")]
pub struct StudentOverviewTemplate {
    pub ctx: PageContext,
    pub dashboard: StudentDashboard,
    pub trend: Vec<Bar>,
    pub standing: &'static str,
    pub standing_class: &'static str,
    pub recent: Vec<StudentRecordRow>,
}

#[derive(Template)]
#[template(path = "student/records.html")]
pub struct RecordsTemplate {
    pub ctx: PageContext,
    pub stats: RecordStats,
    pub rows: Vec<StudentRecordRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub month_options: Vec<SelectOption>,
    pub year_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "student/calendar.html")]
pub struct CalendarTemplate {
    pub ctx: PageContext,
    pub grid: MonthGrid,
    pub prev_href: String,
    /// None while showing the current month.
    pub next_href: Option<String>,
}

#[derive(Template)]
#[template(path = "student/leave.html")]
pub struct LeaveTemplate {
    pub ctx: PageContext,
    pub stats: LeaveStats,
    pub rows: Vec<LeaveRow>,
    pub pagination: PaginationView,
    pub status_options: Vec<SelectOption>,
    pub type_options: Vec<SelectOption>,
}
