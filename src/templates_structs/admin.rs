use askama::Template;

use crate::models::charts::Bar;
use crate::models::dashboard::AdminDashboardStats;
use crate::models::faculty::{FacultyForm, FacultyRow, FacultyStats};
use crate::models::SelectOption;
use super::{PageContext, PaginationView};

#[derive(Template)]
#[template(path = "admin/overview.html")]
pub struct AdminOverviewTemplate {
    pub ctx: PageContext,
    pub stats: AdminDashboardStats,
    pub trend: Vec<Bar>,
    pub weekly_average: f64,
}

#[derive(Template)]
#[template(path = "admin/faculty_list.html")]
pub struct FacultyListTemplate {
    pub ctx: PageContext,
    pub stats: FacultyStats,
    pub rows: Vec<FacultyRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub status_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "admin/faculty_form.html")]
pub struct FacultyFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: &'static str,
    pub form: FacultyForm,
    pub errors: Vec<String>,
    pub stream_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub editing: bool,
}

