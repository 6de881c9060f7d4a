use askama::Template;

use crate::auth::session::Flash;
use crate::models::attendance::{AttendanceStats, DailyAttendanceRow};
use crate::models::profile::UserProfile;
use crate::models::student::{StudentRow, StudentStats};
use crate::models::SelectOption;
use super::{PageContext, PaginationView};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<Flash>,
    pub email: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub profile: UserProfile,
    pub member_since: String,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub home: &'static str,
}

/// Student table shared by the admin "Students" page and the faculty
/// "My Students" page. Only faculty may add, edit or delete.
#[derive(Template)]
#[template(path = "students.html")]
pub struct StudentListTemplate {
    pub ctx: PageContext,
    pub heading: &'static str,
    pub base_path: &'static str,
    pub stats: StudentStats,
    pub rows: Vec<StudentRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub class_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub can_manage: bool,
}

/// Daily attendance, shared by the admin and faculty dashboards.
#[derive(Template)]
#[template(path = "attendance.html")]
pub struct AttendanceTemplate {
    pub ctx: PageContext,
    pub base_path: &'static str,
    pub date: String,
    pub stats: AttendanceStats,
    pub rows: Vec<DailyAttendanceRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub status_options: Vec<SelectOption>,
    pub class_options: Vec<SelectOption>,
    /// Choices for the per-row "mark as" control.
    pub mark_options: Vec<SelectOption>,
    pub can_mark: bool,
}
