use askama::Template;

use crate::models::charts::Bar;
use crate::models::dashboard::FacultyDashboardStats;
use crate::models::student::StudentForm;
use crate::models::SelectOption;
use super::PageContext;

#[derive(Template)]
#[template(path = "faculty/overview.html")]
pub struct FacultyOverviewTemplate {
    pub ctx: PageContext,
    pub stats: FacultyDashboardStats,
    pub trend: Vec<Bar>,
}

#[derive(Template)]
#[template(path = "faculty/student_form.html")]
pub struct StudentFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: &'static str,
    pub form: StudentForm,
    pub errors: Vec<String>,
    pub stream_options: Vec<SelectOption>,
}
