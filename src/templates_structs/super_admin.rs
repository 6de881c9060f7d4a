use askama::Template;

use crate::models::charts::{Bar, Share};
use crate::models::dashboard::SuperAdminStats;
use crate::models::institute::{InstituteCounts, InstituteForm, InstituteRow};
use crate::models::platform_user::{UserCounts, UserForm, UserRow};
use crate::models::SelectOption;
use super::{PageContext, PaginationView};

#[derive(Template)]
#[template(path = "super_admin/overview.html")]
pub struct SuperAdminOverviewTemplate {
    pub ctx: PageContext,
    pub stats: SuperAdminStats,
    pub registrations: Vec<Bar>,
    pub subscriptions: Vec<Share>,
    pub usage: Vec<Bar>,
    pub months: u32,
    pub days: u32,
    pub months_options: Vec<SelectOption>,
    pub days_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "super_admin/institutes.html")]
pub struct InstitutesTemplate {
    pub ctx: PageContext,
    pub counts: InstituteCounts,
    pub rows: Vec<InstituteRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub plan_options: Vec<SelectOption>,
    pub active_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "super_admin/users.html")]
pub struct UsersTemplate {
    pub ctx: PageContext,
    pub counts: UserCounts,
    pub rows: Vec<UserRow>,
    pub pagination: PaginationView,
    pub search: String,
    pub role_options: Vec<SelectOption>,
    pub active_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "super_admin/institute_form.html")]
pub struct InstituteFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: &'static str,
    pub form: InstituteForm,
    pub errors: Vec<String>,
    pub type_options: Vec<SelectOption>,
    pub plan_options: Vec<SelectOption>,
    pub payment_options: Vec<SelectOption>,
    /// The id is fixed and no admin password is asked for.
    pub editing: bool,
}

#[derive(Template)]
#[template(path = "super_admin/user_form.html")]
pub struct UserFormTemplate {
    pub ctx: PageContext,
    pub form: UserForm,
    pub errors: Vec<String>,
    pub role_options: Vec<SelectOption>,
}
