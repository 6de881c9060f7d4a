use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::auth::session::{self, FlashKind};
use crate::backend::{self, BackendClient, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::fetch::{end_session, is_blank, list_view, load_variant, load_view, redirect, report_mutation};
use crate::models::auth::Role;
use crate::models::charts::ChartSeries;
use crate::models::institute::{self, InstituteCounts, InstituteFilter, InstituteForm, InstituteRow};
use crate::models::platform_user::{self, ResetPasswordResponse, UserCounts, UserFilter, UserForm, UserRow};
use crate::models::SelectOption;
use crate::paging::PageSize;
use crate::templates_structs::{
    InstituteFormTemplate, InstitutesTemplate, PageContext, PaginationView, SuperAdminOverviewTemplate,
    UserFormTemplate, UsersTemplate,
};

const DEFAULT_MONTHS: u32 = 12;
const MONTH_CHOICES: &[(&str, &str)] = &[("6", "Last 6 months"), ("12", "Last 12 months"), ("24", "Last 24 months")];
const DEFAULT_DAYS: u32 = 30;
const DAY_CHOICES: &[(&str, &str)] =
    &[("7", "Last 7 days"), ("30", "Last 30 days"), ("90", "Last 90 days"), ("365", "Last year")];

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    pub months: Option<u32>,
    pub days: Option<u32>,
}

pub async fn overview(
    session: Session,
    query: web::Query<OverviewQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let months = query.months.unwrap_or(DEFAULT_MONTHS);
    let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(7, 365);
    let months_variant = months.to_string();
    let days_variant = days.to_string();
    let (stats, registrations, subscriptions, usage) = tokio::join!(
        load_view(&cache, &session, &who, "super_admin.overview", "dashboard statistics",
            backend::super_admin::dashboard_stats(&client, &who.token)),
        load_variant(&cache, &session, &who, ("super_admin.registrations", months_variant.as_str()), "registration chart",
            backend::super_admin::monthly_registrations(&client, &who.token, months)),
        load_view(&cache, &session, &who, "super_admin.subscriptions", "subscription chart",
            backend::super_admin::subscription_distribution(&client, &who.token)),
        load_variant(&cache, &session, &who, ("super_admin.usage", days_variant.as_str()), "institute usage chart",
            backend::super_admin::institute_usage(&client, &who.token, days)),
    );
    let stats = stats?.data;
    let registrations = ChartSeries::from_counts(&registrations?.data).bars(None, "");
    let subscriptions = ChartSeries::from_counts(&subscriptions?.data).shares();
    let usage = ChartSeries::from_counts(&usage?.data).bars(None, "");

    let ctx = PageContext::build(&session, &who, "/super-admin");
    render(SuperAdminOverviewTemplate {
        ctx,
        stats,
        registrations,
        subscriptions,
        usage,
        months,
        days,
        months_options: SelectOption::choices(MONTH_CHOICES, &months_variant),
        days_options: SelectOption::choices(DAY_CHOICES, &days_variant),
    })
}

// ---------- Institutes ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InstituteQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub plan: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

pub async fn institutes(
    session: Session,
    query: web::Query<InstituteQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let list = load_view(&cache, &session, &who, "super_admin.institutes", "institutes",
        backend::super_admin::institutes(&client, &who.token)).await?.data;

    let counts = InstituteCounts::from_list(&list);
    let filter = InstituteFilter::new(&query.search, &query.plan, &query.status);
    let view = list_view(list, filter, query.page, **page_size);
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "institutes", "/super-admin/institutes", &*query);
    let rows = paged.rows.into_iter().map(InstituteRow::from).collect();

    let ctx = PageContext::build(&session, &who, "/super-admin/institutes");
    render(InstitutesTemplate {
        ctx,
        counts,
        rows,
        pagination,
        search: query.search.clone(),
        plan_options: SelectOption::with_all("All Plans", institute::PLAN_OPTIONS, &query.plan),
        active_options: SelectOption::with_all("All Status", institute::ACTIVE_OPTIONS, &query.status),
    })
}

#[derive(Deserialize)]
pub struct ActionForm {
    pub csrf_token: String,
}

pub async fn toggle_institute(
    session: Session,
    path: web::Path<String>,
    form: web::Form<ActionForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let result = backend::super_admin::toggle_institute(&client, &who.token, &path).await;
    report_mutation(&cache, &session, &who, "Institute toggle", result, |r| r.message.clone())?;
    Ok(redirect("/super-admin/institutes"))
}

fn institute_form_page(
    session: &Session,
    who: &session::Identity,
    form: InstituteForm,
    errors: Vec<String>,
    editing: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, who, "/super-admin/institutes");
    let (form_action, form_title) = match editing {
        Some(id) => (format!("/super-admin/institutes/{id}"), "Edit Institute"),
        None => ("/super-admin/institutes".to_string(), "Add Institute"),
    };
    let type_options = SelectOption::with_all("Select type", institute::INSTITUTE_TYPES, &form.institute_type);
    let plan_options = SelectOption::with_all("Select plan", institute::SUBSCRIPTION_PLANS, &form.subscription_plan);
    let payment_options = SelectOption::with_all("Select payment method", institute::PAYMENT_METHODS, &form.payment_method);
    render(InstituteFormTemplate {
        ctx,
        form_action,
        form_title,
        form,
        errors,
        type_options,
        plan_options,
        payment_options,
        editing: editing.is_some(),
    })
}

pub async fn institute_new(session: Session) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let form = InstituteForm { student_count: "0".to_string(), ..Default::default() };
    institute_form_page(&session, &who, form, Vec::new(), None)
}

pub async fn institute_create(
    session: Session,
    form: web::Form<InstituteForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let form = form.into_inner();
    let body = match form.validate_create() {
        Ok(body) => body,
        Err(errors) => return institute_form_page(&session, &who, form, errors, None),
    };
    let result = backend::super_admin::register_institute(&client, &who.token, &body).await;
    match report_mutation(&cache, &session, &who, "Institute create", result, |r| match &r.admin_email {
        Some(email) => format!("Institute {} registered. Admin login: {email}", r.institute_id),
        None => format!("Institute {} registered", r.institute_id),
    })? {
        Some(_) => Ok(redirect("/super-admin/institutes")),
        None => institute_form_page(&session, &who, form, Vec::new(), None),
    }
}

pub async fn institute_edit(
    session: Session,
    path: web::Path<String>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let id = path.into_inner();
    match backend::super_admin::institute(&client, &who.token, &id).await {
        Ok(detail) => institute_form_page(&session, &who, InstituteForm::from_detail(&detail), Vec::new(), Some(id.as_str())),
        Err(e) if e.is_unauthorized() => {
            end_session(&cache, &session, &who);
            Err(AppError::SessionExpired)
        }
        Err(e) => {
            log::warn!("Failed to load institute {id} for user {}: {e}", who.user_key);
            session::set_flash(&session, FlashKind::Error, e.user_message());
            Ok(redirect("/super-admin/institutes"))
        }
    }
}

pub async fn institute_update(
    session: Session,
    path: web::Path<String>,
    form: web::Form<InstituteForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let id = path.into_inner();
    let form = form.into_inner();
    let body = match form.validate_update() {
        Ok(body) => body,
        Err(errors) => return institute_form_page(&session, &who, form, errors, Some(id.as_str())),
    };
    let result = backend::super_admin::update_institute(&client, &who.token, &id, &body).await;
    match report_mutation(&cache, &session, &who, "Institute update", result, |r| r.message.clone())? {
        Some(_) => Ok(redirect("/super-admin/institutes")),
        None => institute_form_page(&session, &who, form, Vec::new(), Some(id.as_str())),
    }
}

pub async fn institute_delete(
    session: Session,
    path: web::Path<String>,
    form: web::Form<ActionForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let result = backend::super_admin::deactivate_institute(&client, &who.token, &path).await;
    report_mutation(&cache, &session, &who, "Institute deactivate", result, |r| r.message.clone())?;
    Ok(redirect("/super-admin/institutes"))
}

// ---------- Users ----------

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserQuery {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub role: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub status: String,
    #[serde(default, skip_serializing)]
    pub page: Option<usize>,
}

pub async fn users(
    session: Session,
    query: web::Query<UserQuery>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
    page_size: web::Data<PageSize>,
) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let list = load_view(&cache, &session, &who, "super_admin.users", "users",
        backend::super_admin::users(&client, &who.token)).await?.data;

    let counts = UserCounts::from_list(&list);
    let filter = UserFilter::new(&query.search, &query.role, &query.status);
    let view = list_view(list, filter, query.page, **page_size);
    let paged = view.current();
    let pagination = PaginationView::new(&paged, "users", "/super-admin/users", &*query);
    let rows = paged.rows.into_iter().map(UserRow::from).collect();

    let ctx = PageContext::build(&session, &who, "/super-admin/users");
    render(UsersTemplate {
        ctx,
        counts,
        rows,
        pagination,
        search: query.search.clone(),
        role_options: SelectOption::with_all("All Roles", platform_user::ROLE_OPTIONS, &query.role),
        active_options: SelectOption::with_all("All Status", institute::ACTIVE_OPTIONS, &query.status),
    })
}

pub async fn toggle_user(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ActionForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let result = backend::super_admin::toggle_user(&client, &who.token, path.into_inner()).await;
    report_mutation(&cache, &session, &who, "User toggle", result, |r| r.message.clone())?;
    Ok(redirect("/super-admin/users"))
}

fn user_form_page(
    session: &Session,
    who: &session::Identity,
    form: UserForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, who, "/super-admin/users");
    let role_options = SelectOption::with_all("Select role", platform_user::ROLE_OPTIONS, &form.role);
    render(UserFormTemplate { ctx, form, errors, role_options })
}

pub async fn user_new(session: Session) -> Result<HttpResponse, AppError> {
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let form = UserForm { is_active: Some("on".to_string()), ..Default::default() };
    user_form_page(&session, &who, form, Vec::new())
}

pub async fn user_create(
    session: Session,
    form: web::Form<UserForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let form = form.into_inner();
    let body = match form.validate() {
        Ok(body) => body,
        Err(errors) => return user_form_page(&session, &who, form, errors),
    };
    let result = backend::super_admin::register_user(&client, &who.token, &body).await;
    match report_mutation(&cache, &session, &who, "User create", result, |_| {
        format!("User {} created successfully", body.email)
    })? {
        Some(_) => Ok(redirect("/super-admin/users")),
        None => user_form_page(&session, &who, form, Vec::new()),
    }
}

/// The temporary password is only ever shown once, in the success toast.
fn reset_message(r: &ResetPasswordResponse) -> String {
    match (&r.temp_password, &r.email) {
        (Some(pw), Some(email)) => format!("Password reset for {email}. Temporary password: {pw}"),
        (Some(pw), None) => format!("{} Temporary password: {pw}", r.message),
        _ => r.message.clone(),
    }
}

pub async fn reset_password(
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ActionForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::require_role(&session, Role::SuperAdmin)?;
    let result = backend::super_admin::reset_password(&client, &who.token, path.into_inner()).await;
    report_mutation(&cache, &session, &who, "Password reset", result, reset_message)?;
    Ok(redirect("/super-admin/users"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_message_shows_temp_password() {
        let r = ResetPasswordResponse {
            message: "Password reset".into(),
            temp_password: Some("Xy7-temp".into()),
            email: Some("a@school.edu".into()),
        };
        assert_eq!(reset_message(&r), "Password reset for a@school.edu. Temporary password: Xy7-temp");
        let bare = ResetPasswordResponse { message: "Done".into(), temp_password: None, email: None };
        assert_eq!(reset_message(&bare), "Done");
    }
}
