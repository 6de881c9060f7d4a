use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::auth::csrf;
use crate::auth::session::{self, FlashKind};
use crate::backend::{self, BackendClient, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::fetch::{load_view, redirect, report_mutation};
use crate::models::format::display_date;
use crate::models::profile::{EmailForm, PasswordForm, UserProfile};
use crate::templates_structs::{PageContext, ProfileTemplate};

pub async fn show(
    session: Session,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    let who = session::identity(&session)?;
    let loaded = load_view(&cache, &session, &who, "profile", "profile", backend::profile::get(&client, &who.token)).await?;
    let profile: UserProfile = loaded.data;
    if let Some(name) = profile.full_name.as_deref().filter(|n| !n.is_empty()) {
        session::set_display_name(&session, name);
    }
    let ctx = PageContext::build(&session, &who, "/profile");
    let member_since = profile
        .created_at
        .as_deref()
        .map(display_date)
        .unwrap_or_else(|| "N/A".to_string());
    render(ProfileTemplate { ctx, profile, member_since })
}

pub async fn update_email(
    session: Session,
    form: web::Form<EmailForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::identity(&session)?;
    let body = match form.validate() {
        Ok(body) => body,
        Err(msg) => {
            session::set_flash(&session, FlashKind::Error, msg);
            return Ok(redirect("/profile"));
        }
    };
    let result = backend::profile::update_email(&client, &who.token, &body).await;
    if report_mutation(&cache, &session, &who, "Email update", result, |_| "Email updated successfully".to_string())?.is_some() {
        session::set_email(&session, &body.email);
    }
    Ok(redirect("/profile"))
}

pub async fn change_password(
    session: Session,
    form: web::Form<PasswordForm>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let who = session::identity(&session)?;
    let body = match form.validate() {
        Ok(body) => body,
        Err(msg) => {
            session::set_flash(&session, FlashKind::Error, msg);
            return Ok(redirect("/profile"));
        }
    };
    let result = backend::profile::change_password(&client, &who.token, &body).await;
    report_mutation(&cache, &session, &who, "Password change", result, |_| "Password changed successfully".to_string())?;
    Ok(redirect("/profile"))
}
