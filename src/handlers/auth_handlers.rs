use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::auth::rate_limit::LoginThrottle;
use crate::auth::session::{self, FlashKind};
use crate::auth::csrf;
use crate::backend::{self, BackendClient, BackendError, ViewCache};
use crate::errors::{AppError, render};
use crate::handlers::fetch::redirect;
use crate::templates_structs::{LoginTemplate, NotFoundTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_page_with(session: &Session, email: &str, error: Option<String>) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error,
        notice: session::take_flash(session),
        email: email.to_string(),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    // Already signed in: straight to the role's dashboard.
    if let Ok(who) = session::identity(&session) {
        return Ok(redirect(who.role.dashboard_path()));
    }
    login_page_with(&session, "", None)
}

pub async fn login_submit(
    req: HttpRequest,
    session: Session,
    form: web::Form<LoginForm>,
    client: web::Data<BackendClient>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if throttle.is_blocked(ip) {
        log::warn!("Login throttled for {ip}");
        let msg = "Too many failed login attempts. Please try again later.".to_string();
        return login_page_with(&session, &form.email, Some(msg));
    }

    if form.email.trim().is_empty() || form.password.is_empty() {
        return login_page_with(&session, &form.email, Some("Please enter email and password".to_string()));
    }

    match backend::auth::login(&client, &form.email, &form.password).await {
        Ok(token) => {
            throttle.clear(ip);
            let role = session::store_login(&session, &token, &form.email)?;
            log::info!("User {} signed in as {}", form.email.trim(), role.as_str());
            Ok(redirect(role.dashboard_path()))
        }
        Err(BackendError::Unauthorized(message)) | Err(BackendError::Http { status: 400..=499, message }) => {
            throttle.record_failure(ip);
            login_page_with(&session, &form.email, Some(message))
        }
        Err(e) => {
            log::error!("Login request failed: {e}");
            login_page_with(&session, &form.email, Some(format!("Login failed: {}", e.user_message())))
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
    client: web::Data<BackendClient>,
    cache: web::Data<ViewCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    if let Ok(who) = session::identity(&session) {
        // Best effort; the local session goes either way.
        if let Err(e) = backend::auth::logout(&client, &who.token).await {
            log::debug!("Backend logout failed: {e}");
        }
        cache.forget_user(&who.user_key);
    }
    session::purge(&session);
    Ok(redirect("/login"))
}

/// `/` sends signed-in users to their dashboard and everyone else to login.
pub async fn root(session: Session) -> HttpResponse {
    match session::identity(&session) {
        Ok(who) => redirect(who.role.dashboard_path()),
        Err(_) => redirect("/login"),
    }
}

pub async fn not_found(session: Session) -> Result<HttpResponse, AppError> {
    let home = session::identity(&session).map(|who| who.role.dashboard_path()).unwrap_or("/login");
    let body = askama::Template::render(&NotFoundTemplate { home })?;
    Ok(HttpResponse::NotFound().content_type("text/html; charset=utf-8").body(body))
}

pub async fn toggle_theme(session: Session, form: web::Form<CsrfOnly>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let theme = session::toggle_theme(&session);
    session::set_flash(&session, FlashKind::Info, format!("Switched to {theme} theme"));
    let back = req
        .headers()
        .get("Referer")
        .and_then(|v| v.to_str().ok())
        .and_then(local_path)
        .unwrap_or_else(|| "/".to_string());
    Ok(redirect(&back))
}

/// Path and query of a Referer, so redirects never leave this site.
fn local_path(referer: &str) -> Option<String> {
    let after_scheme = referer.split_once("://").map(|(_, rest)| rest).unwrap_or(referer);
    let path = &after_scheme[after_scheme.find('/')?..];
    (!path.starts_with("//")).then(|| path.to_string())
}
