use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::auth::{Role, TokenResponse};

const ACCESS_TOKEN: &str = "access_token";
const ROLE: &str = "role";
const USER_ID: &str = "user_id";
const INSTITUTE_ID: &str = "institute_id";
const EMAIL: &str = "email";
const DISPLAY_NAME: &str = "display_name";
const FLASH: &str = "flash";
const THEME: &str = "theme";

/// Who is signed in, as recorded at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub token: String,
    pub role: Role,
    /// Backend user id, or the email when the backend did not send one.
    /// Used to key per-user caches.
    pub user_key: String,
    pub institute_id: Option<String>,
    pub email: String,
}

fn insert<T: Serialize>(session: &Session, key: &str, value: &T) -> Result<(), AppError> {
    session
        .insert(key, value)
        .map_err(|e| AppError::Session(format!("Failed to store {key}: {e}")))
}

/// Record a successful login. The session id is renewed first.
pub fn store_login(session: &Session, token: &TokenResponse, email: &str) -> Result<Role, AppError> {
    let role = Role::parse(&token.role)
        .ok_or_else(|| AppError::Session(format!("Unknown role '{}'", token.role)))?;
    session.renew();
    insert(session, ACCESS_TOKEN, &token.access_token)?;
    insert(session, ROLE, &role)?;
    if let Some(user_id) = token.user_id {
        insert(session, USER_ID, &user_id)?;
    }
    if let Some(institute_id) = &token.institute_id {
        insert(session, INSTITUTE_ID, institute_id)?;
    }
    insert(session, EMAIL, &email.trim().to_lowercase())?;
    Ok(role)
}

pub fn has_token(session: &Session) -> bool {
    session.get::<String>(ACCESS_TOKEN).unwrap_or(None).is_some()
}

pub fn identity(session: &Session) -> Result<Identity, AppError> {
    let token = session
        .get::<String>(ACCESS_TOKEN)
        .map_err(|e| AppError::Session(format!("Failed to read token: {e}")))?
        .ok_or(AppError::SessionExpired)?;
    let role = session
        .get::<Role>(ROLE)
        .map_err(|e| AppError::Session(format!("Failed to read role: {e}")))?
        .ok_or(AppError::SessionExpired)?;
    let email = session.get::<String>(EMAIL).unwrap_or(None).unwrap_or_default();
    let user_key = session
        .get::<i64>(USER_ID)
        .unwrap_or(None)
        .map(|id| id.to_string())
        .unwrap_or_else(|| email.clone());
    let institute_id = session.get::<String>(INSTITUTE_ID).unwrap_or(None);
    Ok(Identity { token, role, user_key, institute_id, email })
}

/// The signed-in identity, provided it has `role`; each dashboard belongs to
/// exactly one role.
pub fn require_role(session: &Session, role: Role) -> Result<Identity, AppError> {
    let who = identity(session)?;
    if who.role == role {
        Ok(who)
    } else {
        Err(AppError::PermissionDenied(format!("{} dashboard", role.label())))
    }
}

pub fn display_name(session: &Session) -> Option<String> {
    session.get::<String>(DISPLAY_NAME).unwrap_or(None)
}

pub fn set_display_name(session: &Session, name: &str) {
    let _ = session.insert(DISPLAY_NAME, name);
}

pub fn set_email(session: &Session, email: &str) {
    let _ = session.insert(EMAIL, email);
}

/// Drop everything, including the token.
pub fn purge(session: &Session) {
    session.purge();
}

/// The backend rejected the token: forget the login but keep a cookie long
/// enough to tell the user why they are back at the login page.
pub fn expire(session: &Session) {
    session.clear();
    session.renew();
    set_flash(session, FlashKind::Info, "Session expired. Please login again.");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

/// One-shot toast shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "toast-success",
            FlashKind::Error => "toast-error",
            FlashKind::Info => "toast-info",
        }
    }
}

pub fn set_flash(session: &Session, kind: FlashKind, message: impl Into<String>) {
    let flash = Flash { kind, message: message.into() };
    if let Err(e) = session.insert(FLASH, &flash) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<Flash> {
    let flash = session.get::<Flash>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}

pub fn theme(session: &Session) -> String {
    match session.get::<String>(THEME).unwrap_or(None).as_deref() {
        Some("light") => "light".to_string(),
        _ => "dark".to_string(),
    }
}

/// Flip between the dark and light themes; returns the new one.
pub fn toggle_theme(session: &Session) -> String {
    let next = if theme(session) == "dark" { "light" } else { "dark" };
    let _ = session.insert(THEME, next);
    next.to_string()
}
