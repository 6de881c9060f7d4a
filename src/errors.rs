use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::backend::BackendError;

#[derive(Debug)]
pub enum AppError {
    Template(askama::Error),
    Session(String),
    Backend(BackendError),
    PermissionDenied(String),
    Csrf,
    /// No usable bearer token any more; the session has been purged.
    SessionExpired,
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Backend(e) => write!(f, "Backend error: {e}"),
            AppError::PermissionDenied(what) => write!(f, "Permission denied: {what}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::SessionExpired => write!(f, "Session expired"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

fn redirect_to_login() -> HttpResponse {
    HttpResponse::SeeOther().insert_header(("Location", "/login")).finish()
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().body("Not Found"),
            AppError::SessionExpired => redirect_to_login(),
            AppError::Backend(e) if e.is_unauthorized() => redirect_to_login(),
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::PermissionDenied(what) => {
                log::warn!("{self}");
                HttpResponse::Forbidden().body(format!("Access denied: {what}"))
            }
            AppError::Backend(e) => {
                log::error!("{self}");
                HttpResponse::BadGateway().body(e.user_message())
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        AppError::Backend(e)
    }
}

/// Render an askama template into a 200 HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn expired_sessions_redirect_to_login() {
        let resp = AppError::SessionExpired.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let resp = AppError::Backend(BackendError::Unauthorized("token".into())).error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("Location").unwrap(), "/login");
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::Csrf.status_code_of(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::PermissionDenied("admin".into()).status_code_of(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound.status_code_of(), StatusCode::NOT_FOUND);
        let upstream = AppError::Backend(BackendError::Http { status: 500, message: "boom".into() });
        assert_eq!(upstream.status_code_of(), StatusCode::BAD_GATEWAY);
    }

    impl AppError {
        fn status_code_of(&self) -> StatusCode {
            self.error_response().status()
        }
    }
}
