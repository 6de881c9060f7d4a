//! Shared plumbing between handlers and the backend: loading a view with
//! cache fallback and reporting the outcome of a mutation.

use std::future::Future;

use actix_session::Session;
use actix_web::HttpResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::session::{self, FlashKind, Identity};
use crate::backend::{BackendError, ViewCache};
use crate::errors::AppError;
use crate::paging::{ListView, PageSize, RecordFilter};

/// Data for one view, plus whether it came from the fallback cache.
#[derive(Debug)]
pub struct Loaded<T> {
    pub data: T,
    pub from_cache: bool,
}

/// Run `fetch` for `who`'s `view`. A fresh response replaces the cached
/// copy (unless a newer request for the view has been issued meanwhile).
/// On failure the last cached copy, or `T::default()`, is shown with an
/// error toast. A rejected token ends the session.
pub async fn load_view<T, Fut>(
    cache: &ViewCache,
    session: &Session,
    who: &Identity,
    view: &str,
    what: &str,
    fetch: Fut,
) -> Result<Loaded<T>, AppError>
where
    T: Serialize + DeserializeOwned + Default,
    Fut: Future<Output = Result<T, BackendError>>,
{
    load_variant(cache, session, who, (view, ""), what, fetch).await
}

/// [`load_view`] for a view that shows one date or month at a time. The
/// cached copy is only reused for the same `variant`.
pub async fn load_variant<T, Fut>(
    cache: &ViewCache,
    session: &Session,
    who: &Identity,
    (view, variant): (&str, &str),
    what: &str,
    fetch: Fut,
) -> Result<Loaded<T>, AppError>
where
    T: Serialize + DeserializeOwned + Default,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let ticket = cache.begin_variant(&who.user_key, view, variant);
    match fetch.await {
        Ok(data) => {
            cache.complete(&ticket, &data);
            Ok(Loaded { data, from_cache: false })
        }
        Err(err) => {
            if err.is_unauthorized() {
                end_session(cache, session, who);
                return Err(AppError::SessionExpired);
            }
            log::warn!("Failed to load {what} for user {}: {err}", who.user_key);
            session::set_flash(session, FlashKind::Error, format!("Error loading {what}"));
            let data = cache.fallback_variant(&who.user_key, view, variant).unwrap_or_default();
            Ok(Loaded { data, from_cache: true })
        }
    }
}

pub fn end_session(cache: &ViewCache, session: &Session, who: &Identity) {
    cache.forget_user(&who.user_key);
    session::expire(session);
}

/// Flash the outcome of a create/update/delete call. Only an expired token
/// is an error for the caller; backend refusals become error toasts.
pub fn report_mutation<T>(
    cache: &ViewCache,
    session: &Session,
    who: &Identity,
    action: &str,
    result: Result<T, BackendError>,
    success: impl FnOnce(&T) -> String,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => {
            log::info!("{action} succeeded for user {}", who.user_key);
            session::set_flash(session, FlashKind::Success, success(&value));
            Ok(Some(value))
        }
        Err(e) if e.is_unauthorized() => {
            end_session(cache, session, who);
            Err(AppError::SessionExpired)
        }
        Err(e) => {
            log::warn!("{action} failed for user {}: {e}", who.user_key);
            session::set_flash(session, FlashKind::Error, e.user_message());
            Ok(None)
        }
    }
}

/// Table state for one render: the fetched rows, the filter from the query
/// string and the requested page.
pub fn list_view<T, F: RecordFilter<T>>(items: Vec<T>, filter: F, page: Option<usize>, page_size: PageSize) -> ListView<T, F> {
    let mut view = ListView::with_filter(page_size, filter);
    view.replace_items(items);
    view.go_to_page(page_param(page));
    view
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther().insert_header(("Location", location)).finish()
}

/// Page numbers come from the query string; anything below 1 means 1.
pub fn page_param(raw: Option<usize>) -> usize {
    raw.unwrap_or(1).max(1)
}

/// Serde helper for skipping blank filter values in pagination links.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_param_sanitises() {
        assert_eq!(page_param(None), 1);
        assert_eq!(page_param(Some(0)), 1);
        assert_eq!(page_param(Some(4)), 4);
    }

    #[test]
    fn list_view_starts_at_requested_page() {
        use crate::paging::NoFilter;
        let view = list_view((1..=25).collect::<Vec<u32>>(), NoFilter, Some(3), PageSize::new(10));
        let paged = view.current();
        assert_eq!(paged.page, 3);
        assert_eq!(paged.rows, vec![&21, &22, &23, &24, &25]);
        let clamped = list_view(vec![1u32], NoFilter, Some(0), PageSize::new(10));
        assert_eq!(clamped.page(), 1);
    }

    #[test]
    fn redirect_is_see_other() {
        let resp = redirect("/admin/faculty");
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("Location").unwrap(), "/admin/faculty");
    }
}
