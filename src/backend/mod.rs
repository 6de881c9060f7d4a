//! Access to the attendance REST backend: the HTTP client, its errors, the
//! display-fallback cache and one module of endpoint calls per dashboard.

pub mod admin;
pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod faculty;
pub mod profile;
pub mod student;
pub mod super_admin;

pub use cache::{Ticket, ViewCache};
pub use client::BackendClient;
pub use error::BackendError;

use serde::Deserialize;

/// `{"message": "..."}` acknowledgement returned by most mutations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
