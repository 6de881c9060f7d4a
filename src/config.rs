//! Runtime configuration, read from the environment (and `.env`) at startup.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::Key;
use thiserror::Error;

use crate::paging::PageSize;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: String,
    pub session_key: Key,
    pub page_size: PageSize,
    pub backend_timeout: Duration,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("backend_url", &self.backend_url)
            .field("page_size", &self.page_size)
            .field("backend_timeout", &self.backend_timeout)
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value: bind_raw.clone() })?;

        let backend_url = get("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        if !(backend_url.starts_with("http://") || backend_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { name: "BACKEND_URL", value: backend_url });
        }

        let page_size = match get("PAGE_SIZE") {
            None => PageSize::default(),
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .map_err(|_| ConfigError::Invalid { name: "PAGE_SIZE", value: raw.clone() })?;
                PageSize::try_new(n).ok_or(ConfigError::NotPositive("PAGE_SIZE"))?
            }
        };

        let timeout_secs = match get("BACKEND_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "BACKEND_TIMEOUT_SECS", value: raw.clone() })?,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::NotPositive("BACKEND_TIMEOUT_SECS"));
        }

        let cookie_secure = match get("COOKIE_SECURE").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => return Err(ConfigError::Invalid { name: "COOKIE_SECURE", value: other.to_string() }),
        };

        let session_key = match lookup("SESSION_KEY") {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need {}+), generating random key", val.len(), MIN_SESSION_KEY_LEN);
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        };

        Ok(AppConfig {
            bind_addr,
            backend_url,
            session_key,
            page_size,
            backend_timeout: Duration::from_secs(timeout_secs),
            cookie_secure,
        })
    }
}
