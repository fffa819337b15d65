//! Runtime settings.
//!
//! The dashboard takes exactly one knob from its surroundings: the backend
//! base URL. Resolution order is CLI flag, then the `BACKEND_BASE_URL`
//! environment variable, then a localhost default for development setups
//! where the backend runs next door.

use std::env;

/// Environment variable naming the backend base URL.
pub const BASE_URL_ENV: &str = "BACKEND_BASE_URL";

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend base URL without a trailing slash, e.g. `http://host:8000`.
    /// Request paths are appended verbatim.
    pub base_url: String,
}

impl Settings {
    /// Resolve settings from an optional CLI override and the process
    /// environment.
    pub fn resolve(cli_base_url: Option<&str>) -> Self {
        let env_value = env::var(BASE_URL_ENV).ok();
        Self::from_parts(cli_base_url, env_value.as_deref())
    }

    // Pure precedence step, testable without touching the process env.
    fn from_parts(cli: Option<&str>, env: Option<&str>) -> Self {
        let raw = cli.or(env).unwrap_or(DEFAULT_BASE_URL);
        Self {
            base_url: normalize_base_url(raw),
        }
    }
}

/// Trim whitespace and trailing slashes so path concatenation cannot double
/// up. Blank input falls back to the default.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
