//! lsw-config
//!
//! Environment configuration for the switch server shell.
//!
//! # Contract
//! - Resolved **once** at startup via [`ServerConfig::from_env`]; the result
//!   is passed to constructors. Do not scatter `std::env::var` calls.
//! - Unset and blank variables both fall back to the documented default.
//! - Tests use [`ServerConfig::from_lookup`] with an in-memory map.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Variable names and defaults
// ---------------------------------------------------------------------------

pub const ENV_LOG_DIRECTORY: &str = "LOG_DIRECTORY";
pub const ENV_CERTIFICATE_DIRECTORY: &str = "CERTIFICATE_DIRECTORY";
pub const ENV_HTML_DIRECTORY: &str = "HTML_DIRECTORY";
pub const ENV_ROUTES: &str = "ROUTES";
pub const ENV_ADDR: &str = "LSW_ADDR";
pub const ENV_SWITCH_NAME: &str = "LSW_SWITCH_NAME";

pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_CERTIFICATE_DIRECTORY: &str = "certificates";
pub const DEFAULT_HTML_DIRECTORY: &str = "html";
pub const DEFAULT_ADDR: &str = "0.0.0.0:80";
pub const DEFAULT_SWITCH_NAME: &str = "Light";

/// Template file, relative to the HTML directory.
pub const TEMPLATE_RELATIVE_PATH: &str = "template/switch.html";
/// Static asset root, relative to the HTML directory.
pub const STATIC_RELATIVE_PATH: &str = "static";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Directory receiving one log file per `start`.
    pub log_dir: PathBuf,
    /// TLS certificate directory. Logged at startup; the server speaks plain HTTP.
    pub certificate_dir: PathBuf,
    /// Root of `static/` and `template/switch.html`.
    pub html_dir: PathBuf,
    /// Host allow-list for an HTTPS redirect (sorted, unique, non-empty entries).
    pub routes: BTreeSet<String>,
    /// Listen address.
    pub addr: SocketAddr,
    /// Name given to the served switch.
    pub switch_name: String,
}

impl ServerConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for every variable.
    ///
    /// # Errors
    /// `LSW_ADDR` is set but is not a socket address (`host:port`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| non_blank(lookup(name));
        let get_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let addr_raw = get_or(ENV_ADDR, DEFAULT_ADDR);
        let addr: SocketAddr = addr_raw.parse().with_context(|| {
            format!("CONFIG_INVALID: {ENV_ADDR}='{addr_raw}' is not host:port")
        })?;

        Ok(Self {
            log_dir: get_or(ENV_LOG_DIRECTORY, DEFAULT_LOG_DIRECTORY).into(),
            certificate_dir: get_or(ENV_CERTIFICATE_DIRECTORY, DEFAULT_CERTIFICATE_DIRECTORY).into(),
            html_dir: get_or(ENV_HTML_DIRECTORY, DEFAULT_HTML_DIRECTORY).into(),
            routes: get(ENV_ROUTES)
                .map(|raw| parse_routes(&raw))
                .unwrap_or_default(),
            addr,
            switch_name: get_or(ENV_SWITCH_NAME, DEFAULT_SWITCH_NAME),
        })
    }

    /// `<html_dir>/static`
    pub fn static_dir(&self) -> PathBuf {
        self.html_dir.join(STATIC_RELATIVE_PATH)
    }

    /// `<html_dir>/template/switch.html`
    pub fn template_path(&self) -> PathBuf {
        self.html_dir.join(TEMPLATE_RELATIVE_PATH)
    }

    /// `(fullchain.pem, privkey.pem)` under the certificate directory.
    pub fn certificate_paths(&self) -> (PathBuf, PathBuf) {
        certificate_paths(&self.certificate_dir)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Split a comma-separated route list, dropping blanks and duplicates.
pub fn parse_routes(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

fn certificate_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("fullchain.pem"), dir.join("privkey.pem"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
