//! Gateway configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GATEWAY_*` environment variables or a config
//! file. Every field is optional; accessors apply defaults and validate.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Upstream base URL used when none is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000/v1";
/// Whole-request upstream timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Upstream connect timeout used when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
/// Listen address used when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The upstream URL does not parse.
    #[error("upstream_url {value:?} is not a valid URL: {reason}")]
    InvalidUpstreamUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The upstream URL is not HTTP(S).
    #[error("upstream_url must use http or https, got {scheme:?}")]
    UnsupportedScheme {
        /// Offending scheme.
        scheme: String,
    },
    /// The listen address does not parse.
    #[error("bind_addr {value:?} is not a socket address")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
    },
    /// A timeout of zero milliseconds.
    #[error("{field} must be greater than zero")]
    ZeroTimeout {
        /// Offending setting.
        field: &'static str,
    },
}

/// Gateway settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GATEWAY")]
pub struct GatewaySettings {
    /// Base URL of the upstream content service.
    pub upstream_url: Option<String>,
    /// Whole-request upstream timeout in milliseconds.
    pub request_timeout_ms: Option<u64>,
    /// Upstream connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Serve the fallback dataset when upstream is unreachable.
    pub fallback_enabled: Option<bool>,
    /// Replace the bundled fallback dataset with this JSON file.
    pub fallback_path: Option<PathBuf>,
}

impl GatewaySettings {
    /// Parsed upstream base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value does not parse or is not an
    /// `http`/`https` URL.
    pub fn upstream_url(&self) -> Result<Url, SettingsError> {
        let raw = self.upstream_url.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL);
        let url = Url::parse(raw.trim()).map_err(|err| SettingsError::InvalidUpstreamUrl {
            value: raw.to_owned(),
            reason: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SettingsError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// Whole-request upstream timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero value.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        positive_millis(
            "request_timeout_ms",
            self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    /// Upstream connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero value.
    pub fn connect_timeout(&self) -> Result<Duration, SettingsError> {
        positive_millis(
            "connect_timeout_ms",
            self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        )
    }

    /// Listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
            })
    }

    /// Whether reads fall back to the dataset. Defaults to `true`.
    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled.unwrap_or(true)
    }

    /// Optional dataset override path.
    #[must_use]
    pub fn fallback_path(&self) -> Option<&Path> {
        self.fallback_path.as_deref()
    }
}

fn positive_millis(field: &'static str, millis: u64) -> Result<Duration, SettingsError> {
    if millis == 0 {
        return Err(SettingsError::ZeroTimeout { field });
    }
    Ok(Duration::from_millis(millis))
}
