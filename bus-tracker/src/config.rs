//! Server configuration read from the environment.

use std::net::SocketAddr;

use crate::cta::CtaConfig;
use crate::domain::UserLocation;
use crate::geolocation::ConfiguredLocation;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default static assets directory, relative to the working directory.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?} in {var}")]
    InvalidAddr { var: &'static str, value: String },

    /// Expected `"lat,lon"` or `"none"`
    #[error("invalid location {value:?} in {var}, expected \"lat,lon\" or \"none\"")]
    InvalidLocation { var: &'static str, value: String },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,

    /// Directory served under `/static`.
    pub static_dir: String,

    /// Server-wide location override. `None` means each rider's browser
    /// reports its own position.
    pub location: Option<ConfiguredLocation>,

    /// Backend client settings.
    pub cta: CtaConfig,
}

impl AppConfig {
    pub const BASE_URL_VAR: &'static str = "CTA_BASE_URL";
    pub const ADDR_VAR: &'static str = "BUS_TRACKER_ADDR";
    pub const STATIC_DIR_VAR: &'static str = "BUS_TRACKER_STATIC_DIR";
    pub const LOCATION_VAR: &'static str = "BUS_TRACKER_LOCATION";

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = match lookup(Self::ADDR_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddr {
                    var: Self::ADDR_VAR,
                    value,
                })?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let location = match lookup(Self::LOCATION_VAR) {
            // Skip geolocation entirely; riders get the fallback.
            Some(value) if value.trim().eq_ignore_ascii_case("none") => {
                Some(ConfiguredLocation::Unavailable)
            }
            Some(value) => match UserLocation::parse_pair(&value) {
                Some(location) => Some(ConfiguredLocation::Fixed(location)),
                None => {
                    return Err(ConfigError::InvalidLocation {
                        var: Self::LOCATION_VAR,
                        value,
                    });
                }
            },
            None => None,
        };

        let mut cta = CtaConfig::new();
        if let Some(url) = lookup(Self::BASE_URL_VAR) {
            cta = cta.with_base_url(url);
        }

        Ok(Self {
            addr,
            static_dir: lookup(Self::STATIC_DIR_VAR)
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            location,
            cta,
        })
    }
}
