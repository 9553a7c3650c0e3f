//! Application settings loaded via OrthoConfig.
//!
//! Values come from `FIELDSALES_*` environment variables, configuration
//! files or command-line flags. Session cookie settings are handled
//! separately by [`crate::inbound::http::session_config`].

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{BusinessCalendar, ParseTimeRangeError, TimeRange};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("utc offset of {minutes} minutes is outside +/-23:59")]
    UtcOffset { minutes: i32 },
    #[error("invalid rank window: {0}")]
    RankWindow(#[from] ParseTimeRangeError),
}

/// Start-up configuration for the fieldsales server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FIELDSALES")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server runs on fixtures.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
    /// Offset of the business day from UTC, in minutes.
    pub utc_offset_minutes: Option<i32>,
    /// Window used when reporting rank movement after a sale.
    pub rank_window: Option<String>,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Calendar for the configured business timezone; UTC when unset.
    pub fn calendar(&self) -> Result<BusinessCalendar, SettingsError> {
        match self.utc_offset_minutes {
            None => Ok(BusinessCalendar::utc()),
            Some(minutes) => BusinessCalendar::with_offset_minutes(minutes)
                .ok_or(SettingsError::UtcOffset { minutes }),
        }
    }

    /// Rank window, defaulting to the current week.
    pub fn rank_window(&self) -> Result<TimeRange, SettingsError> {
        match self.rank_window.as_deref() {
            None => Ok(TimeRange::Week),
            Some(value) => Ok(value.parse()?),
        }
    }
}
