//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use fieldsales::domain::{BusinessCalendar, TimeRange};
use fieldsales::inbound::http::session_config::SessionSettings;
use fieldsales::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) calendar: BusinessCalendar,
    pub(crate) rank_window: TimeRange,
}

impl ServerConfig {
    /// Construct a server configuration from the session settings and bind
    /// address. Business days default to UTC and rank movement to the week.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            calendar: BusinessCalendar::utc(),
            rank_window: TimeRange::Week,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool every port falls back to its fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: BusinessCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Window used when reporting rank movement after a sale.
    #[must_use]
    pub fn with_rank_window(mut self, rank_window: TimeRange) -> Self {
        self.rank_window = rank_window;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
