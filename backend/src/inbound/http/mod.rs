//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod achievements;
pub mod commission;
pub mod error;
pub mod goals;
pub mod health;
pub mod leaderboard;
pub mod orders;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
