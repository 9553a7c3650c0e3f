//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; rows (`models.rs`) and table definitions (`schema.rs`) never leave
//! this module. Connections come from a shared `bb8` pool through
//! `diesel-async`, and every Diesel failure is mapped onto the port's
//! `Connection`/`Query` error variants.
//!
//! # Example
//!
//! ```no_run
//! use fieldsales::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fieldsales")).await?;
//! let orders = DieselOrderRepository::new(pool.clone());
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```

mod diesel_achievement_repository;
mod diesel_commission_rate_repository;
mod diesel_goal_repository;
mod diesel_leaderboard_repository;
mod diesel_order_repository;
mod diesel_rank_snapshot_repository;
mod diesel_user_directory;
mod diesel_user_stats_repository;
pub(crate) mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_achievement_repository::DieselAchievementRepository;
pub use diesel_commission_rate_repository::DieselCommissionRateRepository;
pub use diesel_goal_repository::DieselGoalRepository;
pub use diesel_leaderboard_repository::DieselLeaderboardRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_rank_snapshot_repository::DieselRankSnapshotRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use diesel_user_stats_repository::DieselUserStatsRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
