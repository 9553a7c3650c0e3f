//! Field sales rewards backend.
//!
//! Orders flow in through the HTTP adapter, the domain services award
//! points, streaks and achievements, and PostgreSQL adapters persist the
//! results.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
