//! Driving port for order listings.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthenticatedUser, Error, Order};

/// Which orders a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderScope {
    /// Orders owned by the caller.
    #[default]
    Mine,
    /// Every order; managers and admins only.
    All,
}

impl FromStr for OrderScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "mine" => Ok(Self::Mine),
            "all" => Ok(Self::All),
            other => Err(format!("scope must be mine or all (got {other})")),
        }
    }
}

/// Domain use-case port for listing orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Orders visible to `user` in `scope`, newest first.
    async fn list_orders(&self, user: &AuthenticatedUser, scope: OrderScope)
    -> Result<Vec<Order>, Error>;
}

/// Fixture query returning no orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderQuery;

#[async_trait]
impl OrderQuery for FixtureOrderQuery {
    async fn list_orders(
        &self,
        _user: &AuthenticatedUser,
        _scope: OrderScope,
    ) -> Result<Vec<Order>, Error> {
        Ok(Vec::new())
    }
}
