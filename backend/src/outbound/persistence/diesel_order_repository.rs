//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, OrderStatus, UserId};

use super::error_mapping::{column_u32, column_u64, db_i32, port_error_mapping};
use super::models::{NewOrderRow, OrderRow};
use super::pool::DbPool;
use super::schema::orders;

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(OrderRepositoryError, "orders");

/// Convert a stored row into a domain order.
///
/// Unknown enum strings mean the row was written outside this service.
fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let corrupt = |err: crate::domain::ParseOrderFieldError| {
        OrderRepositoryError::query(format!("order {}: {err}", row.id))
    };
    Ok(Order {
        id: OrderId::from_uuid(row.id),
        salesperson_id: UserId::from_uuid(row.salesperson_id),
        plan_type: row.plan_type.parse().map_err(corrupt)?,
        sale_type: row.sale_type.parse().map_err(corrupt)?,
        status: row.status.parse().map_err(corrupt)?,
        add_ons_count: column_u32(row.add_ons_count),
        commission_cents: row.commission_cents,
        points_awarded: row.points_awarded.map(column_u32),
        created_at: row.created_at,
        customer_name: row.customer_name,
        customer_address: row.customer_address,
    })
}

fn rows_to_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, OrderRepositoryError> {
    rows.into_iter().map(row_to_order).collect()
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewOrderRow {
            id: *order.id.as_uuid(),
            salesperson_id: *order.salesperson_id.as_uuid(),
            customer_name: &order.customer_name,
            customer_address: &order.customer_address,
            plan_type: order.plan_type.as_str(),
            sale_type: order.sale_type.as_str(),
            add_ons_count: db_i32(order.add_ons_count),
            status: order.status.as_str(),
            commission_cents: order.commission_cents,
            points_awarded: order.points_awarded.map(db_i32),
            created_at: order.created_at,
        };
        diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = orders::table
            .filter(orders::id.eq(id.as_uuid()))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }

    async fn list_for_salesperson(
        &self,
        salesperson_id: &UserId,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::salesperson_id.eq(salesperson_id.as_uuid()))
            .select(OrderRow::as_select())
            .order_by((orders::created_at.desc(), orders::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_orders(rows)
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .select(OrderRow::as_select())
            .order_by((orders::created_at.desc(), orders::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_orders(rows)
    }

    async fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<OrderRow> = diesel::update(orders::table)
            .filter(orders::id.eq(id.as_uuid()))
            .filter(orders::status.eq(expected.as_str()))
            .set((
                orders::status.eq(next.as_str()),
                orders::updated_at.eq(diesel::dsl::now),
            ))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }

    async fn count_qualifying(&self, salesperson_id: &UserId) -> Result<u64, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = orders::table
            .filter(orders::salesperson_id.eq(salesperson_id.as_uuid()))
            .filter(orders::status.ne(OrderStatus::Cancelled.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(column_u64(count))
    }
}
