//! Order repository implementation.

use std::sync::Arc;

use tracing::info;

use backoffice_core::error::AppError;
use backoffice_core::result::AppResult;
use backoffice_core::traits::{Record, RecordStore};
use backoffice_core::types::{Expand, FilterField, MemberId, OrderId, SelectQuery, SortField};
use backoffice_entity::member::Member;
use backoffice_entity::order::{CreateOrder, Order, OrderPatch};

use super::{decode_row, decode_rows, single};

/// Repository for `pedidos`.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    store: Arc<dyn RecordStore>,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The list query: newest first, member expanded.
    pub fn list_query() -> SelectQuery {
        SelectQuery::all()
            .order_by(SortField::desc("created_at"))
            .expand(member_expansion())
    }

    /// All orders, newest first, with their member.
    pub async fn list(&self) -> AppResult<Vec<Order>> {
        let rows = self.store.select(Order::TABLE, &Self::list_query()).await?;
        decode_rows(Order::TABLE, rows)
    }

    /// Orders of one member, newest first.
    pub async fn list_by_member(&self, member_id: MemberId) -> AppResult<Vec<Order>> {
        let query = SelectQuery::all()
            .filter(FilterField::eq("socio_id", member_id))
            .order_by(SortField::desc("created_at"));
        let rows = self.store.select(Order::TABLE, &query).await?;
        decode_rows(Order::TABLE, rows)
    }

    /// Find an order by ID, with its member.
    pub async fn find_by_id(&self, id: OrderId) -> AppResult<Order> {
        let query = SelectQuery::all()
            .filter(FilterField::eq("id", id))
            .expand(member_expansion());
        let rows = self.store.select(Order::TABLE, &query).await?;
        rows.into_iter()
            .next()
            .map(|row| decode_row(Order::TABLE, row))
            .unwrap_or_else(|| Err(AppError::not_found(format!("Order {id} not found"))))
    }

    /// Insert an order.
    pub async fn create(&self, data: &CreateOrder) -> AppResult<Order> {
        let row = self
            .store
            .insert(Order::TABLE, serde_json::to_value(data)?)
            .await?;
        let order: Order = decode_row(Order::TABLE, row)?;
        info!(order_id = %order.id, member_id = %order.member_id, "Order created");
        Ok(order)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: OrderId, patch: &OrderPatch) -> AppResult<Order> {
        let rows = self
            .store
            .update(
                Order::TABLE,
                &[FilterField::eq("id", id)],
                serde_json::to_value(patch)?,
            )
            .await?;
        single(Order::TABLE, id, rows)
    }

    /// Delete an order.
    pub async fn delete(&self, id: OrderId) -> AppResult<()> {
        let removed = self
            .store
            .delete(Order::TABLE, &[FilterField::eq("id", id)])
            .await?;
        info!(order_id = %id, removed, "Order deleted");
        Ok(())
    }
}

fn member_expansion() -> Expand {
    Expand::new("socio", Member::TABLE, "socio_id")
}
