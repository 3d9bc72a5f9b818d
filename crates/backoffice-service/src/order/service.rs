//! Order list, editing and inline status changes.

use std::sync::Arc;

use tracing::{info, warn};

use backoffice_backend::Backend;
use backoffice_backend::repositories::OrderRepository;
use backoffice_cache::{CachedCollection, CollectionSource, StoreSource};
use backoffice_core::types::OrderId;
use backoffice_core::{AppError, AppResult};
use backoffice_entity::order::{Order, OrderDraft, OrderPatch, OrderStatus, PaymentStatus};

use crate::views::OrderFilter;

/// Manages orders. The list screen reads from a cache that inline status
/// edits update optimistically.
#[derive(Debug, Clone)]
pub struct OrderService {
    repo: OrderRepository,
    cache: CachedCollection<Order>,
}

impl OrderService {
    pub fn new(backend: &Backend) -> Self {
        let source: Arc<dyn CollectionSource<Order>> = Arc::new(StoreSource::<Order>::new(
            backend.records.clone(),
            OrderRepository::list_query(),
        ));
        Self {
            repo: backend.orders(),
            cache: CachedCollection::new(source),
        }
    }

    /// The cached order list.
    pub fn cache(&self) -> &CachedCollection<Order> {
        &self.cache
    }

    /// Load every order, newest first with its member.
    pub async fn load(&self) -> AppResult<Vec<Order>> {
        self.cache.load().await
    }

    /// Cached orders passing `filter`.
    pub async fn filtered(&self, filter: &OrderFilter) -> Vec<Order> {
        filter.apply(&self.cache.snapshot().await)
    }

    pub async fn get(&self, id: OrderId) -> AppResult<Order> {
        self.repo.find_by_id(id).await
    }

    /// Validate the form and insert the order.
    ///
    /// Nothing is sent when validation fails.
    pub async fn create(&self, draft: OrderDraft) -> AppResult<Order> {
        let data = draft.build()?;
        let order = self.repo.create(&data).await?;
        info!(order_id = %order.id, member_id = %order.member_id, "Order created");
        self.refresh().await;
        Ok(order)
    }

    /// Validate the form and overwrite every editable field of `id`.
    pub async fn update(&self, id: OrderId, draft: OrderDraft) -> AppResult<Order> {
        let patch = OrderPatch::from(draft.build()?);
        let order = self.repo.update(id, &patch).await?;
        info!(order_id = %id, "Order updated");
        self.refresh().await;
        Ok(order)
    }

    pub async fn delete(&self, id: OrderId) -> AppResult<()> {
        self.repo.delete(id).await?;
        self.cache
            .replace_with(|orders| orders.retain(|o| o.id != id))
            .await;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Inline status change: shown at once, reverted by a reload if the
    /// backend rejects it.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> AppResult<()> {
        self.cache.update(id, OrderPatch::status(status)).await
    }

    /// Status and payment change from the status dialog.
    pub async fn set_statuses(
        &self,
        id: OrderId,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> AppResult<()> {
        self.cache
            .update(id, OrderPatch::statuses(status, payment_status))
            .await
    }

    /// Flip the payment status of a cached order. Returns the new value.
    pub async fn toggle_payment(&self, id: OrderId) -> AppResult<PaymentStatus> {
        let current = self
            .cache
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Order {id} is not loaded")))?;
        let next = current.payment_status.toggled();
        self.cache.update(id, OrderPatch::payment_status(next)).await?;
        Ok(next)
    }

    async fn refresh(&self) {
        if let Err(e) = self.cache.load().await {
            warn!(error = %e, "Order list refresh failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use backoffice_core::error::ErrorKind;
    use backoffice_entity::member::CreateMember;
    use backoffice_entity::order::FulfillmentMode;

    use super::*;
    use crate::fixtures::{memory_backend, today};
    use crate::views::StatusFilter;

    async fn juan(backend: &Backend) -> backoffice_entity::member::Member {
        backend
            .members()
            .create(&CreateMember::new("Juan Perez", None))
            .await
            .unwrap()
    }

    fn draft(member: &backoffice_entity::member::Member) -> OrderDraft {
        OrderDraft::default()
            .member(member.id)
            .variety("Amnesia")
            .quantity(Decimal::from(5))
            .total(Decimal::from(25000))
    }

    #[tokio::test]
    async fn test_pickup_order_has_no_address() {
        let (backend, _) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;

        let order = service
            .create(draft(&member).address("ignored"))
            .await
            .unwrap();
        assert_eq!(order.mode, FulfillmentMode::Pickup);
        assert!(order.address.is_none());
        assert_eq!(order.quantity, Decimal::from(5));
        assert_eq!(order.total, Decimal::from(25000));

        let cached = service.cache().snapshot().await;
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].member_name(), Some("Juan Perez"));
    }

    #[tokio::test]
    async fn test_delivery_without_address_fails_before_remote_call() {
        let (backend, store) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;
        store.fail_writes("pedidos");

        let err = service
            .create(draft(&member).mode(FulfillmentMode::Delivery))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.count("pedidos"), 0);

        let err = service
            .create(OrderDraft::quick(today()).variety("Amnesia").total(Decimal::ONE))
            .await
            .unwrap_err();
        assert_eq!(err.message, "member: select a member");
    }

    #[tokio::test]
    async fn test_inline_status_change_persists() {
        let (backend, _) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;
        let order = service.create(draft(&member)).await.unwrap();

        service
            .set_status(order.id, OrderStatus::OutForDelivery)
            .await
            .unwrap();
        assert_eq!(
            service.cache().get(order.id).await.unwrap().status,
            OrderStatus::OutForDelivery
        );
        assert_eq!(
            service.get(order.id).await.unwrap().status,
            OrderStatus::OutForDelivery
        );

        let filter = OrderFilter::default().status(StatusFilter::Only(OrderStatus::Pending));
        assert!(service.filtered(&filter).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_status_change_reloads() {
        let (backend, store) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;
        let order = service.create(draft(&member)).await.unwrap();
        store.fail_writes("pedidos");

        let err = service
            .set_status(order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Mutation);
        assert_eq!(
            service.cache().get(order.id).await.unwrap().status,
            OrderStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_toggle_payment() {
        let (backend, _) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;
        let order = service.create(draft(&member)).await.unwrap();

        assert_eq!(
            service.toggle_payment(order.id).await.unwrap(),
            PaymentStatus::Confirmed
        );
        assert_eq!(
            service.toggle_payment(order.id).await.unwrap(),
            PaymentStatus::Pending
        );

        let err = service.toggle_payment(OrderId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_full_update_and_delete() {
        let (backend, _) = memory_backend();
        let service = OrderService::new(&backend);
        let member = juan(&backend).await;
        let order = service.create(draft(&member)).await.unwrap();

        let edited = OrderDraft::from_order(&order)
            .mode(FulfillmentMode::Delivery)
            .address("Calle 1 234");
        let updated = service.update(order.id, edited).await.unwrap();
        assert_eq!(updated.address.as_deref(), Some("Calle 1 234"));

        service.delete(order.id).await.unwrap();
        assert!(service.cache().is_empty().await);
    }
}
