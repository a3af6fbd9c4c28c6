//! Order service providing the command-side API for order operations.

use common::{ETag, EntityId};
use document_store::DocumentStore;

use crate::entity::Entity;
use crate::error::DomainError;

use super::{Order, OrderRepository, OrderState};

/// Service for managing orders.
///
/// Wraps the order repository and implements the command handlers: plain
/// CRUD delegation plus the ship/cancel state transitions. Errors are
/// never swallowed or retried here; they propagate to the boundary.
pub struct OrderService<S: DocumentStore> {
    repository: OrderRepository<S>,
}

impl<S: DocumentStore> OrderService<S> {
    /// Creates a new order service with the given document store.
    pub fn new(store: S) -> Self {
        Self {
            repository: OrderRepository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &OrderRepository<S> {
        &self.repository
    }

    /// Creates a new order.
    #[tracing::instrument(skip(self, order))]
    pub async fn create(&self, order: Order) -> Result<Order, DomainError> {
        self.repository.add(order).await
    }

    /// Updates an existing order. The order must carry the concurrency
    /// token observed on the last read.
    #[tracing::instrument(skip(self, order))]
    pub async fn update(&self, order: Order) -> Result<Order, DomainError> {
        self.repository.update(order).await
    }

    /// Removes an order by id. Idempotent: returns the deleted count.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: EntityId) -> Result<u64, DomainError> {
        self.repository.remove(id).await
    }

    /// Loads an order by id.
    ///
    /// Returns None if the order doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: EntityId) -> Result<Option<Order>, DomainError> {
        self.repository.get(id).await
    }

    /// Loads all orders.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        self.repository.get_all().await
    }

    /// Ships an order.
    ///
    /// Loads the order, substitutes the token the caller last observed, and
    /// transitions to `Shipped`. Fails with `EntityNotFound` if the id is
    /// unknown, `InvalidStateTransition` if the order is already terminal,
    /// and `ConcurrencyConflict` if the caller's token is stale.
    #[tracing::instrument(skip(self))]
    pub async fn ship(&self, id: EntityId, expected: ETag) -> Result<Order, DomainError> {
        self.transition(id, expected, OrderState::Shipped).await
    }

    /// Cancels an order. Same contract as `ship`, targeting `Cancelled`.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: EntityId, expected: ETag) -> Result<Order, DomainError> {
        self.transition(id, expected, OrderState::Cancelled).await
    }

    async fn transition(
        &self,
        id: EntityId,
        expected: ETag,
        new_state: OrderState,
    ) -> Result<Order, DomainError> {
        let mut order = self
            .repository
            .get(id)
            .await?
            .ok_or(DomainError::EntityNotFound {
                entity_type: Order::collection(),
                id,
            })?;

        // The caller-observed token drives the compare-and-swap, so a
        // stale caller fails instead of silently overwriting.
        order.set_etag(expected);
        self.repository.update_state(order, new_state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::order::{CustomerId, Money, OrderError, OrderItem, ProductId};
    use chrono::Utc;
    use document_store::{DocumentStoreError, InMemoryDocumentStore};

    fn test_order() -> Order {
        Order::new(
            CustomerId::new(),
            Utc::now(),
            vec![
                OrderItem::new(ProductId::new(), "Widget", Money::from_cents(1000)),
                OrderItem::new(ProductId::new(), "Gadget", Money::from_cents(500)),
            ],
            Address::new("1 Main St", "Springfield", "IL", "USA", "62701"),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_token() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();

        assert!(created.id().is_some());
        assert!(created.etag().is_some());
        assert_eq!(created.state(), OrderState::Created);
    }

    #[tokio::test]
    async fn test_create_then_get_returns_equal_order() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let loaded = service.get(created.id().unwrap()).await.unwrap().unwrap();

        assert_eq!(loaded.id(), created.id());
        assert_eq!(loaded.etag(), created.etag());
        assert_eq!(loaded.customer_id(), created.customer_id());
        assert_eq!(loaded.items(), created.items());
        assert_eq!(loaded.total().cents(), 1500);
    }

    #[tokio::test]
    async fn test_ship_order() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let id = created.id().unwrap();
        let tag = created.etag().cloned().unwrap();

        let shipped = service.ship(id, tag.clone()).await.unwrap();

        assert_eq!(shipped.state(), OrderState::Shipped);
        assert_ne!(shipped.etag(), Some(&tag));
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let cancelled = service
            .cancel(created.id().unwrap(), created.etag().cloned().unwrap())
            .await
            .unwrap();

        assert_eq!(cancelled.state(), OrderState::Cancelled);
        assert!(cancelled.is_terminal());
    }

    #[tokio::test]
    async fn test_ship_unknown_order_is_not_found() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let result = service.ship(EntityId::new(), ETag::generate()).await;
        assert!(matches!(result, Err(DomainError::EntityNotFound { .. })));
    }

    #[tokio::test]
    async fn test_ship_cancelled_order_fails_despite_fresh_token() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let id = created.id().unwrap();
        let cancelled = service
            .cancel(id, created.etag().cloned().unwrap())
            .await
            .unwrap();

        // Current token, terminal state: the transition check fires first
        let result = service.ship(id, cancelled.etag().cloned().unwrap()).await;

        assert!(matches!(
            result,
            Err(DomainError::Order(
                OrderError::InvalidStateTransition { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_ship_with_stale_token_conflicts() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let id = created.id().unwrap();
        let stale_tag = created.etag().cloned().unwrap();

        // Another writer updates the order first
        service.update(created).await.unwrap();

        let result = service.ship(id, stale_tag).await;
        assert!(matches!(
            result,
            Err(DomainError::Store(
                DocumentStoreError::ConcurrencyConflict { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        let created = service.create(test_order()).await.unwrap();
        let id = created.id().unwrap();

        assert_eq!(service.remove(id).await.unwrap(), 1);
        assert!(service.get(id).await.unwrap().is_none());
        assert_eq!(service.remove(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_all() {
        let service = OrderService::new(InMemoryDocumentStore::new());

        service.create(test_order()).await.unwrap();
        service.create(test_order()).await.unwrap();

        let all = service.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
