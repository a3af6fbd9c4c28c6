//! Order repository: generic document repository plus state transitions.

use common::EntityId;
use document_store::DocumentStore;

use crate::error::DomainError;
use crate::repository::Repository;

use super::{Order, OrderError, OrderState};

/// Repository for orders.
///
/// Delegates the generic operations to [`Repository`] and adds
/// `update_state`, which validates the transition against the state
/// machine's table before performing the same token-guarded write.
pub struct OrderRepository<S: DocumentStore> {
    inner: Repository<S, Order>,
}

impl<S: DocumentStore> OrderRepository<S> {
    /// Creates a new order repository backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    /// Loads an order by identity.
    pub async fn get(&self, id: EntityId) -> Result<Option<Order>, DomainError> {
        self.inner.get(id).await
    }

    /// Loads every order. Unfiltered scan.
    pub async fn get_all(&self) -> Result<Vec<Order>, DomainError> {
        self.inner.get_all().await
    }

    /// Persists a new order.
    pub async fn add(&self, order: Order) -> Result<Order, DomainError> {
        self.inner.add(order).await
    }

    /// Persists changes to an existing order, compare-and-swapping on the
    /// concurrency token.
    pub async fn update(&self, order: Order) -> Result<Order, DomainError> {
        self.inner.update(order).await
    }

    /// Transitions an order to a new state.
    ///
    /// Validates that `new_state` is reachable from the order's current
    /// state before writing; the write itself carries the same concurrency
    /// contract as `update`. A transition out of a terminal state fails
    /// regardless of token freshness.
    pub async fn update_state(
        &self,
        mut order: Order,
        new_state: OrderState,
    ) -> Result<Order, DomainError> {
        let current = order.state();
        if !current.can_transition_to(new_state) {
            return Err(OrderError::InvalidStateTransition {
                from: current,
                to: new_state,
            }
            .into());
        }

        order.set_state(new_state);
        self.inner.update(order).await
    }

    /// Deletes an order by identity. Returns the deleted count (0 or 1).
    pub async fn remove(&self, id: EntityId) -> Result<u64, DomainError> {
        self.inner.remove(id).await
    }
}
