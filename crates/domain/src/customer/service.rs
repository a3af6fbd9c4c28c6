//! Customer service providing the command-side API for customer operations.

use common::EntityId;
use document_store::DocumentStore;

use crate::error::DomainError;
use crate::repository::Repository;

use super::Customer;

/// Service for managing customers.
///
/// Thin command handler over the generic repository: every operation is a
/// single store call, and failures propagate unchanged.
pub struct CustomerService<S: DocumentStore> {
    repository: Repository<S, Customer>,
}

impl<S: DocumentStore> CustomerService<S> {
    /// Creates a new customer service with the given document store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Customer> {
        &self.repository
    }

    /// Creates a new customer.
    #[tracing::instrument(skip(self, customer))]
    pub async fn create(&self, customer: Customer) -> Result<Customer, DomainError> {
        self.repository.add(customer).await
    }

    /// Updates an existing customer. The customer must carry the
    /// concurrency token observed on the last read.
    #[tracing::instrument(skip(self, customer))]
    pub async fn update(&self, customer: Customer) -> Result<Customer, DomainError> {
        self.repository.update(customer).await
    }

    /// Removes a customer by id. Idempotent: returns the deleted count.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: EntityId) -> Result<u64, DomainError> {
        self.repository.remove(id).await
    }

    /// Loads a customer by id.
    ///
    /// Returns None if the customer doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: EntityId) -> Result<Option<Customer>, DomainError> {
        self.repository.get(id).await
    }

    /// Loads all customers.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Customer>, DomainError> {
        self.repository.get_all().await
    }
}
