//! Customer command and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ETag;
use document_store::DocumentStore;
use domain::{Address, Customer, Entity};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::{AppState, parse_entity_id};

// -- Wire types --

/// Shipping address as carried in write payloads and responses.
#[derive(Serialize, Deserialize)]
pub struct AddressPayload {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl From<AddressPayload> for Address {
    fn from(payload: AddressPayload) -> Self {
        Address::new(
            payload.street,
            payload.city,
            payload.state,
            payload.country,
            payload.postal_code,
        )
    }
}

impl From<&Address> for AddressPayload {
    fn from(address: &Address) -> Self {
        AddressPayload {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country: address.country.clone(),
            postal_code: address.postal_code.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: AddressPayload,
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    /// Concurrency token observed on the last read.
    pub etag: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: AddressPayload,
}

/// Write-side response: the full entity including id and refreshed token.
#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub etag: String,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: AddressPayload,
}

/// Read projection: shipping address flattened into the parent object.
#[derive(Serialize)]
pub struct CustomerView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub etag: String,
}

fn to_response(customer: &Customer) -> CustomerResponse {
    CustomerResponse {
        id: customer.id().map(|id| id.to_string()).unwrap_or_default(),
        etag: customer.etag().map(ETag::to_string).unwrap_or_default(),
        first_name: customer.first_name().to_string(),
        last_name: customer.last_name().to_string(),
        shipping_address: customer.shipping_address().into(),
    }
}

fn to_view(customer: &Customer) -> CustomerView {
    let address = customer.shipping_address();
    CustomerView {
        id: customer.id().map(|id| id.to_string()).unwrap_or_default(),
        first_name: customer.first_name().to_string(),
        last_name: customer.last_name().to_string(),
        street: address.street.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        postal_code: address.postal_code.clone(),
        etag: customer.etag().map(ETag::to_string).unwrap_or_default(),
    }
}

// -- Handlers --

/// POST /customers — create a new customer.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(axum::http::StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = Customer::new(req.first_name, req.last_name, req.shipping_address.into());
    let created = state.customer_service.create(customer).await?;

    Ok((axum::http::StatusCode::CREATED, Json(to_response(&created))))
}

/// PUT /customers/:id — update a customer, compare-and-swapping on the token.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let entity_id = parse_entity_id(&id)?;

    let mut customer =
        Customer::new(req.first_name, req.last_name, req.shipping_address.into());
    customer.set_id(entity_id);
    customer.set_etag(ETag::from(req.etag));

    let updated = state.customer_service.update(customer).await?;
    Ok(Json(to_response(&updated)))
}

/// DELETE /customers/:id — remove a customer. Idempotent: an absent id
/// still yields 204.
#[tracing::instrument(skip(state))]
pub async fn remove<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    state.customer_service.remove(entity_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// GET /customers/:id — load a customer projection by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    let customer = state
        .customer_service
        .get(entity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer {id} not found")))?;

    Ok(Json(to_view(&customer)))
}

/// GET /customers — list all customer projections.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let customers = state.customer_service.get_all().await?;
    Ok(Json(customers.iter().map(to_view).collect()))
}
