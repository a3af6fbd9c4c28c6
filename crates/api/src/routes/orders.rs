//! Order command and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::ETag;
use document_store::DocumentStore;
use domain::{CustomerId, Entity, Money, Order, OrderItem, OrderState, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::customers::AddressPayload;
use super::{AppState, parse_entity_id};

// -- Wire types --

#[derive(Serialize, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: uuid::Uuid,
    pub product_name: String,
    pub product_price_cents: i64,
}

impl From<OrderItemPayload> for OrderItem {
    fn from(payload: OrderItemPayload) -> Self {
        OrderItem::new(
            ProductId::from_uuid(payload.product_id),
            payload.product_name,
            Money::from_cents(payload.product_price_cents),
        )
    }
}

impl From<&OrderItem> for OrderItemPayload {
    fn from(item: &OrderItem) -> Self {
        OrderItemPayload {
            product_id: item.product_id.as_uuid(),
            product_name: item.product_name.clone(),
            product_price_cents: item.product_price.cents(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: uuid::Uuid,
    /// Defaults to the current time when omitted.
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    pub shipping_address: AddressPayload,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    /// Concurrency token observed on the last read.
    pub etag: String,
    pub customer_id: uuid::Uuid,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    pub shipping_address: AddressPayload,
    pub state: OrderState,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    /// Concurrency token observed on the last read.
    pub etag: String,
}

/// Write-side response: the full entity including id and refreshed token.
#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub etag: String,
    pub customer_id: String,
    pub order_date: DateTime<Utc>,
    pub state: String,
    pub items: Vec<OrderItemPayload>,
    pub shipping_address: AddressPayload,
}

/// Read projection: shipping address flattened into the parent object and
/// the order total derived from the line items.
#[derive(Serialize)]
pub struct OrderView {
    pub id: String,
    pub customer_id: String,
    pub order_date: DateTime<Utc>,
    pub order_total_cents: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub order_state: String,
    pub etag: String,
}

fn to_response(order: &Order) -> OrderResponse {
    OrderResponse {
        id: order.id().map(|id| id.to_string()).unwrap_or_default(),
        etag: order.etag().map(ETag::to_string).unwrap_or_default(),
        customer_id: order.customer_id().to_string(),
        order_date: order.order_date(),
        state: order.state().to_string(),
        items: order.items().iter().map(Into::into).collect(),
        shipping_address: order.shipping_address().into(),
    }
}

fn to_view(order: &Order) -> OrderView {
    let address = order.shipping_address();
    OrderView {
        id: order.id().map(|id| id.to_string()).unwrap_or_default(),
        customer_id: order.customer_id().to_string(),
        order_date: order.order_date(),
        order_total_cents: order.total().cents(),
        street: address.street.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        postal_code: address.postal_code.clone(),
        order_state: order.state().to_string(),
        etag: order.etag().map(ETag::to_string).unwrap_or_default(),
    }
}

fn order_from_update(req: UpdateOrderRequest) -> Order {
    let mut order = Order::new(
        CustomerId::from_uuid(req.customer_id),
        req.order_date,
        req.items.into_iter().map(Into::into).collect(),
        req.shipping_address.into(),
    );
    order.set_state(req.state);
    order
}

// -- Handlers --

/// POST /orders — create a new order in the initial state.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let order = Order::new(
        CustomerId::from_uuid(req.customer_id),
        req.order_date.unwrap_or_else(Utc::now),
        req.items.into_iter().map(Into::into).collect(),
        req.shipping_address.into(),
    );
    let created = state.order_service.create(order).await?;

    Ok((axum::http::StatusCode::CREATED, Json(to_response(&created))))
}

/// PUT /orders/:id — update an order, compare-and-swapping on the token.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let entity_id = parse_entity_id(&id)?;

    let etag = ETag::from(req.etag.clone());
    let mut order = order_from_update(req);
    order.set_id(entity_id);
    order.set_etag(etag);

    let updated = state.order_service.update(order).await?;
    Ok(Json(to_response(&updated)))
}

/// DELETE /orders/:id — remove an order. Idempotent: an absent id still
/// yields 204.
#[tracing::instrument(skip(state))]
pub async fn remove<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    state.order_service.remove(entity_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// GET /orders/:id — load an order projection by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    let order = state
        .order_service
        .get(entity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(to_view(&order)))
}

/// GET /orders — list all order projections.
#[tracing::instrument(skip(state))]
pub async fn list<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let orders = state.order_service.get_all().await?;
    Ok(Json(orders.iter().map(to_view).collect()))
}

/// PUT /orders/:id/ship — transition an order to Shipped.
#[tracing::instrument(skip(state, req))]
pub async fn ship<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    let shipped = state
        .order_service
        .ship(entity_id, ETag::from(req.etag))
        .await?;

    Ok(Json(to_response(&shipped)))
}

/// PUT /orders/:id/cancel — transition an order to Cancelled.
#[tracing::instrument(skip(state, req))]
pub async fn cancel<S: DocumentStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let entity_id = parse_entity_id(&id)?;
    let cancelled = state
        .order_service
        .cancel(entity_id, ETag::from(req.etag))
        .await?;

    Ok(Json(to_response(&cancelled)))
}
