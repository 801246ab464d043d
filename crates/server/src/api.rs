//! Product catalog JSON API.
//!
//! - `GET    /products`                 list every product
//! - `POST   /products`                 create a product, responds `201 {"id": n}`
//! - `GET    /products/{id}`            fetch one product
//! - `PUT    /products/{id}/quantity`   overwrite the stock quantity
//! - `DELETE /products/{id}`            remove a product

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use catalog_core::{InterfaceError, NewProduct, Product, ProductId};
use catalog_store::CatalogStore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiState {
    store: Arc<dyn CatalogStore>,
}

/// Missing fields fall back to zero values so that `{}` fails field
/// validation rather than body parsing.
#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn router(store: Arc<dyn CatalogStore>) -> Router {
    Router::new()
        .route("/products", get(list_products).post(add_product))
        .route("/products/{id}", get(get_product).delete(delete_product))
        .route("/products/{id}/quantity", put(update_quantity))
        .with_state(ApiState { store })
}

async fn list_products(State(state): State<ApiState>) -> Json<Vec<Product>> {
    Json(state.store.list().await)
}

async fn get_product(
    Path(raw_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&raw_id)?;
    let product = state.store.get(id).await.map_err(reject)?;
    Ok(Json(product))
}

async fn add_product(
    State(state): State<ApiState>,
    payload: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body: AddProductRequest = decode_body(&payload)?;

    let id = state
        .store
        .add(NewProduct::new(body.name, body.price, body.quantity))
        .await
        .map_err(reject)?;

    info!(event_name = "catalog.api.product_created", product_id = %id, "product created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn update_quantity(
    Path(raw_id): Path<String>,
    State(state): State<ApiState>,
    payload: Bytes,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&raw_id)?;
    let body: UpdateQuantityRequest = decode_body(&payload)?;

    state.store.update_quantity(id, body.quantity).await.map_err(reject)?;

    info!(
        event_name = "catalog.api.quantity_updated",
        product_id = %id,
        quantity = body.quantity,
        "product quantity updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_product(
    Path(raw_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let id = parse_product_id(&raw_id)?;
    state.store.delete(id).await.map_err(reject)?;

    info!(event_name = "catalog.api.product_deleted", product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Any signed integer is a well-formed id; non-positive ones simply never match.
fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<i64>().map(ProductId).map_err(|_| reject(InterfaceError::invalid_product_id()))
}

/// Clients are not required to send `Content-Type: application/json`.
fn decode_body<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ApiError> {
    Json::<T>::from_bytes(payload).map(|Json(body)| body).map_err(body_rejection)
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    warn!(
        event_name = "catalog.api.invalid_body",
        error = %rejection.body_text(),
        "request body rejected"
    );
    reject(InterfaceError::invalid_request_body())
}

fn reject(error: impl Into<InterfaceError>) -> ApiError {
    let error = error.into();
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    (status, Json(ErrorResponse { error: error.message().to_string() }))
}
