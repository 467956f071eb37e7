//! Order handlers.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use bson::doc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{order, product, Order, OrderItem, OrderResponse, Product};
use crate::errors::{AppError, AppResult};

use super::parse_object_id;

/// One requested line item.
#[derive(Debug, Deserialize, Serialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// New order request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize)]
struct OrderListResponse {
    orders: Vec<OrderResponse>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn orders(state: &AppState) -> mongodb::Collection<Order> {
    state.database.collection(order::COLLECTION)
}

/// List the authenticated user's orders, newest first.
async fn list_orders(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<OrderListResponse>> {
    let found: Vec<Order> = orders(&state)
        .find(doc! { "user_id": current.id })
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(OrderListResponse {
        orders: found.into_iter().map(OrderResponse::from).collect(),
    }))
}

/// Place an order; prices come from the catalog, not the client.
async fn create_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let products = state.database.collection::<Product>(product::COLLECTION);

    let mut items = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        if item.quantity == 0 {
            return Err(AppError::validation("Item quantity must be positive"));
        }
        let product_id = parse_object_id(&item.product_id)?;
        let product = products
            .find_one(doc! { "_id": product_id })
            .await?
            .ok_or_else(|| AppError::bad_request(format!("Unknown product: {}", item.product_id)))?;
        if !product.in_stock {
            return Err(AppError::bad_request(format!(
                "Product out of stock: {}",
                product.name
            )));
        }
        items.push(OrderItem {
            product_id,
            quantity: item.quantity,
            price: product.price,
        });
    }

    let order = Order::create(current.id, items);
    orders(&state).insert_one(&order).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}
