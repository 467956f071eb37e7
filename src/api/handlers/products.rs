//! Product catalog handlers.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use bson::doc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::domain::{product, Product, ProductResponse};
use crate::errors::{AppResult, OptionExt};

use super::parse_object_id;

/// List filters accepted by `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProductListResponse {
    products: Vec<ProductResponse>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn products(state: &AppState) -> mongodb::Collection<Product> {
    state.database.collection(product::COLLECTION)
}

/// List catalog products, optionally filtered by category.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let mut filter = doc! {};
    if let Some(ref category) = query.category {
        filter.insert("category", category);
    }

    let found: Vec<Product> = products(&state)
        .find(filter)
        .sort(doc! { "name": 1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(ProductListResponse {
        products: found.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// Fetch one product.
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let product_id = parse_object_id(&id)?;
    let found = products(&state)
        .find_one(doc! { "_id": product_id })
        .await?
        .ok_or_not_found()?;

    Ok(Json(ProductResponse::from(found)))
}
