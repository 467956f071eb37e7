//! Card management handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use bson::{doc, DateTime};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{card, Card, CardResponse, NewCard};
use crate::errors::{AppError, AppResult, OptionExt};

use super::parse_object_id;

/// New card request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 12, max = 19, message = "Card number must be 12-19 digits"))]
    pub card_number: String,
    #[validate(length(min = 1, message = "Card holder name is required"))]
    pub card_holder_name: String,
    #[validate(range(min = 1, max = 12, message = "Expiry month must be 1-12"))]
    pub expiry_month: u32,
    #[validate(range(min = 2000, message = "Expiry year is invalid"))]
    pub expiry_year: i32,
    #[validate(length(min = 3, max = 4, message = "CVV must be 3-4 digits"))]
    pub cvv: String,
    #[validate(length(min = 1, message = "Card type is required"))]
    pub card_type: String,
    #[validate(length(min = 1, message = "Card brand is required"))]
    pub card_brand: String,
    #[validate(length(min = 1, message = "Card name is required"))]
    pub card_name: String,
    #[validate(range(min = 0.0, message = "Credit limit cannot be negative"))]
    pub credit_limit: f64,
    #[validate(range(min = 1, max = 31, message = "Due date must be a day of month"))]
    #[serde(default = "default_due_date")]
    pub due_date: u32,
}

fn default_due_date() -> u32 {
    1
}

#[derive(Debug, Serialize)]
struct CardListResponse {
    cards: Vec<CardResponse>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/:id", get(get_card).delete(delete_card))
        .route("/:id/block", put(block_card))
        .route("/:id/unblock", put(unblock_card))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn cards(state: &AppState) -> mongodb::Collection<Card> {
    state.database.collection(card::COLLECTION)
}

/// List the authenticated user's cards.
async fn list_cards(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<CardListResponse>> {
    let found: Vec<Card> = cards(&state)
        .find(doc! { "user_id": current.id })
        .sort(doc! { "created_at": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(CardListResponse {
        cards: found.into_iter().map(CardResponse::from).collect(),
    }))
}

/// Add a card.
async fn create_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCardRequest>,
) -> AppResult<(StatusCode, Json<CardResponse>)> {
    let card = Card::create(NewCard {
        user_id: current.id,
        card_number: payload.card_number,
        card_holder_name: payload.card_holder_name,
        expiry_month: payload.expiry_month,
        expiry_year: payload.expiry_year,
        cvv: payload.cvv,
        card_type: payload.card_type,
        card_brand: payload.card_brand,
        card_name: payload.card_name,
        credit_limit: payload.credit_limit,
        due_date: payload.due_date,
    });

    cards(&state).insert_one(&card).await?;
    tracing::info!(card = %card.masked_number(), "card added");

    Ok((StatusCode::CREATED, Json(CardResponse::from(card))))
}

/// Fetch one card.
async fn get_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<CardResponse>> {
    let card_id = parse_object_id(&id)?;
    let card = cards(&state)
        .find_one(doc! { "_id": card_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    Ok(Json(CardResponse::from(card)))
}

/// Remove a card.
async fn delete_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let card_id = parse_object_id(&id)?;
    let result = cards(&state)
        .delete_one(doc! { "_id": card_id, "user_id": current.id })
        .await?;

    if result.deleted_count == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Block a card.
async fn block_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<CardResponse>> {
    set_blocked(&state, &current, &id, true).await
}

/// Unblock a card.
async fn unblock_card(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<CardResponse>> {
    set_blocked(&state, &current, &id, false).await
}

async fn set_blocked(
    state: &AppState,
    current: &CurrentUser,
    id: &str,
    blocked: bool,
) -> AppResult<Json<CardResponse>> {
    let card_id = parse_object_id(id)?;
    let filter = doc! { "_id": card_id, "user_id": current.id };

    let result = cards(state)
        .update_one(
            filter.clone(),
            doc! { "$set": { "is_blocked": blocked, "updated_at": DateTime::now() } },
        )
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound);
    }

    let card = cards(state).find_one(filter).await?.ok_or_not_found()?;
    Ok(Json(CardResponse::from(card)))
}
