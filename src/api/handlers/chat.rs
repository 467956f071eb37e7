//! In-app finance assistant handlers.
//!
//! The assistant answers a handful of account questions from live data
//! and falls back to a help message; every exchange is persisted.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use bson::doc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::chat_message::ChatMessageResponse;
use crate::domain::{bill, card, chat_message, cibil_score, Bill, Card, ChatMessage, CibilScore};
use crate::errors::AppResult;

/// Number of past exchanges returned by the history endpoint.
const HISTORY_LIMIT: i64 = 50;

/// Chat message request
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ChatHistoryResponse {
    messages: Vec<ChatMessageResponse>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/message", post(send_message))
        .route("/history", get(history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Answer a message and persist the exchange.
async fn send_message(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<Json<ChatMessageResponse>> {
    let reply = build_reply(&state, &current, &payload.message).await?;

    let exchange = ChatMessage::create(current.id, payload.message, reply);
    state
        .database
        .collection::<ChatMessage>(chat_message::COLLECTION)
        .insert_one(&exchange)
        .await?;

    Ok(Json(ChatMessageResponse::from(exchange)))
}

/// Recent exchanges, newest first.
async fn history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ChatHistoryResponse>> {
    let found: Vec<ChatMessage> = state
        .database
        .collection::<ChatMessage>(chat_message::COLLECTION)
        .find(doc! { "user_id": current.id })
        .sort(doc! { "created_at": -1 })
        .limit(HISTORY_LIMIT)
        .await?
        .try_collect()
        .await?;

    Ok(Json(ChatHistoryResponse {
        messages: found.into_iter().map(ChatMessageResponse::from).collect(),
    }))
}

/// Keyword-routed answers over the user's own records.
async fn build_reply(state: &AppState, current: &CurrentUser, message: &str) -> AppResult<String> {
    let lower = message.to_lowercase();

    if lower.contains("balance") || lower.contains("outstanding") {
        let cards: Vec<Card> = state
            .database
            .collection::<Card>(card::COLLECTION)
            .find(doc! { "user_id": current.id })
            .await?
            .try_collect()
            .await?;
        if cards.is_empty() {
            return Ok("You have no cards on file yet.".to_string());
        }
        let total: f64 = cards.iter().map(|c| c.outstanding_balance).sum();
        return Ok(format!(
            "Your total outstanding balance across {} card(s) is ₹{total:.2}.",
            cards.len()
        ));
    }

    if lower.contains("bill") || lower.contains("due") {
        let next = state
            .database
            .collection::<Bill>(bill::COLLECTION)
            .find_one(doc! { "user_id": current.id, "status": "unpaid" })
            .sort(doc! { "due_date": 1 })
            .await?;
        return Ok(match next {
            Some(bill) => format!(
                "Your next bill is {} for ₹{:.2}, due {}.",
                bill.biller_name,
                bill.amount,
                bill.due_date.to_chrono().format("%d %b %Y")
            ),
            None => "You have no unpaid bills. Nice.".to_string(),
        });
    }

    if lower.contains("cibil") || lower.contains("score") {
        let score = state
            .database
            .collection::<CibilScore>(cibil_score::COLLECTION)
            .find_one(doc! { "user_id": current.id, "is_current": true })
            .await?;
        return Ok(match score {
            Some(s) => format!("Your current CIBIL score is {}.", s.score),
            None => "No CIBIL score on record yet.".to_string(),
        });
    }

    Ok("I can help with your card balance, upcoming bills, or CIBIL score. \
        Try asking about one of those."
        .to_string())
}
