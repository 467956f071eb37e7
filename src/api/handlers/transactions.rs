//! Transaction handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use bson::{doc, DateTime, Document};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{card, transaction, Card, NewTransaction, Transaction, TransactionResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageMeta, PaginationParams};

use super::parse_object_id;

/// List filters accepted by `GET /api/transactions`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub card_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl TransactionListQuery {
    fn pagination(&self) -> PaginationParams {
        let mut params = PaginationParams::default();
        if let Some(page) = self.page {
            params.page = page;
        }
        if let Some(per_page) = self.per_page {
            params.per_page = per_page;
        }
        params
    }
}

/// New transaction request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, message = "Card id is required"))]
    pub card_id: String,
    #[validate(length(min = 1, message = "Merchant name is required"))]
    pub merchant_name: String,
    #[validate(length(min = 1, message = "Merchant category is required"))]
    pub merchant_category: String,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
    pub description: Option<String>,
    /// "debit" (default) or "credit"
    pub transaction_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
struct TransactionListResponse {
    transactions: Vec<TransactionResponse>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: &'static [&'static str],
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", get(get_transaction))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/categories", get(categories))
        .merge(protected)
}

fn transactions(state: &AppState) -> mongodb::Collection<Transaction> {
    state.database.collection(transaction::COLLECTION)
}

fn list_filter(current: &CurrentUser, query: &TransactionListQuery) -> AppResult<Document> {
    let mut filter = doc! { "user_id": current.id };
    if let Some(ref card_id) = query.card_id {
        filter.insert("card_id", parse_object_id(card_id)?);
    }
    if let Some(ref status) = query.status {
        filter.insert("status", status);
    }
    if let Some(ref tx_type) = query.transaction_type {
        filter.insert("transaction_type", tx_type);
    }
    Ok(filter)
}

/// List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<TransactionListResponse>> {
    let filter = list_filter(&current, &query)?;
    let params = query.pagination();

    let total = transactions(&state).count_documents(filter.clone()).await?;
    let found: Vec<Transaction> = transactions(&state)
        .find(filter)
        .sort(doc! { "transaction_date": -1 })
        .skip(params.offset())
        .limit(params.limit() as i64)
        .await?
        .try_collect()
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: found.into_iter().map(TransactionResponse::from).collect(),
        meta: PageMeta::new(&params, total),
    }))
}

/// Record a transaction and adjust the card's balances.
async fn create_transaction(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    let card_id = parse_object_id(&payload.card_id)?;
    let cards = state.database.collection::<Card>(card::COLLECTION);
    let card = cards
        .find_one(doc! { "_id": card_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;
    if card.is_blocked {
        return Err(AppError::bad_request("Card is blocked"));
    }

    let transaction_type = payload
        .transaction_type
        .unwrap_or_else(|| "debit".to_string());
    let reference = Uuid::new_v4().simple().to_string();
    let tx = Transaction::create(NewTransaction {
        user_id: current.id,
        card_id,
        transaction_id: format!("TXN{}", &reference[..10].to_uppercase()),
        merchant_name: payload.merchant_name,
        merchant_category: payload.merchant_category,
        amount: payload.amount,
        description: payload.description,
        transaction_type: transaction_type.clone(),
        location: payload.location,
    });

    transactions(&state).insert_one(&tx).await?;

    // Debits grow the outstanding balance; credits (refunds, payments)
    // shrink it.
    let delta = if transaction_type == "debit" {
        tx.amount
    } else {
        -tx.amount
    };
    cards
        .update_one(
            doc! { "_id": card_id },
            doc! {
                "$inc": { "outstanding_balance": delta, "available_credit": -delta },
                "$set": { "updated_at": DateTime::now() },
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionResponse::from(tx))))
}

/// Fetch one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<TransactionResponse>> {
    let tx_id = parse_object_id(&id)?;
    let tx = transactions(&state)
        .find_one(doc! { "_id": tx_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    Ok(Json(TransactionResponse::from(tx)))
}

/// Merchant categories; static, no auth needed.
async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: transaction::CATEGORIES,
    })
}
