//! Bill handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use bson::{doc, DateTime, Document};
use chrono::{DateTime as ChronoDateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{bill, Bill, BillResponse, NewBill};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageMeta, PaginationParams};

use super::parse_object_id;

/// List filters accepted by `GET /api/bills`.
#[derive(Debug, Default, Deserialize)]
pub struct BillListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub card_id: Option<String>,
    pub status: Option<String>,
}

impl BillListQuery {
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

/// New bill request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBillRequest {
    #[validate(length(min = 1, message = "Card id is required"))]
    pub card_id: String,
    #[validate(length(min = 1, message = "Biller name is required"))]
    pub biller_name: String,
    #[validate(length(min = 1, message = "Biller category is required"))]
    pub biller_category: String,
    #[validate(length(min = 1, message = "Bill type is required"))]
    pub bill_type: String,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
    /// RFC 3339 timestamp
    pub due_date: ChronoDateTime<Utc>,
    pub bill_number: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
}

#[derive(Debug, Serialize)]
struct BillListResponse {
    bills: Vec<BillResponse>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Debug, Serialize)]
struct BillTypesResponse {
    types: &'static [&'static str],
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_bills).post(create_bill))
        .route("/:id", get(get_bill))
        .route("/:id/pay", post(pay_bill))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/types", get(bill_types)).merge(protected)
}

fn bills(state: &AppState) -> mongodb::Collection<Bill> {
    state.database.collection(bill::COLLECTION)
}

fn list_filter(current: &CurrentUser, query: &BillListQuery) -> AppResult<Document> {
    let mut filter = doc! { "user_id": current.id };
    if let Some(ref card_id) = query.card_id {
        filter.insert("card_id", parse_object_id(card_id)?);
    }
    if let Some(ref status) = query.status {
        filter.insert("status", status);
    }
    Ok(filter)
}

/// List bills ordered by due date.
async fn list_bills(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BillListQuery>,
) -> AppResult<Json<BillListResponse>> {
    let filter = list_filter(&current, &query)?;
    let params = query.pagination();

    let total = bills(&state).count_documents(filter.clone()).await?;
    let found: Vec<Bill> = bills(&state)
        .find(filter)
        .sort(doc! { "due_date": 1 })
        .skip(params.offset())
        .limit(params.limit() as i64)
        .await?
        .try_collect()
        .await?;

    Ok(Json(BillListResponse {
        bills: found.into_iter().map(BillResponse::from).collect(),
        meta: PageMeta::new(&params, total),
    }))
}

/// Register a bill.
async fn create_bill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateBillRequest>,
) -> AppResult<(StatusCode, Json<BillResponse>)> {
    if !bill::BILL_TYPES.contains(&payload.bill_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unknown bill type: {}",
            payload.bill_type
        )));
    }

    let card_id = parse_object_id(&payload.card_id)?;
    let reference = bson::oid::ObjectId::new().to_hex();
    let bill = Bill::create(NewBill {
        user_id: current.id,
        card_id,
        bill_id: format!("BILL{}", &reference[reference.len() - 6..].to_uppercase()),
        biller_name: payload.biller_name,
        biller_category: payload.biller_category,
        bill_type: payload.bill_type,
        amount: payload.amount,
        due_date: DateTime::from_chrono(payload.due_date),
        bill_number: payload.bill_number,
        is_recurring: payload.is_recurring,
        recurring_frequency: payload.recurring_frequency,
    });

    bills(&state).insert_one(&bill).await?;

    Ok((StatusCode::CREATED, Json(BillResponse::from(bill))))
}

/// Fetch one bill.
async fn get_bill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<BillResponse>> {
    let bill_id = parse_object_id(&id)?;
    let found = bills(&state)
        .find_one(doc! { "_id": bill_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    Ok(Json(BillResponse::from(found)))
}

/// Pay a bill.
async fn pay_bill(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<BillResponse>> {
    let bill_id = parse_object_id(&id)?;
    let mut found = bills(&state)
        .find_one(doc! { "_id": bill_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    if found.status == "paid" {
        return Err(AppError::bad_request("Bill is already paid"));
    }

    found.mark_paid();
    bills(&state)
        .update_one(
            doc! { "_id": bill_id },
            doc! { "$set": {
                "status": &found.status,
                "paid_date": found.paid_date,
                "updated_at": found.updated_at,
            }},
        )
        .await?;

    Ok(Json(BillResponse::from(found)))
}

/// Recognized bill types; static, no auth needed.
async fn bill_types() -> Json<BillTypesResponse> {
    Json(BillTypesResponse {
        types: bill::BILL_TYPES,
    })
}
