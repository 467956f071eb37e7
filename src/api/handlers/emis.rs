//! EMI handlers.

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
use crate::domain::{emi, Emi, EmiResponse, NewEmi};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::{PageMeta, PaginationParams};

use super::parse_object_id;

/// List filters accepted by `GET /api/emis`.
#[derive(Debug, Default, Deserialize)]
pub struct EmiListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub card_id: Option<String>,
    pub status: Option<String>,
}

impl EmiListQuery {
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

/// New EMI request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmiRequest {
    #[validate(length(min = 1, message = "Card id is required"))]
    pub card_id: String,
    #[validate(range(min = 1.0, message = "Principal must be positive"))]
    pub principal_amount: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be 0-100"))]
    pub interest_rate: f64,
    #[validate(range(min = 1, max = 360, message = "Tenure must be 1-360 months"))]
    pub tenure_months: u32,
    /// RFC 3339 timestamp
    pub start_date: ChronoDateTime<Utc>,
    pub description: Option<String>,
    pub merchant_name: Option<String>,
    pub product_name: Option<String>,
}

/// Standalone installment calculation request
#[derive(Debug, Deserialize, Validate)]
pub struct CalculatorRequest {
    #[validate(range(min = 1.0, message = "Principal must be positive"))]
    pub principal_amount: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be 0-100"))]
    pub interest_rate: f64,
    #[validate(range(min = 1, max = 360, message = "Tenure must be 1-360 months"))]
    pub tenure_months: u32,
}

/// EMI payment request
#[derive(Debug, Default, Deserialize)]
pub struct PayEmiRequest {
    /// Defaults to one monthly installment
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
struct EmiListResponse {
    emis: Vec<EmiResponse>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Debug, Serialize)]
struct CalculatorResponse {
    principal_amount: f64,
    interest_rate: f64,
    tenure_months: u32,
    emi_amount: f64,
    total_amount: f64,
    total_interest: f64,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_emis).post(create_emi))
        .route("/:id", get(get_emi))
        .route("/:id/pay", post(pay_emi))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/calculator", post(calculator))
        .merge(protected)
}

fn emis(state: &AppState) -> mongodb::Collection<Emi> {
    state.database.collection(emi::COLLECTION)
}

fn list_filter(current: &CurrentUser, query: &EmiListQuery) -> AppResult<Document> {
    let mut filter = doc! { "user_id": current.id };
    if let Some(ref card_id) = query.card_id {
        filter.insert("card_id", parse_object_id(card_id)?);
    }
    if let Some(ref status) = query.status {
        filter.insert("status", status);
    }
    Ok(filter)
}

/// List EMIs, newest first.
async fn list_emis(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<EmiListQuery>,
) -> AppResult<Json<EmiListResponse>> {
    let filter = list_filter(&current, &query)?;
    let params = query.pagination();

    let total = emis(&state).count_documents(filter.clone()).await?;
    let found: Vec<Emi> = emis(&state)
        .find(filter)
        .sort(doc! { "start_date": -1 })
        .skip(params.offset())
        .limit(params.limit() as i64)
        .await?
        .try_collect()
        .await?;

    Ok(Json(EmiListResponse {
        emis: found.into_iter().map(EmiResponse::from).collect(),
        meta: PageMeta::new(&params, total),
    }))
}

/// Open an EMI.
async fn create_emi(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateEmiRequest>,
) -> AppResult<(StatusCode, Json<EmiResponse>)> {
    let card_id = parse_object_id(&payload.card_id)?;
    let reference = bson::oid::ObjectId::new().to_hex();
    let emi = Emi::create(NewEmi {
        user_id: current.id,
        card_id,
        emi_id: format!("EMI{}", &reference[reference.len() - 5..].to_uppercase()),
        principal_amount: payload.principal_amount,
        interest_rate: payload.interest_rate,
        tenure_months: payload.tenure_months,
        start_date: DateTime::from_chrono(payload.start_date),
        description: payload.description,
        merchant_name: payload.merchant_name,
        product_name: payload.product_name,
    });

    emis(&state).insert_one(&emi).await?;

    Ok((StatusCode::CREATED, Json(EmiResponse::from(emi))))
}

/// Fetch one EMI.
async fn get_emi(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<EmiResponse>> {
    let emi_id = parse_object_id(&id)?;
    let found = emis(&state)
        .find_one(doc! { "_id": emi_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    Ok(Json(EmiResponse::from(found)))
}

/// Pay towards an EMI; defaults to one monthly installment.
async fn pay_emi(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Option<Json<PayEmiRequest>>,
) -> AppResult<Json<EmiResponse>> {
    let emi_id = parse_object_id(&id)?;
    let mut found = emis(&state)
        .find_one(doc! { "_id": emi_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    if found.status == "closed" {
        return Err(AppError::bad_request("EMI is already closed"));
    }

    let amount = payload
        .and_then(|Json(p)| p.amount)
        .unwrap_or(found.emi_amount);
    if amount <= 0.0 {
        return Err(AppError::validation("Payment amount must be positive"));
    }

    found.record_payment(amount);
    emis(&state)
        .update_one(
            doc! { "_id": emi_id },
            doc! { "$set": {
                "total_paid": found.total_paid,
                "remaining_amount": found.remaining_amount,
                "status": &found.status,
            }},
        )
        .await?;

    Ok(Json(EmiResponse::from(found)))
}

/// Pure installment calculation; no auth, no persistence.
async fn calculator(
    ValidatedJson(payload): ValidatedJson<CalculatorRequest>,
) -> Json<CalculatorResponse> {
    let emi_amount = emi::monthly_installment(
        payload.principal_amount,
        payload.interest_rate,
        payload.tenure_months,
    );
    let total_amount = (emi_amount * f64::from(payload.tenure_months) * 100.0).round() / 100.0;

    Json(CalculatorResponse {
        principal_amount: payload.principal_amount,
        interest_rate: payload.interest_rate,
        tenure_months: payload.tenure_months,
        emi_amount,
        total_amount,
        total_interest: ((total_amount - payload.principal_amount) * 100.0).round() / 100.0,
    })
}
