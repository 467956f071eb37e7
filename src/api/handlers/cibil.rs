//! CIBIL score handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use bson::{doc, DateTime};
use chrono::{DateTime as ChronoDateTime, Utc};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{cibil_score, CibilScore, CibilScoreResponse, NewCibilScore};
use crate::errors::{AppResult, OptionExt};

/// List filters accepted by `GET /api/cibil`.
#[derive(Debug, Default, Deserialize)]
pub struct CibilListQuery {
    #[serde(default)]
    pub current_only: bool,
}

/// New score snapshot request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCibilScoreRequest {
    #[validate(range(min = 300, max = 900, message = "Score must be 300-900"))]
    pub score: i32,
    /// RFC 3339 timestamp
    pub score_date: ChronoDateTime<Utc>,
    pub score_type: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Component scores must be 0-100"))]
    #[serde(default)]
    pub payment_history_score: i32,
    #[validate(range(min = 0, max = 100, message = "Component scores must be 0-100"))]
    #[serde(default)]
    pub credit_utilization_score: i32,
    #[validate(range(min = 0, max = 100, message = "Component scores must be 0-100"))]
    #[serde(default)]
    pub credit_age_score: i32,
    #[validate(range(min = 0, max = 100, message = "Component scores must be 0-100"))]
    #[serde(default)]
    pub credit_mix_score: i32,
    #[validate(range(min = 0, max = 100, message = "Component scores must be 0-100"))]
    #[serde(default)]
    pub new_credit_score: i32,
}

#[derive(Debug, Serialize)]
struct CibilListResponse {
    scores: Vec<CibilScoreResponse>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_scores).post(create_score))
        .route("/current", get(current_score))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn scores(state: &AppState) -> mongodb::Collection<CibilScore> {
    state.database.collection(cibil_score::COLLECTION)
}

/// Score history, newest first.
async fn list_scores(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<CibilListQuery>,
) -> AppResult<Json<CibilListResponse>> {
    let mut filter = doc! { "user_id": current.id };
    if query.current_only {
        filter.insert("is_current", true);
    }

    let found: Vec<CibilScore> = scores(&state)
        .find(filter)
        .sort(doc! { "score_date": -1 })
        .await?
        .try_collect()
        .await?;

    Ok(Json(CibilListResponse {
        scores: found.into_iter().map(CibilScoreResponse::from).collect(),
    }))
}

/// The current score snapshot.
async fn current_score(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<CibilScoreResponse>> {
    let found = scores(&state)
        .find_one(doc! { "user_id": current.id, "is_current": true })
        .sort(doc! { "score_date": -1 })
        .await?
        .ok_or_not_found()?;

    Ok(Json(CibilScoreResponse::from(found)))
}

/// Record a new snapshot; earlier snapshots stop being current.
async fn create_score(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCibilScoreRequest>,
) -> AppResult<(StatusCode, Json<CibilScoreResponse>)> {
    scores(&state)
        .update_many(
            doc! { "user_id": current.id, "is_current": true },
            doc! { "$set": { "is_current": false } },
        )
        .await?;

    let score = CibilScore::create(NewCibilScore {
        user_id: current.id,
        score: payload.score,
        score_date: DateTime::from_chrono(payload.score_date),
        score_type: payload.score_type.unwrap_or_else(|| "cibil".to_string()),
        payment_history_score: payload.payment_history_score,
        credit_utilization_score: payload.credit_utilization_score,
        credit_age_score: payload.credit_age_score,
        credit_mix_score: payload.credit_mix_score,
        new_credit_score: payload.new_credit_score,
    });
    scores(&state).insert_one(&score).await?;

    Ok((StatusCode::CREATED, Json(CibilScoreResponse::from(score))))
}
