//! Notification handlers.

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use bson::doc;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{notification, Notification, NotificationResponse};
use crate::errors::{AppResult, OptionExt};
use crate::types::{PageMeta, PaginationParams};

use super::parse_object_id;

/// List filters accepted by `GET /api/notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationListQuery {
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

#[derive(Debug, Serialize)]
struct NotificationListResponse {
    notifications: Vec<NotificationResponse>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Debug, Serialize)]
struct UnreadCountResponse {
    unread: u64,
}

#[derive(Debug, Serialize)]
struct ReadAllResponse {
    marked_read: u64,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", put(mark_read))
        .route("/read-all", put(mark_all_read))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn notifications(state: &AppState) -> mongodb::Collection<Notification> {
    state.database.collection(notification::COLLECTION)
}

/// List notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<NotificationListQuery>,
) -> AppResult<Json<NotificationListResponse>> {
    let mut filter = doc! { "user_id": current.id };
    if query.unread_only {
        filter.insert("is_read", false);
    }
    let params = query.pagination();

    let total = notifications(&state)
        .count_documents(filter.clone())
        .await?;
    let found: Vec<Notification> = notifications(&state)
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(params.offset())
        .limit(params.limit() as i64)
        .await?
        .try_collect()
        .await?;

    Ok(Json(NotificationListResponse {
        notifications: found.into_iter().map(NotificationResponse::from).collect(),
        meta: PageMeta::new(&params, total),
    }))
}

/// Count of unread notifications.
async fn unread_count(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UnreadCountResponse>> {
    let unread = notifications(&state)
        .count_documents(doc! { "user_id": current.id, "is_read": false })
        .await?;

    Ok(Json(UnreadCountResponse { unread }))
}

/// Mark one notification read.
async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let notification_id = parse_object_id(&id)?;
    let mut found = notifications(&state)
        .find_one(doc! { "_id": notification_id, "user_id": current.id })
        .await?
        .ok_or_not_found()?;

    if !found.is_read {
        found.mark_as_read();
        notifications(&state)
            .update_one(
                doc! { "_id": notification_id },
                doc! { "$set": { "is_read": true, "read_at": found.read_at } },
            )
            .await?;
    }

    Ok(Json(NotificationResponse::from(found)))
}

/// Mark every notification read.
async fn mark_all_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<ReadAllResponse>> {
    let result = notifications(&state)
        .update_many(
            doc! { "user_id": current.id, "is_read": false },
            doc! { "$set": { "is_read": true, "read_at": bson::DateTime::now() } },
        )
        .await?;

    Ok(Json(ReadAllResponse {
        marked_read: result.modified_count,
    }))
}
