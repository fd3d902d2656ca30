use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{Notification, NotificationRepository, ReadScope};
use crate::error::{AppError, AppResult};
use crate::services::notifications::NotificationService;
use crate::AppState;

/// Router for the notification feed: admin list/create plus per-recipient
/// views used by the mobile apps.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
        .route("/driver/:driver_id", get(list_driver_notifications))
        .route("/driver/:driver_id/read-all", post(mark_driver_read))
        .route("/driver/:driver_id/unread-count", get(driver_unread_count))
        .route("/investor/:investor_id", get(list_investor_notifications))
        .route("/investor/:investor_id/read-all", post(mark_investor_read))
        .route(
            "/investor/:investor_id/unread-count",
            get(investor_unread_count),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub driver_id: Option<String>,
    pub investor_id: Option<String>,
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub pagination: Pagination,
}

fn page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (page.unwrap_or(1).max(1), limit.unwrap_or(20).clamp(1, 100))
}

/// Scope precedence: an explicit driver filter wins over an investor filter,
/// which wins over a raw recipientType/recipientId pair. With no filter the
/// admin sees everything.
fn resolve_scope(query: &ListQuery) -> Option<(String, String)> {
    if let Some(driver_id) = &query.driver_id {
        return Some(("driver".to_string(), driver_id.clone()));
    }
    if let Some(investor_id) = &query.investor_id {
        return Some(("investor".to_string(), investor_id.clone()));
    }
    match (&query.recipient_type, &query.recipient_id) {
        (Some(rtype), Some(rid)) => Some((rtype.clone(), rid.clone())),
        _ => None,
    }
}

async fn paged(
    state: &Arc<AppState>,
    page: i64,
    limit: i64,
    scope: Option<(&str, &str)>,
) -> AppResult<Json<NotificationPage>> {
    let (items, total) = NotificationRepository::list(&state.db, page, limit, scope).await?;
    Ok(Json(NotificationPage {
        items,
        pagination: Pagination {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        },
    }))
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<NotificationPage>> {
    let (page, limit) = page_params(query.page, query.limit);
    let scope = resolve_scope(&query);
    let scope_ref = scope.as_ref().map(|(t, i)| (t.as_str(), i.as_str()));
    paged(&state, page, limit, scope_ref).await
}

async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(input): Json<crate::db::CreateNotification>,
) -> AppResult<(StatusCode, Json<Notification>)> {
    if input.notification_type.trim().is_empty() {
        return Err(AppError::BadRequest("type is required".to_string()));
    }
    if input.title.as_deref().map_or(true, |t| t.trim().is_empty())
        && input
            .message
            .as_deref()
            .map_or(true, |m| m.trim().is_empty())
    {
        return Err(AppError::BadRequest(
            "title or message is required".to_string(),
        ));
    }

    let notification = NotificationService::new(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    NotificationRepository::mark_as_read(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllQuery {
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
}

/// Bulk mark-read. Both query params set marks that scope plus global
/// records; only recipientType marks that type plus untyped records; neither
/// marks everything.
async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadAllQuery>,
) -> AppResult<Json<ReadAllResponse>> {
    let scope = ReadScope::from_parts(query.recipient_type, query.recipient_id);
    let modified = NotificationRepository::mark_all_as_read(&state.db, &scope).await?;
    Ok(Json(ReadAllResponse {
        success: true,
        modified,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub success: bool,
    pub modified: u64,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub unread: i64,
}

async fn list_driver_notifications(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<NotificationPage>> {
    let (page, limit) = page_params(query.page, query.limit);
    paged(&state, page, limit, Some(("driver", &driver_id))).await
}

async fn mark_driver_read(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
) -> AppResult<Json<ReadAllResponse>> {
    let scope = ReadScope::Exact {
        recipient_type: "driver".to_string(),
        recipient_id: driver_id,
    };
    let modified = NotificationRepository::mark_all_as_read(&state.db, &scope).await?;
    Ok(Json(ReadAllResponse {
        success: true,
        modified,
    }))
}

async fn driver_unread_count(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
) -> AppResult<Json<UnreadResponse>> {
    let scope = ReadScope::Exact {
        recipient_type: "driver".to_string(),
        recipient_id: driver_id,
    };
    let unread = NotificationRepository::count_unread(&state.db, &scope).await?;
    Ok(Json(UnreadResponse { unread }))
}

async fn list_investor_notifications(
    State(state): State<Arc<AppState>>,
    Path(investor_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<NotificationPage>> {
    let (page, limit) = page_params(query.page, query.limit);
    paged(&state, page, limit, Some(("investor", &investor_id))).await
}

async fn mark_investor_read(
    State(state): State<Arc<AppState>>,
    Path(investor_id): Path<String>,
) -> AppResult<Json<ReadAllResponse>> {
    let scope = ReadScope::Exact {
        recipient_type: "investor".to_string(),
        recipient_id: investor_id,
    };
    let modified = NotificationRepository::mark_all_as_read(&state.db, &scope).await?;
    Ok(Json(ReadAllResponse {
        success: true,
        modified,
    }))
}

async fn investor_unread_count(
    State(state): State<Arc<AppState>>,
    Path(investor_id): Path<String>,
) -> AppResult<Json<UnreadResponse>> {
    let scope = ReadScope::Exact {
        recipient_type: "investor".to_string(),
        recipient_id: investor_id,
    };
    let unread = NotificationRepository::count_unread(&state.db, &scope).await?;
    Ok(Json(UnreadResponse { unread }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{request, test_app};
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    #[test]
    fn driver_filter_wins_over_raw_scope() {
        let query = ListQuery {
            driver_id: Some("D1".into()),
            investor_id: Some("I1".into()),
            recipient_type: Some("investor".into()),
            recipient_id: Some("I2".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_scope(&query),
            Some(("driver".to_string(), "D1".to_string()))
        );
    }

    #[test]
    fn partial_raw_scope_is_ignored() {
        let query = ListQuery {
            recipient_type: Some("driver".into()),
            ..Default::default()
        };
        assert_eq!(resolve_scope(&query), None);
    }

    #[tokio::test]
    async fn create_rejects_missing_type() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/notifications",
                Some(serde_json::json!({"type": "", "title": "Hi"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_requires_title_or_message() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/notifications",
                Some(serde_json::json!({"type": "announcement"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_then_list_and_mark_read() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/notifications",
                Some(serde_json::json!({
                    "type": "payment_due",
                    "title": "Rent due",
                    "recipientType": "driver",
                    "recipientId": "D1",
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = crate::test_util::json_body(response).await;
        assert_eq!(created["read"], false);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                "/api/notifications/driver/D1?page=1&limit=10",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = crate::test_util::json_body(response).await;
        assert_eq!(page["pagination"]["total"], 1);
        assert_eq!(page["items"][0]["type"], "payment_due");

        let id = created["id"].as_str().unwrap();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/notifications/{}/read", id),
                Some(serde_json::json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(
                "GET",
                "/api/notifications/driver/D1/unread-count",
                None,
            ))
            .await
            .unwrap();
        let body = crate::test_util::json_body(response).await;
        assert_eq!(body["unread"], 0);
    }

    #[tokio::test]
    async fn read_all_with_type_only_marks_typed_and_untyped() {
        let app = test_app().await;

        for recipient in [
            serde_json::json!({"recipientType": "driver", "recipientId": "D1"}),
            serde_json::json!({"recipientType": "investor", "recipientId": "I1"}),
            serde_json::json!({}),
        ] {
            let mut payload = serde_json::json!({"type": "announcement", "title": "Hi"});
            payload
                .as_object_mut()
                .unwrap()
                .extend(recipient.as_object().unwrap().clone());
            app.clone()
                .oneshot(request("POST", "/api/notifications", Some(payload)))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/notifications/read-all?recipientType=driver",
                None,
            ))
            .await
            .unwrap();
        // The driver-typed record plus the global one
        let body = crate::test_util::json_body(response).await;
        assert_eq!(body["modified"], 2);

        let response = app
            .oneshot(request(
                "GET",
                "/api/notifications/investor/I1/unread-count",
                None,
            ))
            .await
            .unwrap();
        let body = crate::test_util::json_body(response).await;
        assert_eq!(body["unread"], 1);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_404() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/notifications/nope/read")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
