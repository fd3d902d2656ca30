use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{CreateDriver, Driver, DriverRepository, DriverSignup, UpdateDriver};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for admin-managed driver records plus the self-signup listing.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/signup/credentials", get(list_signups))
        .route(
            "/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Driver>>> {
    Ok(Json(DriverRepository::list_manual(&state.db).await?))
}

async fn list_signups(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<DriverSignup>>> {
    Ok(Json(DriverRepository::list_signups(&state.db).await?))
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Driver>> {
    DriverRepository::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateDriver>,
) -> AppResult<(StatusCode, Json<Driver>)> {
    if input.name.trim().is_empty() || input.mobile.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and mobile are required".to_string(),
        ));
    }
    let driver = DriverRepository::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

async fn update_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateDriver>,
) -> AppResult<Json<Driver>> {
    DriverRepository::update(&state.db, id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

async fn delete_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = DriverRepository::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Driver not found".to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Driver deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, test_app};
    use tower::ServiceExt;

    #[tokio::test]
    async fn crud_round_trip() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/drivers",
                Some(serde_json::json!({"name": "Ravi Kumar", "mobile": "9876543210"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["status"], "active");

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/drivers/{}", id),
                Some(serde_json::json!({"kycStatus": "approved"})),
            ))
            .await
            .unwrap();
        let updated = json_body(response).await;
        assert_eq!(updated["kycStatus"], "approved");
        assert_eq!(updated["name"], "Ravi Kumar");

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/api/drivers/{}", id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", &format!("/api/drivers/{}", id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
