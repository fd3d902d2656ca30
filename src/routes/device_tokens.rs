use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{
    DeviceToken, DeviceTokenRepository, DriverRepository, InvestorRepository, RegisterDeviceToken,
};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for device token registration. The by-mobile variants let the apps
/// register before they know their signup id.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tokens).post(register_token))
        .route("/register-driver-by-mobile", post(register_driver_by_mobile))
        .route(
            "/register-investor-by-mobile",
            post(register_investor_by_mobile),
        )
        .route("/:token", delete(remove_token))
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: DeviceToken,
}

async fn register_token(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<RegisterDeviceToken>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if registration.token.trim().is_empty() {
        return Err(AppError::BadRequest("token is required".to_string()));
    }

    let token = DeviceTokenRepository::upsert(&state.db, registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterByMobileRequest {
    pub mobile: String,
    pub token: String,
    pub platform: Option<String>,
}

async fn register_driver_by_mobile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterByMobileRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if request.token.trim().is_empty() {
        return Err(AppError::BadRequest("token is required".to_string()));
    }

    let signup = DriverRepository::find_signup_by_mobile(&state.db, request.mobile.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found for mobile".to_string()))?;

    let token = DeviceTokenRepository::upsert(
        &state.db,
        RegisterDeviceToken {
            token: request.token,
            platform: request.platform,
            user_type: Some("driver".to_string()),
            user_id: Some(signup.id),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInvestorByMobileRequest {
    pub phone: String,
    pub token: String,
    pub platform: Option<String>,
}

async fn register_investor_by_mobile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterInvestorByMobileRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    if request.token.trim().is_empty() {
        return Err(AppError::BadRequest("token is required".to_string()));
    }

    let signup = InvestorRepository::find_signup_by_phone(&state.db, request.phone.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found for phone".to_string()))?;

    let token = DeviceTokenRepository::upsert(
        &state.db,
        RegisterDeviceToken {
            token: request.token,
            platform: request.platform,
            user_type: Some("investor".to_string()),
            user_id: Some(signup.id),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

async fn remove_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    DeviceTokenRepository::delete(&state.db, &token).await?;
    Ok(Json(DeleteResponse { success: true }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTokensQuery {
    pub user_type: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TokenListResponse {
    pub items: Vec<DeviceToken>,
}

async fn list_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTokensQuery>,
) -> AppResult<Json<TokenListResponse>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let items = DeviceTokenRepository::list(
        &state.db,
        query.user_type.as_deref(),
        query.user_id.as_deref(),
        limit,
    )
    .await?;
    Ok(Json(TokenListResponse { items }))
}
