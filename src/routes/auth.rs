use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{DriverRepository, InvestorRepository};
use crate::error::{AppError, AppResult};
use crate::services::auth;
use crate::AppState;

/// Router for mobile app signup/login. These are the public endpoints the
/// rate limiter sits in front of.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/driver/signup", post(driver_signup))
        .route("/driver/login", post(driver_login))
        .route("/investor/signup", post(investor_signup))
        .route("/investor/login", post(investor_login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSignupRequest {
    pub username: Option<String>,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLoginRequest {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub id: String,
    pub token: String,
}

async fn driver_signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DriverSignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let mobile = request.mobile.trim().to_string();
    if mobile.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "mobile and password are required".to_string(),
        ));
    }

    if DriverRepository::find_signup_by_mobile(&state.db, &mobile)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Driver already registered with this mobile".to_string(),
        ));
    }

    let hash = auth::hash_password(&request.password)?;
    let signup = DriverRepository::create_signup(&state.db, request.username, mobile, hash).await?;
    tracing::info!(id = %signup.id, "Driver signup created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Signup successful".to_string(),
            id: signup.id,
        }),
    ))
}

async fn driver_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DriverLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let signup = DriverRepository::find_signup_by_mobile(&state.db, request.mobile.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth::verify_password(&request.password, &signup.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = auth::issue_token(&state.config, &signup.id, "driver")?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        id: signup.id,
        token,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorSignupRequest {
    pub investor_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorLoginRequest {
    pub phone: String,
    pub password: String,
}

async fn investor_signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvestorSignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let phone = request.phone.trim().to_string();
    if request.investor_name.trim().is_empty() || phone.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "investorName, phone and password are required".to_string(),
        ));
    }

    if InvestorRepository::find_signup_by_phone(&state.db, &phone)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Investor already registered with this phone".to_string(),
        ));
    }

    let hash = auth::hash_password(&request.password)?;
    let signup = InvestorRepository::create_signup(
        &state.db,
        request.investor_name.trim().to_string(),
        request.email,
        phone,
        hash,
    )
    .await?;
    tracing::info!(id = %signup.id, "Investor signup created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Signup successful".to_string(),
            id: signup.id,
        }),
    ))
}

async fn investor_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvestorLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let signup = InvestorRepository::find_signup_by_phone(&state.db, request.phone.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth::verify_password(&request.password, &signup.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = auth::issue_token(&state.config, &signup.id, "investor")?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        id: signup.id,
        token,
    }))
}

/// Extractor for a logged-in driver, resolved from the bearer token.
pub struct AuthDriver(pub crate::db::DriverSignup);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthDriver {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!("Missing or invalid Authorization header");
                AppError::Unauthorized
            })?;

        if !auth_header.to_ascii_lowercase().starts_with("bearer ") {
            return Err(AppError::Unauthorized);
        }

        let token = auth_header[7..].trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let claims = auth::verify_token(&state.config, token)?;
        if claims.role != "driver" {
            tracing::debug!(role = %claims.role, "Token role is not driver");
            return Err(AppError::Unauthorized);
        }

        let signup = DriverRepository::find_signup_by_id(&state.db, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthDriver(signup))
    }
}
