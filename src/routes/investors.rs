use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{CreateInvestor, Investor, InvestorRepository, InvestorSignup, UpdateInvestor};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for admin-managed investor records plus the self-signup listing.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_investors).post(create_investor))
        .route("/signup/credentials", get(list_signups))
        .route(
            "/:id",
            get(get_investor).put(update_investor).delete(delete_investor),
        )
}

async fn list_investors(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Investor>>> {
    Ok(Json(InvestorRepository::list_manual(&state.db).await?))
}

async fn list_signups(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<InvestorSignup>>> {
    Ok(Json(InvestorRepository::list_signups(&state.db).await?))
}

async fn get_investor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Investor>> {
    InvestorRepository::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))
}

async fn create_investor(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateInvestor>,
) -> AppResult<(StatusCode, Json<Investor>)> {
    if input.name.trim().is_empty() || input.phone.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and phone are required".to_string(),
        ));
    }
    let investor = InvestorRepository::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(investor)))
}

async fn update_investor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateInvestor>,
) -> AppResult<Json<Investor>> {
    InvestorRepository::update(&state.db, id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

async fn delete_investor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = InvestorRepository::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Investor not found".to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Investor deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, test_app};
    use tower::ServiceExt;

    #[tokio::test]
    async fn create_validates_required_fields() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/investors",
                Some(serde_json::json!({"name": "", "phone": "123"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_listing_excludes_password_hash() {
        let app = test_app().await;

        app.clone()
            .oneshot(request(
                "POST",
                "/api/auth/investor/signup",
                Some(serde_json::json!({
                    "investorName": "Asha",
                    "phone": "444",
                    "password": "pw",
                })),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/investors/signup/credentials", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["investorName"], "Asha");
        assert!(body[0].get("passwordHash").is_none());
    }
}
