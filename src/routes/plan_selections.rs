use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::models::plan_selection::PaymentBreakdown;
use crate::db::{CreatePlanSelection, PlanSelection, PlanSelectionRepository};
use crate::error::{AppError, AppResult};
use crate::routes::auth::AuthDriver;
use crate::AppState;

/// Router for driver rent-plan selections. Admin endpoints list every
/// selection; the `my-plans` endpoints are driver-scoped behind auth.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_selections).post(create_selection))
        .route("/my-plans", get(my_plans))
        .route("/:id", get(get_selection))
}

/// A selection with its derived payment breakdown attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    #[serde(flatten)]
    pub selection: PlanSelection,
    pub payment_breakdown: PaymentBreakdown,
}

impl From<PlanSelection> for SelectionView {
    fn from(selection: PlanSelection) -> Self {
        let payment_breakdown = selection.payment_breakdown();
        Self {
            selection,
            payment_breakdown,
        }
    }
}

async fn list_selections(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<SelectionView>>> {
    let selections = PlanSelectionRepository::list(&state.db).await?;
    Ok(Json(selections.into_iter().map(Into::into).collect()))
}

async fn get_selection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<SelectionView>> {
    PlanSelectionRepository::find_by_id(&state.db, &id)
        .await?
        .map(|s| Json(s.into()))
        .ok_or_else(|| AppError::NotFound("Plan selection not found".to_string()))
}

async fn my_plans(
    State(state): State<Arc<AppState>>,
    AuthDriver(driver): AuthDriver,
) -> AppResult<Json<Vec<SelectionView>>> {
    let selections = PlanSelectionRepository::find_by_driver(&state.db, &driver.id).await?;
    Ok(Json(selections.into_iter().map(Into::into).collect()))
}

async fn create_selection(
    State(state): State<Arc<AppState>>,
    AuthDriver(driver): AuthDriver,
    Json(input): Json<CreatePlanSelection>,
) -> AppResult<(StatusCode, Json<SelectionView>)> {
    if input.plan_id.trim().is_empty() || input.plan_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "planId and planName are required".to_string(),
        ));
    }
    if input.plan_type != "weekly" && input.plan_type != "daily" {
        return Err(AppError::Validation(
            "planType must be 'weekly' or 'daily'".to_string(),
        ));
    }

    // One active plan per driver at a time.
    if PlanSelectionRepository::find_active_for_driver(&state.db, &driver.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Driver already has an active plan selection".to_string(),
        ));
    }

    let selection = PlanSelectionRepository::create(
        &state.db,
        &driver.id,
        driver.username.as_deref(),
        &driver.mobile,
        input,
    )
    .await?;
    tracing::info!(id = %selection.id, driver = %selection.driver_signup_id, "Plan selected");

    Ok((StatusCode::CREATED, Json(selection.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, request_with_auth, test_app};
    use tower::ServiceExt;

    async fn signup_and_login(app: &axum::Router) -> String {
        app.clone()
            .oneshot(request(
                "POST",
                "/api/auth/driver/signup",
                Some(serde_json::json!({"mobile": "555", "password": "pw"})),
            ))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/auth/driver/login",
                Some(serde_json::json!({"mobile": "555", "password": "pw"})),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    fn plan_payload() -> serde_json::Value {
        serde_json::json!({
            "planId": "plan-7",
            "planName": "Weekly Saver",
            "planType": "weekly",
            "securityDeposit": 2000.0,
            "selectedRentSlab": {"weeklyRent": 3500.0, "accidentalCover": 120.0},
        })
    }

    #[tokio::test]
    async fn selection_requires_auth() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/driver-plan-selections",
                Some(plan_payload()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn second_active_selection_conflicts() {
        let app = test_app().await;
        let token = signup_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(request_with_auth(
                "POST",
                "/api/driver-plan-selections",
                Some(plan_payload()),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        // deposit 2000 + rent 3500 + cover 120
        assert_eq!(body["paymentBreakdown"]["totalAmount"], 5620.0);

        let response = app
            .oneshot(request_with_auth(
                "POST",
                "/api/driver-plan-selections",
                Some(plan_payload()),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn my_plans_is_driver_scoped() {
        let app = test_app().await;
        let token = signup_and_login(&app).await;

        app.clone()
            .oneshot(request_with_auth(
                "POST",
                "/api/driver-plan-selections",
                Some(plan_payload()),
                &token,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(request_with_auth(
                "GET",
                "/api/driver-plan-selections/my-plans",
                None,
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["driverMobile"], "555");
    }
}
