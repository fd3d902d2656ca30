use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{CreateWalletEntry, Wallet, WalletEntry, WalletMessage, WalletRepository};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for investor wallets: apply credits/debits and read back the
/// balance with its ledger.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(apply_entry))
        .route("/:phone", get(get_wallet))
}

/// Router for investor-to-admin wallet messages.
pub fn message_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_messages).post(create_message))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub transactions: Vec<WalletEntry>,
}

async fn apply_entry(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateWalletEntry>,
) -> AppResult<(StatusCode, Json<WalletView>)> {
    let phone = input.phone.trim();
    if phone.is_empty() {
        return Err(AppError::BadRequest("phone is required".to_string()));
    }
    if input.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "amount must be greater than zero".to_string(),
        ));
    }
    if input.entry_type != "credit" && input.entry_type != "debit" {
        return Err(AppError::Validation(
            "type must be 'credit' or 'debit'".to_string(),
        ));
    }

    let wallet = WalletRepository::apply_entry(
        &state.db,
        phone,
        input.amount,
        input.description.as_deref(),
        &input.entry_type,
    )
    .await?;
    let transactions = WalletRepository::entries(&state.db, wallet.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(WalletView {
            wallet,
            transactions,
        }),
    ))
}

async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> AppResult<Json<WalletView>> {
    let wallet = WalletRepository::find_by_phone(&state.db, phone.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Wallet not found".to_string()))?;
    let transactions = WalletRepository::entries(&state.db, wallet.id).await?;
    Ok(Json(WalletView {
        wallet,
        transactions,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub phone: String,
    pub message: String,
}

async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<WalletMessage>)> {
    if request.phone.trim().is_empty() || request.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "phone and message are required".to_string(),
        ));
    }
    let message =
        WalletRepository::create_message(&state.db, request.phone.trim(), request.message.trim())
            .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<WalletMessage>>> {
    Ok(Json(WalletRepository::list_messages(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, test_app};
    use tower::ServiceExt;

    #[tokio::test]
    async fn credit_then_debit_updates_balance() {
        let app = test_app().await;

        app.clone()
            .oneshot(request(
                "POST",
                "/api/investor-wallet",
                Some(serde_json::json!({"phone": "777", "amount": 500.0, "type": "credit"})),
            ))
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/investor-wallet",
                Some(serde_json::json!({"phone": "777", "amount": 200.0, "type": "debit"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["balance"], 300.0);
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

        let response = app
            .oneshot(request("GET", "/api/investor-wallet/777", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["balance"], 300.0);
    }

    #[tokio::test]
    async fn unknown_entry_type_422() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/investor-wallet",
                Some(serde_json::json!({"phone": "777", "amount": 10.0, "type": "transfer"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn messages_round_trip() {
        let app = test_app().await;
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/investor-wallet-message",
                Some(serde_json::json!({"phone": "777", "message": "Please update my KYC"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/api/investor-wallet-message", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body[0]["message"], "Please update my KYC");
    }
}
