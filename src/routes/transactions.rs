use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{CreateTransaction, Transaction, TransactionRepository, TransactionSummary};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for payment transactions. `?include=summary` attaches status
/// aggregates to the response.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_transactions).post(create_transaction))
        .route("/:id", get(get_transaction).delete(delete_transaction))
}

#[derive(Debug, Deserialize)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

fn wants_summary(query: &IncludeQuery) -> bool {
    query.include.as_deref() == Some("summary")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TransactionSummary>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IncludeQuery>,
) -> AppResult<Json<TransactionList>> {
    let transactions = TransactionRepository::list(&state.db).await?;
    let summary = wants_summary(&query).then(|| TransactionSummary::from_transactions(&transactions));
    Ok(Json(TransactionList {
        transactions,
        summary,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TransactionSummary>,
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<IncludeQuery>,
) -> AppResult<Json<TransactionView>> {
    let transaction = TransactionRepository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    // The summary covers every transaction of the same driver.
    let summary = match (wants_summary(&query), transaction.driver_id) {
        (true, Some(driver_id)) => {
            let all = TransactionRepository::find_by_driver(&state.db, driver_id).await?;
            Some(TransactionSummary::from_transactions(&all))
        }
        _ => None,
    };

    Ok(Json(TransactionView {
        transaction,
        summary,
    }))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateTransaction>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    if input.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "amount must be greater than zero".to_string(),
        ));
    }
    let transaction = TransactionRepository::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = TransactionRepository::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Transaction not found".to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Transaction deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, test_app};
    use tower::ServiceExt;

    #[tokio::test]
    async fn list_with_summary_aggregates() {
        let app = test_app().await;

        for (amount, status) in [(100.0, "completed"), (50.0, "pending")] {
            app.clone()
                .oneshot(request(
                    "POST",
                    "/api/transactions",
                    Some(serde_json::json!({
                        "driverId": 1,
                        "amount": amount,
                        "status": status,
                    })),
                ))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(request("GET", "/api/transactions?include=summary", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["summary"]["totalAmount"], 150.0);
        assert_eq!(body["summary"]["completedCount"], 1);
    }

    #[tokio::test]
    async fn plain_list_omits_summary() {
        let app = test_app().await;
        let response = app
            .oneshot(request("GET", "/api/transactions", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert!(body.get("summary").is_none());
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount() {
        let app = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/transactions",
                Some(serde_json::json!({"amount": 0.0})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
