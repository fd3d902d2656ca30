use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::models::investment_fd::{
    maturity_amount, maturity_date, VALID_KYC_STATUSES, VALID_PAYMENT_METHODS,
};
use crate::db::{
    CreateInvestmentFd, FdStats, InvestmentFd, InvestmentFdRepository, UpdateInvestmentFd,
};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for fixed-deposit investments. Maturity date and amount are derived
/// server-side from the principal, rate and term.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_fds).post(create_fd))
        .route("/stats/summary", get(fd_stats))
        .route("/:id", get(get_fd).put(update_fd).delete(delete_fd))
}

fn validate_fd_type(fd_type: &str) -> AppResult<()> {
    if fd_type != "monthly" && fd_type != "yearly" {
        return Err(AppError::Validation(
            "fdType must be 'monthly' or 'yearly'".to_string(),
        ));
    }
    Ok(())
}

fn validate_term(fd_type: &str, term_months: Option<i64>, term_years: Option<i64>) -> AppResult<()> {
    match fd_type {
        "monthly" => match term_months {
            Some(m) if (1..=12).contains(&m) => Ok(()),
            _ => Err(AppError::Validation(
                "termMonths must be between 1 and 12 for monthly FDs".to_string(),
            )),
        },
        _ => match term_years {
            Some(y) if (1..=10).contains(&y) => Ok(()),
            _ => Err(AppError::Validation(
                "termYears must be between 1 and 10 for yearly FDs".to_string(),
            )),
        },
    }
}

fn validate_amounts(rate: f64, amount: f64) -> AppResult<()> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(AppError::Validation(
            "investmentRate must be between 0 and 100".to_string(),
        ));
    }
    if amount <= 0.0 {
        return Err(AppError::Validation(
            "investmentAmount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_payment_method(method: &str) -> AppResult<()> {
    if !VALID_PAYMENT_METHODS.contains(&method) {
        return Err(AppError::Validation(format!(
            "paymentMethod must be one of {:?}",
            VALID_PAYMENT_METHODS
        )));
    }
    Ok(())
}

fn validate_kyc_status(status: &str) -> AppResult<()> {
    if !VALID_KYC_STATUSES.contains(&status) {
        return Err(AppError::Validation(format!(
            "kycStatus must be one of {:?}",
            VALID_KYC_STATUSES
        )));
    }
    Ok(())
}

async fn list_fds(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<InvestmentFd>>> {
    Ok(Json(InvestmentFdRepository::list(&state.db).await?))
}

async fn get_fd(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<InvestmentFd>> {
    InvestmentFdRepository::find_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))
}

async fn create_fd(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateInvestmentFd>,
) -> AppResult<(StatusCode, Json<InvestmentFd>)> {
    if input.investor_name.trim().is_empty()
        || input.phone.trim().is_empty()
        || input.address.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "investorName, phone and address are required".to_string(),
        ));
    }
    validate_fd_type(&input.fd_type)?;
    validate_term(&input.fd_type, input.term_months, input.term_years)?;
    validate_amounts(input.investment_rate, input.investment_amount)?;
    validate_payment_method(&input.payment_method)?;
    if let Some(ref status) = input.kyc_status {
        validate_kyc_status(status)?;
    }

    // An explicit maturity date from the client wins over the derived one.
    let due = input.maturity_date.or_else(|| {
        maturity_date(
            input.investment_date,
            &input.fd_type,
            input.term_months,
            input.term_years,
        )
    });
    let amount = maturity_amount(
        input.investment_amount,
        input.investment_rate,
        &input.fd_type,
        input.term_months,
        input.term_years,
    );

    let fd = InvestmentFdRepository::create(&state.db, input, due, amount).await?;
    Ok((StatusCode::CREATED, Json(fd)))
}

async fn update_fd(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<UpdateInvestmentFd>,
) -> AppResult<Json<InvestmentFd>> {
    let mut fd = InvestmentFdRepository::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))?;

    if let Some(method) = &input.payment_method {
        validate_payment_method(method)?;
    }
    if let Some(status) = &input.kyc_status {
        validate_kyc_status(status)?;
    }
    if let Some(fd_type) = &input.fd_type {
        validate_fd_type(fd_type)?;
    }

    if let Some(name) = input.investor_name {
        fd.investor_name = name.trim().to_string();
    }
    if let Some(email) = input.email {
        fd.email = email;
    }
    if let Some(phone) = input.phone {
        fd.phone = phone.trim().to_string();
    }
    if let Some(address) = input.address {
        fd.address = address;
    }
    if let Some(date) = input.investment_date {
        fd.investment_date = date;
    }
    if let Some(method) = input.payment_method {
        fd.payment_method = method;
    }
    if let Some(rate) = input.investment_rate {
        fd.investment_rate = rate;
    }
    if let Some(amount) = input.investment_amount {
        fd.investment_amount = amount;
    }
    if let Some(plan_id) = input.plan_id {
        fd.plan_id = Some(plan_id);
    }
    if let Some(plan_name) = input.plan_name {
        fd.plan_name = plan_name;
    }
    if let Some(fd_type) = input.fd_type {
        fd.fd_type = fd_type;
    }
    if let Some(months) = input.term_months {
        fd.term_months = Some(months);
    }
    if let Some(years) = input.term_years {
        fd.term_years = Some(years);
    }
    if let Some(status) = input.status {
        fd.status = status;
    }
    if let Some(kyc) = input.kyc_status {
        fd.kyc_status = kyc;
    }
    if let Some(notes) = input.notes {
        fd.notes = notes;
    }

    validate_term(&fd.fd_type, fd.term_months, fd.term_years)?;
    validate_amounts(fd.investment_rate, fd.investment_amount)?;

    // Recompute derived fields unless the client pinned the maturity date.
    fd.maturity_date = input.maturity_date.or_else(|| {
        maturity_date(fd.investment_date, &fd.fd_type, fd.term_months, fd.term_years)
    });
    fd.maturity_amount = maturity_amount(
        fd.investment_amount,
        fd.investment_rate,
        &fd.fd_type,
        fd.term_months,
        fd.term_years,
    );

    let saved = InvestmentFdRepository::save(&state.db, &fd).await?;
    Ok(Json(saved))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: InvestmentFd,
}

async fn delete_fd(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = InvestmentFdRepository::delete(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))?;
    Ok(Json(DeleteResponse {
        message: "Investment deleted".to_string(),
        deleted,
    }))
}

async fn fd_stats(State(state): State<Arc<AppState>>) -> AppResult<Json<FdStats>> {
    Ok(Json(InvestmentFdRepository::stats(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{json_body, request, test_app};
    use tower::ServiceExt;

    fn fd_payload() -> serde_json::Value {
        serde_json::json!({
            "investorName": "Asha Patel",
            "phone": "9000000001",
            "address": "12 MG Road",
            "investmentDate": "2024-03-15",
            "paymentMethod": "UPI",
            "investmentRate": 12.0,
            "investmentAmount": 100000.0,
            "fdType": "monthly",
            "termMonths": 6,
        })
    }

    #[tokio::test]
    async fn create_derives_maturity_fields() {
        let app = test_app().await;
        let response = app
            .oneshot(request("POST", "/api/investment-fds", Some(fd_payload())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["maturityDate"], "2024-09-15");
        assert_eq!(body["maturityAmount"], 106000.0);
    }

    #[tokio::test]
    async fn invalid_payment_method_422() {
        let app = test_app().await;
        let mut payload = fd_payload();
        payload["paymentMethod"] = "Crypto".into();
        let response = app
            .oneshot(request("POST", "/api/investment-fds", Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn term_out_of_range_422() {
        let app = test_app().await;
        let mut payload = fd_payload();
        payload["termMonths"] = 500.into();
        let response = app
            .oneshot(request("POST", "/api/investment-fds", Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn update_recomputes_maturity() {
        let app = test_app().await;
        let response = app
            .clone()
            .oneshot(request("POST", "/api/investment-fds", Some(fd_payload())))
            .await
            .unwrap();
        let created = json_body(response).await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/investment-fds/{}", id),
                Some(serde_json::json!({"termMonths": 12})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["maturityDate"], "2025-03-15");
        assert_eq!(updated["maturityAmount"], 112000.0);
    }

    #[tokio::test]
    async fn stats_aggregate_totals() {
        let app = test_app().await;
        app.clone()
            .oneshot(request("POST", "/api/investment-fds", Some(fd_payload())))
            .await
            .unwrap();

        let response = app
            .oneshot(request("GET", "/api/investment-fds/stats/summary", None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["totalInvestments"], 1);
        assert_eq!(body["totalAmount"], 100000.0);
    }
}
