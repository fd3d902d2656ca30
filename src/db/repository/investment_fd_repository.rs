use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreateInvestmentFd, InvestmentFd};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FdStats {
    pub total_investments: i64,
    pub active_investments: i64,
    pub total_amount: f64,
    pub avg_rate: f64,
}

pub struct InvestmentFdRepository;

impl InvestmentFdRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<InvestmentFd>> {
        sqlx::query_as::<_, InvestmentFd>(
            "SELECT * FROM investment_fds ORDER BY investment_date DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<InvestmentFd>> {
        sqlx::query_as::<_, InvestmentFd>("SELECT * FROM investment_fds WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    /// Insert a validated FD with its derived maturity fields already
    /// computed by the caller.
    pub async fn create(
        pool: &SqlitePool,
        input: CreateInvestmentFd,
        maturity_date: Option<NaiveDate>,
        maturity_amount: f64,
    ) -> AppResult<InvestmentFd> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, InvestmentFd>(
            r#"
            INSERT INTO investment_fds (
                id, investor_name, email, phone, address, investment_date,
                payment_method, investment_rate, investment_amount, plan_id, plan_name,
                fd_type, term_months, term_years, status, kyc_status,
                maturity_date, maturity_amount, notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.investor_name.trim())
        .bind(input.email.map(|e| e.trim().to_string()).unwrap_or_default())
        .bind(input.phone.trim())
        .bind(input.address.trim())
        .bind(input.investment_date)
        .bind(input.payment_method)
        .bind(input.investment_rate)
        .bind(input.investment_amount)
        .bind(input.plan_id)
        .bind(input.plan_name.unwrap_or_default())
        .bind(input.fd_type)
        .bind(input.term_months)
        .bind(input.term_years)
        .bind(input.status.unwrap_or_else(|| "active".to_string()))
        .bind(input.kyc_status.unwrap_or_else(|| "pending".to_string()))
        .bind(maturity_date)
        .bind(maturity_amount)
        .bind(input.notes.unwrap_or_default())
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Persist the current state of an FD loaded via `find_by_id`.
    pub async fn save(pool: &SqlitePool, fd: &InvestmentFd) -> AppResult<InvestmentFd> {
        sqlx::query_as::<_, InvestmentFd>(
            r#"
            UPDATE investment_fds SET
                investor_name = ?, email = ?, phone = ?, address = ?,
                investment_date = ?, payment_method = ?, investment_rate = ?,
                investment_amount = ?, plan_id = ?, plan_name = ?, fd_type = ?,
                term_months = ?, term_years = ?, status = ?, kyc_status = ?,
                maturity_date = ?, maturity_amount = ?, notes = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&fd.investor_name)
        .bind(&fd.email)
        .bind(&fd.phone)
        .bind(&fd.address)
        .bind(fd.investment_date)
        .bind(&fd.payment_method)
        .bind(fd.investment_rate)
        .bind(fd.investment_amount)
        .bind(&fd.plan_id)
        .bind(&fd.plan_name)
        .bind(&fd.fd_type)
        .bind(fd.term_months)
        .bind(fd.term_years)
        .bind(&fd.status)
        .bind(&fd.kyc_status)
        .bind(fd.maturity_date)
        .bind(fd.maturity_amount)
        .bind(&fd.notes)
        .bind(&fd.id)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<Option<InvestmentFd>> {
        sqlx::query_as::<_, InvestmentFd>("DELETE FROM investment_fds WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn stats(pool: &SqlitePool) -> AppResult<FdStats> {
        sqlx::query_as::<_, FdStats>(
            r#"
            SELECT
                COUNT(*) AS total_investments,
                COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active_investments,
                COALESCE(SUM(investment_amount), 0.0) AS total_amount,
                COALESCE(AVG(investment_rate), 0.0) AS avg_rate
            FROM investment_fds
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }
}
