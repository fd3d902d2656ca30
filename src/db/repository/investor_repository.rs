use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreateInvestor, Investor, InvestorSignup, UpdateInvestor};
use crate::error::{AppError, AppResult};

pub struct InvestorRepository;

impl InvestorRepository {
    /// Admin listing: only investors added manually, not self-registered ones.
    pub async fn list_manual(pool: &SqlitePool) -> AppResult<Vec<Investor>> {
        sqlx::query_as::<_, Investor>("SELECT * FROM investors WHERE is_manual_entry = 1")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Investor>> {
        sqlx::query_as::<_, Investor>("SELECT * FROM investors WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn create(pool: &SqlitePool, input: CreateInvestor) -> AppResult<Investor> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Investor>(
            r#"
            INSERT INTO investors (name, phone, email, address, status, kyc_status, is_manual_entry, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.phone)
        .bind(input.email)
        .bind(input.address)
        .bind(input.status.unwrap_or_else(|| "active".to_string()))
        .bind(input.kyc_status.unwrap_or_else(|| "pending".to_string()))
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        input: UpdateInvestor,
    ) -> AppResult<Option<Investor>> {
        sqlx::query_as::<_, Investor>(
            r#"
            UPDATE investors SET
                name = COALESCE(?, name),
                phone = COALESCE(?, phone),
                email = COALESCE(?, email),
                address = COALESCE(?, address),
                status = COALESCE(?, status),
                kyc_status = COALESCE(?, kyc_status)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.phone)
        .bind(input.email)
        .bind(input.address)
        .bind(input.status)
        .bind(input.kyc_status)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM investors WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ------------------------------------------------------------------
    // Self-registered investor credentials
    // ------------------------------------------------------------------

    pub async fn create_signup(
        pool: &SqlitePool,
        investor_name: String,
        email: Option<String>,
        phone: String,
        password_hash: String,
    ) -> AppResult<InvestorSignup> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, InvestorSignup>(
            r#"
            INSERT INTO investor_signups (id, investor_name, email, phone, password_hash, status, kyc_status, signup_date)
            VALUES (?, ?, ?, ?, ?, 'pending', 'pending', ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(investor_name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_signup_by_phone(
        pool: &SqlitePool,
        phone: &str,
    ) -> AppResult<Option<InvestorSignup>> {
        sqlx::query_as::<_, InvestorSignup>("SELECT * FROM investor_signups WHERE phone = ?")
            .bind(phone)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn list_signups(pool: &SqlitePool) -> AppResult<Vec<InvestorSignup>> {
        sqlx::query_as::<_, InvestorSignup>(
            "SELECT * FROM investor_signups ORDER BY signup_date DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }
}
