use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{CreateTransaction, Transaction};
use crate::error::{AppError, AppResult};

pub struct TransactionRepository;

impl TransactionRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Transaction>> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_driver(pool: &SqlitePool, driver_id: i64) -> AppResult<Vec<Transaction>> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE driver_id = ?")
            .bind(driver_id)
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn create(pool: &SqlitePool, input: CreateTransaction) -> AppResult<Transaction> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (driver_id, amount, status, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.driver_id)
        .bind(input.amount)
        .bind(input.status.unwrap_or_else(|| "pending".to_string()))
        .bind(input.description)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
