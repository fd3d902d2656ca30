use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{Wallet, WalletEntry, WalletMessage};
use crate::error::{AppError, AppResult};

pub struct WalletRepository;

impl WalletRepository {
    pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> AppResult<Option<Wallet>> {
        sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE phone = ?")
            .bind(phone)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    /// Apply a credit or debit: create the wallet lazily, adjust the balance
    /// and append a ledger entry. Returns the updated wallet.
    pub async fn apply_entry(
        pool: &SqlitePool,
        phone: &str,
        amount: f64,
        description: Option<&str>,
        entry_type: &str,
    ) -> AppResult<Wallet> {
        let now = Utc::now().naive_utc();
        let delta = if entry_type == "credit" { amount } else { -amount };

        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            INSERT INTO wallets (phone, balance, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (phone) DO UPDATE SET
                balance = wallets.balance + excluded.balance,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(delta)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO wallet_entries (wallet_id, amount, description, entry_type, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(wallet.id)
        .bind(amount)
        .bind(description)
        .bind(entry_type)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(wallet)
    }

    pub async fn entries(pool: &SqlitePool, wallet_id: i64) -> AppResult<Vec<WalletEntry>> {
        sqlx::query_as::<_, WalletEntry>(
            "SELECT * FROM wallet_entries WHERE wallet_id = ? ORDER BY created_at DESC",
        )
        .bind(wallet_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn create_message(
        pool: &SqlitePool,
        phone: &str,
        message: &str,
    ) -> AppResult<WalletMessage> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, WalletMessage>(
            "INSERT INTO wallet_messages (phone, message, created_at) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(phone)
        .bind(message)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_messages(pool: &SqlitePool) -> AppResult<Vec<WalletMessage>> {
        sqlx::query_as::<_, WalletMessage>(
            "SELECT * FROM wallet_messages ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }
}
