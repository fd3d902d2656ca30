use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{DeviceToken, RegisterDeviceToken};
use crate::error::{AppError, AppResult};

pub struct DeviceTokenRepository;

impl DeviceTokenRepository {
    /// Upsert by token: re-registering an existing token refreshes its
    /// scope, platform and `last_seen`.
    pub async fn upsert(pool: &SqlitePool, reg: RegisterDeviceToken) -> AppResult<DeviceToken> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, DeviceToken>(
            r#"
            INSERT INTO device_tokens (token, platform, user_type, user_id, last_seen)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (token) DO UPDATE SET
                platform = excluded.platform,
                user_type = excluded.user_type,
                user_id = excluded.user_id,
                last_seen = excluded.last_seen
            RETURNING *
            "#,
        )
        .bind(reg.token)
        .bind(reg.platform)
        .bind(reg.user_type)
        .bind(reg.user_id)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, token: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM device_tokens WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list(
        pool: &SqlitePool,
        user_type: Option<&str>,
        user_id: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<DeviceToken>> {
        sqlx::query_as::<_, DeviceToken>(
            r#"
            SELECT * FROM device_tokens
            WHERE (? IS NULL OR user_type = ?)
              AND (? IS NULL OR user_id = ?)
            LIMIT ?
            "#,
        )
        .bind(user_type)
        .bind(user_type)
        .bind(user_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Distinct tokens for a delivery scope. `None` means every registered
    /// token (global notifications push to all devices).
    pub async fn distinct_tokens(
        pool: &SqlitePool,
        scope: Option<(&str, &str)>,
    ) -> AppResult<Vec<String>> {
        let tokens = match scope {
            Some((user_type, user_id)) => {
                sqlx::query_scalar::<_, String>(
                    "SELECT DISTINCT token FROM device_tokens WHERE user_type = ? AND user_id = ?",
                )
                .bind(user_type)
                .bind(user_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, String>("SELECT DISTINCT token FROM device_tokens")
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(tokens)
    }
}
