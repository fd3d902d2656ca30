use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreateDriver, Driver, DriverSignup, UpdateDriver};
use crate::error::{AppError, AppResult};

pub struct DriverRepository;

impl DriverRepository {
    /// Admin listing: only drivers added manually, not self-registered ones.
    pub async fn list_manual(pool: &SqlitePool) -> AppResult<Vec<Driver>> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE is_manual_entry = 1")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Driver>> {
        sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn create(pool: &SqlitePool, input: CreateDriver) -> AppResult<Driver> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (
                name, mobile, email, address, license_number, status, kyc_status,
                profile_photo, license_document, aadhar_document, pan_document,
                is_manual_entry, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.mobile)
        .bind(input.email)
        .bind(input.address)
        .bind(input.license_number)
        .bind(input.status.unwrap_or_else(|| "active".to_string()))
        .bind(input.kyc_status.unwrap_or_else(|| "pending".to_string()))
        .bind(input.profile_photo)
        .bind(input.license_document)
        .bind(input.aadhar_document)
        .bind(input.pan_document)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        input: UpdateDriver,
    ) -> AppResult<Option<Driver>> {
        sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET
                name = COALESCE(?, name),
                mobile = COALESCE(?, mobile),
                email = COALESCE(?, email),
                address = COALESCE(?, address),
                license_number = COALESCE(?, license_number),
                status = COALESCE(?, status),
                kyc_status = COALESCE(?, kyc_status),
                profile_photo = COALESCE(?, profile_photo),
                license_document = COALESCE(?, license_document),
                aadhar_document = COALESCE(?, aadhar_document),
                pan_document = COALESCE(?, pan_document)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.name)
        .bind(input.mobile)
        .bind(input.email)
        .bind(input.address)
        .bind(input.license_number)
        .bind(input.status)
        .bind(input.kyc_status)
        .bind(input.profile_photo)
        .bind(input.license_document)
        .bind(input.aadhar_document)
        .bind(input.pan_document)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    // ------------------------------------------------------------------
    // Self-registered driver credentials
    // ------------------------------------------------------------------

    pub async fn create_signup(
        pool: &SqlitePool,
        username: Option<String>,
        mobile: String,
        password_hash: String,
    ) -> AppResult<DriverSignup> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, DriverSignup>(
            r#"
            INSERT INTO driver_signups (id, username, mobile, password_hash, status, kyc_status, signup_date)
            VALUES (?, ?, ?, ?, 'pending', 'pending', ?)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(mobile)
        .bind(password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_signup_by_mobile(
        pool: &SqlitePool,
        mobile: &str,
    ) -> AppResult<Option<DriverSignup>> {
        sqlx::query_as::<_, DriverSignup>("SELECT * FROM driver_signups WHERE mobile = ?")
            .bind(mobile)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_signup_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> AppResult<Option<DriverSignup>> {
        sqlx::query_as::<_, DriverSignup>("SELECT * FROM driver_signups WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn list_signups(pool: &SqlitePool) -> AppResult<Vec<DriverSignup>> {
        sqlx::query_as::<_, DriverSignup>("SELECT * FROM driver_signups ORDER BY signup_date DESC")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }
}
