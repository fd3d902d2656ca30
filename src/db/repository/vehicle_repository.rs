use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::{CreateVehicle, UpdateVehicle, Vehicle};
use crate::error::{AppError, AppResult};

pub struct VehicleRepository;

impl VehicleRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY vehicle_id")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vehicle_id = ?")
            .bind(vehicle_id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_driver(pool: &SqlitePool, driver_id: &str) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE assigned_driver = ?")
            .bind(driver_id)
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn create(pool: &SqlitePool, input: CreateVehicle) -> AppResult<Vehicle> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                registration_number, brand, model, category, owner_name, owner_phone,
                year, fuel_type, assigned_driver, kyc_status, status, remarks,
                insurance_date, permit_date, rc_expiry_date, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.registration_number)
        .bind(input.brand)
        .bind(input.model)
        .bind(input.category)
        .bind(input.owner_name)
        .bind(input.owner_phone)
        .bind(input.year)
        .bind(input.fuel_type)
        .bind(input.assigned_driver)
        .bind(input.kyc_status.unwrap_or_else(|| "pending".to_string()))
        .bind(input.status.unwrap_or_else(|| "inactive".to_string()))
        .bind(input.remarks)
        .bind(input.insurance_date)
        .bind(input.permit_date)
        .bind(input.rc_expiry_date)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn update(
        pool: &SqlitePool,
        vehicle_id: i64,
        input: UpdateVehicle,
    ) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                registration_number = COALESCE(?, registration_number),
                brand = COALESCE(?, brand),
                model = COALESCE(?, model),
                category = COALESCE(?, category),
                owner_name = COALESCE(?, owner_name),
                owner_phone = COALESCE(?, owner_phone),
                year = COALESCE(?, year),
                fuel_type = COALESCE(?, fuel_type),
                assigned_driver = COALESCE(?, assigned_driver),
                kyc_status = COALESCE(?, kyc_status),
                status = COALESCE(?, status),
                remarks = COALESCE(?, remarks),
                insurance_date = COALESCE(?, insurance_date),
                permit_date = COALESCE(?, permit_date),
                rc_expiry_date = COALESCE(?, rc_expiry_date)
            WHERE vehicle_id = ?
            RETURNING *
            "#,
        )
        .bind(input.registration_number)
        .bind(input.brand)
        .bind(input.model)
        .bind(input.category)
        .bind(input.owner_name)
        .bind(input.owner_phone)
        .bind(input.year)
        .bind(input.fuel_type)
        .bind(input.assigned_driver)
        .bind(input.kyc_status)
        .bind(input.status)
        .bind(input.remarks)
        .bind(input.insurance_date)
        .bind(input.permit_date)
        .bind(input.rc_expiry_date)
        .bind(vehicle_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete(pool: &SqlitePool, vehicle_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vehicle_id = ?")
            .bind(vehicle_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
