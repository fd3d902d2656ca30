use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreatePlanSelection, PlanSelection};
use crate::error::{AppError, AppResult};

pub struct PlanSelectionRepository;

impl PlanSelectionRepository {
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<PlanSelection>> {
        sqlx::query_as::<_, PlanSelection>(
            "SELECT * FROM plan_selections ORDER BY selected_date DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<PlanSelection>> {
        sqlx::query_as::<_, PlanSelection>("SELECT * FROM plan_selections WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_driver(
        pool: &SqlitePool,
        driver_signup_id: &str,
    ) -> AppResult<Vec<PlanSelection>> {
        sqlx::query_as::<_, PlanSelection>(
            "SELECT * FROM plan_selections WHERE driver_signup_id = ? ORDER BY selected_date DESC",
        )
        .bind(driver_signup_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_active_for_driver(
        pool: &SqlitePool,
        driver_signup_id: &str,
    ) -> AppResult<Option<PlanSelection>> {
        sqlx::query_as::<_, PlanSelection>(
            "SELECT * FROM plan_selections WHERE driver_signup_id = ? AND status = 'active'",
        )
        .bind(driver_signup_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn create(
        pool: &SqlitePool,
        driver_signup_id: &str,
        driver_username: Option<&str>,
        driver_mobile: &str,
        input: CreatePlanSelection,
    ) -> AppResult<PlanSelection> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, PlanSelection>(
            r#"
            INSERT INTO plan_selections (
                id, driver_signup_id, driver_username, driver_mobile,
                plan_id, plan_name, plan_type, security_deposit,
                rent_slabs, selected_rent_slab, selected_date, status
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(driver_signup_id)
        .bind(driver_username)
        .bind(driver_mobile)
        .bind(input.plan_id)
        .bind(input.plan_name)
        .bind(input.plan_type)
        .bind(input.security_deposit)
        .bind(Json(input.rent_slabs))
        .bind(input.selected_rent_slab.map(Json))
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }
}
