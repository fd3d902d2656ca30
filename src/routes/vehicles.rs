use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{CreateVehicle, UpdateVehicle, Vehicle, VehicleRepository};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Router for the vehicle fleet. Registration numbers are unique; creating a
/// duplicate is a conflict, not a server error.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/by-driver/:driver_id", get(vehicles_by_driver))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

fn map_unique_violation(e: AppError) -> AppError {
    if let AppError::Database(sqlx::Error::Database(ref db_err)) = e {
        if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return AppError::Conflict(
                "Vehicle with this registration number already exists".to_string(),
            );
        }
    }
    e
}

async fn list_vehicles(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Vehicle>>> {
    Ok(Json(VehicleRepository::list(&state.db).await?))
}

async fn vehicles_by_driver(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<String>,
) -> AppResult<Json<Vec<Vehicle>>> {
    Ok(Json(
        VehicleRepository::find_by_driver(&state.db, &driver_id).await?,
    ))
}

async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vehicle>> {
    VehicleRepository::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateVehicle>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    if input.registration_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "registrationNumber is required".to_string(),
        ));
    }
    let vehicle = VehicleRepository::create(&state.db, input)
        .await
        .map_err(map_unique_violation)?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateVehicle>,
) -> AppResult<Json<Vehicle>> {
    VehicleRepository::update(&state.db, id, input)
        .await
        .map_err(map_unique_violation)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = VehicleRepository::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Vehicle not found".to_string()));
    }
    Ok(Json(DeleteResponse {
        message: "Vehicle deleted".to_string(),
    }))
}
