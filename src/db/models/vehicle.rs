use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: i64,
    pub registration_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub year: Option<i64>,
    pub fuel_type: Option<String>,
    /// Driver this vehicle is currently assigned to, if any.
    pub assigned_driver: Option<String>,
    pub kyc_status: String,
    pub status: String,
    pub remarks: Option<String>,
    pub insurance_date: Option<String>,
    pub permit_date: Option<String>,
    pub rc_expiry_date: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicle {
    pub registration_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub year: Option<i64>,
    pub fuel_type: Option<String>,
    pub assigned_driver: Option<String>,
    pub kyc_status: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub insurance_date: Option<String>,
    pub permit_date: Option<String>,
    pub rc_expiry_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicle {
    pub registration_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub year: Option<i64>,
    pub fuel_type: Option<String>,
    pub assigned_driver: Option<String>,
    pub kyc_status: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub insurance_date: Option<String>,
    pub permit_date: Option<String>,
    pub rc_expiry_date: Option<String>,
}
