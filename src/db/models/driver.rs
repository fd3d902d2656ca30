use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A driver record added manually through the admin panel.
/// Document fields hold URLs into the external file-storage service.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub status: String,
    pub kyc_status: String,
    pub profile_photo: Option<String>,
    pub license_document: Option<String>,
    pub aadhar_document: Option<String>,
    pub pan_document: Option<String>,
    pub is_manual_entry: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriver {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub kyc_status: Option<String>,
    pub profile_photo: Option<String>,
    pub license_document: Option<String>,
    pub aadhar_document: Option<String>,
    pub pan_document: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriver {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub kyc_status: Option<String>,
    pub profile_photo: Option<String>,
    pub license_document: Option<String>,
    pub aadhar_document: Option<String>,
    pub pan_document: Option<String>,
}

/// Self-registered driver credentials, kept separate from admin entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSignup {
    pub id: String,
    pub username: Option<String>,
    pub mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: String,
    pub kyc_status: String,
    pub signup_date: NaiveDateTime,
}
