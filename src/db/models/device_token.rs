use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A push-delivery token for one installed client. Upserted on registration
/// (keyed by token) and deleted explicitly; there is no expiry policy.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceToken {
    pub token: String,
    pub platform: Option<String>,
    pub user_type: Option<String>,
    pub user_id: Option<String>,
    pub last_seen: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceToken {
    pub token: String,
    pub platform: Option<String>,
    pub user_type: Option<String>,
    pub user_id: Option<String>,
}
