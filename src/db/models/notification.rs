use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A single notification event. `recipient_type`/`recipient_id` are either
/// both set (scoped to one driver/investor) or both null (global, visible to
/// every recipient).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: Option<String>,
    pub message: Option<String>,
    /// Opaque key-value payload, passed through to push payloads.
    pub data: Json<serde_json::Value>,
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotification {
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
