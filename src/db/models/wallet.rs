use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-investor wallet, keyed by phone number. The balance is maintained
/// alongside an append-only ledger of entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: i64,
    pub phone: String,
    pub balance: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletEntry {
    pub id: i64,
    pub wallet_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletEntry {
    pub phone: String,
    pub amount: f64,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// A message from an investor to the admin, shown in the wallet screen.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMessage {
    pub id: i64,
    pub phone: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}
