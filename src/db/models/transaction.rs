use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub driver_id: Option<i64>,
    pub amount: f64,
    pub status: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub amount: f64,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Aggregate view over a set of transactions, grouped by status.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total: i64,
    pub total_amount: f64,
    pub completed_amount: f64,
    pub pending_amount: f64,
    pub completed_count: i64,
    pub pending_count: i64,
    pub failed_count: i64,
}

impl TransactionSummary {
    pub fn from_transactions(list: &[Transaction]) -> Self {
        let mut summary = TransactionSummary {
            total: list.len() as i64,
            ..Default::default()
        };
        for tx in list {
            summary.total_amount += tx.amount;
            match tx.status.as_str() {
                "completed" => {
                    summary.completed_amount += tx.amount;
                    summary.completed_count += 1;
                }
                "pending" => {
                    summary.pending_amount += tx.amount;
                    summary.pending_count += 1;
                }
                "failed" => summary.failed_count += 1,
                _ => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(amount: f64, status: &str) -> Transaction {
        Transaction {
            id: 1,
            driver_id: Some(7),
            amount,
            status: status.to_string(),
            description: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn summary_groups_by_status() {
        let list = vec![
            tx(100.0, "completed"),
            tx(50.0, "completed"),
            tx(30.0, "pending"),
            tx(999.0, "failed"),
        ];
        let s = TransactionSummary::from_transactions(&list);
        assert_eq!(s.total, 4);
        assert_eq!(s.total_amount, 1179.0);
        assert_eq!(s.completed_amount, 150.0);
        assert_eq!(s.pending_amount, 30.0);
        assert_eq!(s.completed_count, 2);
        assert_eq!(s.pending_count, 1);
        assert_eq!(s.failed_count, 1);
    }
}
