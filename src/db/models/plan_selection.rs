use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Default accidental cover applied when the selected slab does not carry one.
pub const DEFAULT_ACCIDENTAL_COVER: f64 = 105.0;

/// A driver's selection of a rent plan. The slab payload is stored as-is so
/// historical selections keep the pricing they were made under.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSelection {
    pub id: String,
    pub driver_signup_id: String,
    pub driver_username: Option<String>,
    pub driver_mobile: String,
    pub plan_id: String,
    pub plan_name: String,
    pub plan_type: String,
    pub security_deposit: f64,
    pub rent_slabs: Json<serde_json::Value>,
    pub selected_rent_slab: Option<Json<serde_json::Value>>,
    pub selected_date: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanSelection {
    pub plan_id: String,
    pub plan_name: String,
    pub plan_type: String,
    #[serde(default)]
    pub security_deposit: f64,
    #[serde(default = "empty_array")]
    pub rent_slabs: serde_json::Value,
    pub selected_rent_slab: Option<serde_json::Value>,
}

fn empty_array() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub security_deposit: f64,
    pub rent: f64,
    pub rent_type: String,
    pub accidental_cover: f64,
    pub total_amount: f64,
}

impl PlanSelection {
    /// Derive the payment breakdown from the stored slab: deposit + rent
    /// (weekly or daily depending on plan type) + accidental cover.
    pub fn payment_breakdown(&self) -> PaymentBreakdown {
        let slab = self
            .selected_rent_slab
            .as_ref()
            .map(|j| j.0.clone())
            .unwrap_or(serde_json::Value::Null);

        let rent_key = if self.plan_type == "weekly" {
            "weeklyRent"
        } else {
            "rentDay"
        };
        let rent = slab.get(rent_key).and_then(|v| v.as_f64()).unwrap_or(0.0);
        let cover = slab
            .get("accidentalCover")
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_ACCIDENTAL_COVER);

        PaymentBreakdown {
            security_deposit: self.security_deposit,
            rent,
            rent_type: if self.plan_type == "weekly" {
                "weeklyRent".to_string()
            } else {
                "dailyRent".to_string()
            },
            accidental_cover: cover,
            total_amount: self.security_deposit + rent + cover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn selection(plan_type: &str, slab: Option<serde_json::Value>) -> PlanSelection {
        PlanSelection {
            id: "sel-1".to_string(),
            driver_signup_id: "drv-1".to_string(),
            driver_username: None,
            driver_mobile: "9000000000".to_string(),
            plan_id: "plan-1".to_string(),
            plan_name: "Weekly Gold".to_string(),
            plan_type: plan_type.to_string(),
            security_deposit: 5000.0,
            rent_slabs: Json(serde_json::Value::Array(Vec::new())),
            selected_rent_slab: slab.map(Json),
            selected_date: Utc::now().naive_utc(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn breakdown_weekly_uses_weekly_rent() {
        let sel = selection(
            "weekly",
            Some(serde_json::json!({"weeklyRent": 3500, "accidentalCover": 120})),
        );
        let b = sel.payment_breakdown();
        assert_eq!(b.rent, 3500.0);
        assert_eq!(b.rent_type, "weeklyRent");
        assert_eq!(b.accidental_cover, 120.0);
        assert_eq!(b.total_amount, 5000.0 + 3500.0 + 120.0);
    }

    #[test]
    fn breakdown_daily_defaults_cover() {
        let sel = selection("daily", Some(serde_json::json!({"rentDay": 700})));
        let b = sel.payment_breakdown();
        assert_eq!(b.rent, 700.0);
        assert_eq!(b.rent_type, "dailyRent");
        assert_eq!(b.accidental_cover, DEFAULT_ACCIDENTAL_COVER);
        assert_eq!(b.total_amount, 5000.0 + 700.0 + DEFAULT_ACCIDENTAL_COVER);
    }

    #[test]
    fn breakdown_tolerates_missing_slab() {
        let sel = selection("weekly", None);
        let b = sel.payment_breakdown();
        assert_eq!(b.rent, 0.0);
        assert_eq!(b.total_amount, 5000.0 + DEFAULT_ACCIDENTAL_COVER);
    }
}
