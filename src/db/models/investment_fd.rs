use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const VALID_PAYMENT_METHODS: &[&str] = &["Cash", "Bank Transfer", "Cheque", "Online", "UPI"];
pub const VALID_KYC_STATUSES: &[&str] = &["pending", "approved", "rejected"];

/// A fixed-deposit investment. `maturity_date` and `maturity_amount` are
/// derived from the principal, rate and term at create/update time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentFd {
    pub id: String,
    pub investor_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub investment_date: NaiveDate,
    pub payment_method: String,
    pub investment_rate: f64,
    pub investment_amount: f64,
    pub plan_id: Option<String>,
    pub plan_name: String,
    pub fd_type: String,
    pub term_months: Option<i64>,
    pub term_years: Option<i64>,
    pub status: String,
    pub kyc_status: String,
    pub maturity_date: Option<NaiveDate>,
    pub maturity_amount: f64,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentFd {
    pub investor_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub investment_date: NaiveDate,
    pub payment_method: String,
    pub investment_rate: f64,
    pub investment_amount: f64,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    pub fd_type: String,
    pub term_months: Option<i64>,
    pub term_years: Option<i64>,
    pub status: Option<String>,
    pub kyc_status: Option<String>,
    pub maturity_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentFd {
    pub investor_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub investment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub investment_rate: Option<f64>,
    pub investment_amount: Option<f64>,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    pub fd_type: Option<String>,
    pub term_months: Option<i64>,
    pub term_years: Option<i64>,
    pub status: Option<String>,
    pub kyc_status: Option<String>,
    pub maturity_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Simple-interest maturity amount: `P + P * r * t`, with `t` in years.
pub fn maturity_amount(
    principal: f64,
    rate_percent: f64,
    fd_type: &str,
    term_months: Option<i64>,
    term_years: Option<i64>,
) -> f64 {
    let rate = rate_percent / 100.0;
    let time = if fd_type == "monthly" {
        term_months.unwrap_or(0) as f64 / 12.0
    } else {
        term_years.unwrap_or(0) as f64
    };
    principal + principal * rate * time
}

/// Maturity date: the investment date shifted by the term. Month arithmetic
/// clamps to the last day of the target month (e.g. Jan 31 + 1 month = Feb 28).
pub fn maturity_date(
    investment_date: NaiveDate,
    fd_type: &str,
    term_months: Option<i64>,
    term_years: Option<i64>,
) -> Option<NaiveDate> {
    match fd_type {
        "monthly" => add_months(investment_date, term_months? as i32),
        "yearly" => add_months(investment_date, (term_years? as i32) * 12),
        _ => None,
    }
}

fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    let day = date.day();
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month0 + 1, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maturity_amount_monthly_simple_interest() {
        // 100000 at 12% for 6 months -> 100000 + 100000 * 0.12 * 0.5
        let amount = maturity_amount(100_000.0, 12.0, "monthly", Some(6), None);
        assert!((amount - 106_000.0).abs() < 1e-6);
    }

    #[test]
    fn maturity_amount_yearly_simple_interest() {
        let amount = maturity_amount(50_000.0, 8.0, "yearly", None, Some(2));
        assert!((amount - 58_000.0).abs() < 1e-6);
    }

    #[test]
    fn maturity_date_shifts_by_term() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            maturity_date(start, "monthly", Some(6), None),
            NaiveDate::from_ymd_opt(2024, 9, 15)
        );
        assert_eq!(
            maturity_date(start, "yearly", None, Some(3)),
            NaiveDate::from_ymd_opt(2027, 3, 15)
        );
    }

    #[test]
    fn maturity_date_clamps_to_month_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            maturity_date(start, "monthly", Some(1), None),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn maturity_date_requires_term() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(maturity_date(start, "monthly", None, Some(2)), None);
    }
}
