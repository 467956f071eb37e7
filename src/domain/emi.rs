//! EMI (equated monthly installment) document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use chrono::Months;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "emis";

/// Reducing-balance monthly installment for a loan of `principal` at
/// `annual_rate` percent over `tenure_months`, rounded to paise.
pub fn monthly_installment(principal: f64, annual_rate: f64, tenure_months: u32) -> f64 {
    let n = f64::from(tenure_months);
    if tenure_months == 0 {
        return 0.0;
    }
    let r = annual_rate / 12.0 / 100.0;
    let raw = if r == 0.0 {
        principal / n
    } else {
        let factor = (1.0 + r).powf(n);
        principal * r * factor / (factor - 1.0)
    };
    (raw * 100.0).round() / 100.0
}

/// Installment loan document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emi {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    /// Human-readable reference, e.g. "EMI10001"
    pub emi_id: String,
    pub principal_amount: f64,
    /// Annual interest rate in percent
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub emi_amount: f64,
    pub total_amount: f64,
    pub total_paid: f64,
    pub remaining_amount: f64,
    pub start_date: DateTime,
    pub end_date: DateTime,
    /// active / closed
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub created_at: DateTime,
}

/// Fields accepted when opening an EMI.
#[derive(Debug, Clone)]
pub struct NewEmi {
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    pub emi_id: String,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub start_date: DateTime,
    pub description: Option<String>,
    pub merchant_name: Option<String>,
    pub product_name: Option<String>,
}

impl Emi {
    /// Open an EMI, deriving the installment and repayment schedule.
    pub fn create(new: NewEmi) -> Self {
        let emi_amount =
            monthly_installment(new.principal_amount, new.interest_rate, new.tenure_months);
        let total_amount = (emi_amount * f64::from(new.tenure_months) * 100.0).round() / 100.0;
        let end_date = new
            .start_date
            .to_chrono()
            .checked_add_months(Months::new(new.tenure_months))
            .map(DateTime::from_chrono)
            .unwrap_or(new.start_date);

        Self {
            id: ObjectId::new(),
            user_id: new.user_id,
            card_id: new.card_id,
            emi_id: new.emi_id,
            principal_amount: new.principal_amount,
            interest_rate: new.interest_rate,
            tenure_months: new.tenure_months,
            emi_amount,
            total_amount,
            total_paid: 0.0,
            remaining_amount: total_amount,
            start_date: new.start_date,
            end_date,
            status: "active".to_string(),
            description: new.description,
            merchant_name: new.merchant_name,
            product_name: new.product_name,
            created_at: DateTime::now(),
        }
    }

    /// Apply a payment, closing the loan once nothing remains.
    pub fn record_payment(&mut self, amount: f64) {
        self.total_paid += amount;
        self.remaining_amount = (self.total_amount - self.total_paid).max(0.0);
        if self.remaining_amount == 0.0 {
            self.status = "closed".to_string();
        }
    }
}

/// EMI response.
#[derive(Debug, Clone, Serialize)]
pub struct EmiResponse {
    pub id: String,
    pub card_id: String,
    pub emi_id: String,
    pub principal_amount: f64,
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub emi_amount: f64,
    pub total_amount: f64,
    pub total_paid: f64,
    pub remaining_amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

impl From<Emi> for EmiResponse {
    fn from(emi: Emi) -> Self {
        Self {
            id: emi.id.to_hex(),
            card_id: emi.card_id.to_hex(),
            emi_id: emi.emi_id,
            principal_amount: emi.principal_amount,
            interest_rate: emi.interest_rate,
            tenure_months: emi.tenure_months,
            emi_amount: emi.emi_amount,
            total_amount: emi.total_amount,
            total_paid: emi.total_paid,
            remaining_amount: emi.remaining_amount,
            start_date: emi.start_date.to_chrono().to_rfc3339(),
            end_date: emi.end_date.to_chrono().to_rfc3339(),
            status: emi.status,
            description: emi.description,
            merchant_name: emi.merchant_name,
            product_name: emi.product_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_emi() -> Emi {
        Emi::create(NewEmi {
            user_id: ObjectId::new(),
            card_id: ObjectId::new(),
            emi_id: "EMI10001".to_string(),
            principal_amount: 24000.0,
            interest_rate: 12.5,
            tenure_months: 12,
            start_date: DateTime::now(),
            description: Some("iPhone 15 Pro".to_string()),
            merchant_name: None,
            product_name: None,
        })
    }

    #[test]
    fn installment_uses_reducing_balance_formula() {
        // 24000 at 12.5% over 12 months: ~2138 per month
        let emi = monthly_installment(24000.0, 12.5, 12);
        assert!((emi - 2138.06).abs() < 0.5, "unexpected installment {emi}");
    }

    #[test]
    fn zero_interest_splits_principal_evenly() {
        assert_eq!(monthly_installment(12000.0, 0.0, 12), 1000.0);
    }

    #[test]
    fn zero_tenure_yields_zero_installment() {
        assert_eq!(monthly_installment(12000.0, 10.0, 0), 0.0);
    }

    #[test]
    fn new_emi_owes_the_full_schedule() {
        let emi = sample_emi();
        assert_eq!(emi.total_paid, 0.0);
        assert_eq!(emi.remaining_amount, emi.total_amount);
        assert_eq!(emi.status, "active");
    }

    #[test]
    fn full_repayment_closes_the_loan() {
        let mut emi = sample_emi();
        let total = emi.total_amount;
        emi.record_payment(total);
        assert_eq!(emi.remaining_amount, 0.0);
        assert_eq!(emi.status, "closed");
    }
}
