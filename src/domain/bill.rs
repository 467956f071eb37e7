//! Bill document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "bills";

/// Bill types recognized by the bills API.
pub const BILL_TYPES: &[&str] = &[
    "utility",
    "internet",
    "mobile",
    "insurance",
    "rent",
    "subscription",
    "other",
];

/// Payable bill document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    /// Human-readable reference, e.g. "BILL100003"
    pub bill_id: String,
    pub biller_name: String,
    pub biller_category: String,
    pub bill_type: String,
    pub amount: f64,
    pub due_date: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<String>,
    /// unpaid / paid
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Fields accepted when registering a bill.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    pub bill_id: String,
    pub biller_name: String,
    pub biller_category: String,
    pub bill_type: String,
    pub amount: f64,
    pub due_date: DateTime,
    pub bill_number: Option<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
}

impl Bill {
    /// Register an unpaid bill.
    pub fn create(new: NewBill) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user_id: new.user_id,
            card_id: new.card_id,
            bill_id: new.bill_id,
            biller_name: new.biller_name,
            biller_category: new.biller_category,
            bill_type: new.bill_type,
            amount: new.amount,
            due_date: new.due_date,
            bill_number: new.bill_number,
            is_recurring: new.is_recurring,
            recurring_frequency: new.recurring_frequency,
            status: "unpaid".to_string(),
            paid_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the bill paid as of now.
    pub fn mark_paid(&mut self) {
        self.status = "paid".to_string();
        self.paid_date = Some(DateTime::now());
        self.updated_at = DateTime::now();
    }
}

/// Bill response.
#[derive(Debug, Clone, Serialize)]
pub struct BillResponse {
    pub id: String,
    pub card_id: String,
    pub bill_id: String,
    pub biller_name: String,
    pub biller_category: String,
    pub bill_type: String,
    pub amount: f64,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_frequency: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id.to_hex(),
            card_id: bill.card_id.to_hex(),
            bill_id: bill.bill_id,
            biller_name: bill.biller_name,
            biller_category: bill.biller_category,
            bill_type: bill.bill_type,
            amount: bill.amount,
            due_date: bill.due_date.to_chrono().to_rfc3339(),
            bill_number: bill.bill_number,
            is_recurring: bill.is_recurring,
            recurring_frequency: bill.recurring_frequency,
            status: bill.status,
            paid_date: bill.paid_date.map(|d| d.to_chrono().to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paying_a_bill_records_the_payment_date() {
        let mut bill = Bill::create(NewBill {
            user_id: ObjectId::new(),
            card_id: ObjectId::new(),
            bill_id: "BILL100001".to_string(),
            biller_name: "Electricity".to_string(),
            biller_category: "utilities".to_string(),
            bill_type: "utility".to_string(),
            amount: 4500.0,
            due_date: DateTime::now(),
            bill_number: None,
            is_recurring: true,
            recurring_frequency: Some("monthly".to_string()),
        });

        assert_eq!(bill.status, "unpaid");
        assert!(bill.paid_date.is_none());

        bill.mark_paid();
        assert_eq!(bill.status, "paid");
        assert!(bill.paid_date.is_some());
    }
}
