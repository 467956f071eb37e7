//! Credit card document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "cards";

/// Credit card document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub card_number: String,
    pub card_holder_name: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    #[serde(skip_serializing)]
    pub cvv: String,
    /// "credit" or "debit"
    pub card_type: String,
    /// VISA / MASTERCARD / RUPAY
    pub card_brand: String,
    /// Product name, e.g. "HDFC Millennia"
    pub card_name: String,
    pub credit_limit: f64,
    pub outstanding_balance: f64,
    pub available_credit: f64,
    /// Day of month the statement is due
    pub due_date: u32,
    pub is_blocked: bool,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Fields accepted when adding a card.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: ObjectId,
    pub card_number: String,
    pub card_holder_name: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
    pub card_type: String,
    pub card_brand: String,
    pub card_name: String,
    pub credit_limit: f64,
    pub due_date: u32,
}

impl Card {
    /// Create a card with a clean slate: nothing outstanding, the whole
    /// limit available.
    pub fn create(new: NewCard) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user_id: new.user_id,
            card_number: new.card_number,
            card_holder_name: new.card_holder_name,
            expiry_month: new.expiry_month,
            expiry_year: new.expiry_year,
            cvv: new.cvv,
            card_type: new.card_type,
            card_brand: new.card_brand,
            card_name: new.card_name,
            credit_limit: new.credit_limit,
            outstanding_balance: 0.0,
            available_credit: new.credit_limit,
            due_date: new.due_date,
            is_blocked: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Last four digits, for logs and notifications.
    pub fn masked_number(&self) -> String {
        let last4 = self
            .card_number
            .get(self.card_number.len().saturating_sub(4)..)
            .unwrap_or("");
        format!("**** **** **** {last4}")
    }
}

/// Card response (omits the CVV).
#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub id: String,
    pub user_id: String,
    pub card_number: String,
    pub card_holder_name: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub card_type: String,
    pub card_brand: String,
    pub card_name: String,
    pub credit_limit: f64,
    pub outstanding_balance: f64,
    pub available_credit: f64,
    pub due_date: u32,
    pub is_blocked: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.to_hex(),
            user_id: card.user_id.to_hex(),
            card_number: card.card_number,
            card_holder_name: card.card_holder_name,
            expiry_month: card.expiry_month,
            expiry_year: card.expiry_year,
            card_type: card.card_type,
            card_brand: card.card_brand,
            card_name: card.card_name,
            credit_limit: card.credit_limit,
            outstanding_balance: card.outstanding_balance,
            available_credit: card.available_credit,
            due_date: card.due_date,
            is_blocked: card.is_blocked,
            is_active: card.is_active,
            created_at: card.created_at.to_chrono().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> Card {
        Card::create(NewCard {
            user_id: ObjectId::new(),
            card_number: "4111111111111111".to_string(),
            card_holder_name: "Test User".to_string(),
            expiry_month: 12,
            expiry_year: 2027,
            cvv: "123".to_string(),
            card_type: "credit".to_string(),
            card_brand: "VISA".to_string(),
            card_name: "HDFC Millennia".to_string(),
            credit_limit: 150000.0,
            due_date: 5,
        })
    }

    #[test]
    fn new_card_starts_with_full_credit_available() {
        let card = sample_card();
        assert_eq!(card.outstanding_balance, 0.0);
        assert_eq!(card.available_credit, card.credit_limit);
        assert!(!card.is_blocked);
        assert!(card.is_active);
    }

    #[test]
    fn masked_number_shows_only_last_four() {
        let card = sample_card();
        assert_eq!(card.masked_number(), "**** **** **** 1111");
    }
}
