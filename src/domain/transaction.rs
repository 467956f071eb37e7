//! Card transaction document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "transactions";

/// Merchant categories recognized by the transactions API.
pub const CATEGORIES: &[&str] = &[
    "groceries",
    "restaurants",
    "online_shopping",
    "subscriptions",
    "transportation",
    "entertainment",
    "utilities",
    "travel",
    "healthcare",
    "other",
];

/// Card transaction document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    /// Human-readable reference, e.g. "TXN100042"
    pub transaction_id: String,
    pub merchant_name: String,
    pub merchant_category: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// "debit" or "credit"
    pub transaction_type: String,
    /// pending / completed / refunded
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub transaction_date: DateTime,
    pub created_at: DateTime,
}

/// Fields accepted when recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: ObjectId,
    pub card_id: ObjectId,
    pub transaction_id: String,
    pub merchant_name: String,
    pub merchant_category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub transaction_type: String,
    pub location: Option<String>,
}

impl Transaction {
    /// Record a completed transaction stamped with the current time.
    pub fn create(new: NewTransaction) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user_id: new.user_id,
            card_id: new.card_id,
            transaction_id: new.transaction_id,
            merchant_name: new.merchant_name,
            merchant_category: new.merchant_category,
            amount: new.amount,
            description: new.description,
            transaction_type: new.transaction_type,
            status: "completed".to_string(),
            location: new.location,
            transaction_date: now,
            created_at: now,
        }
    }
}

/// Transaction response.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub card_id: String,
    pub transaction_id: String,
    pub merchant_name: String,
    pub merchant_category: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transaction_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub transaction_date: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id.to_hex(),
            card_id: tx.card_id.to_hex(),
            transaction_id: tx.transaction_id,
            merchant_name: tx.merchant_name,
            merchant_category: tx.merchant_category,
            amount: tx.amount,
            description: tx.description,
            transaction_type: tx.transaction_type,
            status: tx.status,
            location: tx.location,
            transaction_date: tx.transaction_date.to_chrono().to_rfc3339(),
        }
    }
}
