//! CIBIL score document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "cibil_scores";

/// Credit-worthiness snapshot document. Only the newest record per user
/// carries `is_current: true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CibilScore {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    /// Composite score, 300-900
    pub score: i32,
    pub score_date: DateTime,
    pub score_type: String,
    // Component scores, each 0-100
    pub payment_history_score: i32,
    pub credit_utilization_score: i32,
    pub credit_age_score: i32,
    pub credit_mix_score: i32,
    pub new_credit_score: i32,
    // Account aggregates
    pub total_accounts: i32,
    pub active_accounts: i32,
    pub closed_accounts: i32,
    pub total_credit_limit: f64,
    pub total_outstanding: f64,
    pub late_payments: i32,
    pub missed_payments: i32,
    pub is_current: bool,
    pub created_at: DateTime,
}

/// Fields accepted when recording a score snapshot.
#[derive(Debug, Clone)]
pub struct NewCibilScore {
    pub user_id: ObjectId,
    pub score: i32,
    pub score_date: DateTime,
    pub score_type: String,
    pub payment_history_score: i32,
    pub credit_utilization_score: i32,
    pub credit_age_score: i32,
    pub credit_mix_score: i32,
    pub new_credit_score: i32,
}

impl CibilScore {
    /// Record a snapshot marked as the current score; aggregates start at
    /// zero and are filled in by the caller when known.
    pub fn create(new: NewCibilScore) -> Self {
        Self {
            id: ObjectId::new(),
            user_id: new.user_id,
            score: new.score,
            score_date: new.score_date,
            score_type: new.score_type,
            payment_history_score: new.payment_history_score,
            credit_utilization_score: new.credit_utilization_score,
            credit_age_score: new.credit_age_score,
            credit_mix_score: new.credit_mix_score,
            new_credit_score: new.new_credit_score,
            total_accounts: 0,
            active_accounts: 0,
            closed_accounts: 0,
            total_credit_limit: 0.0,
            total_outstanding: 0.0,
            late_payments: 0,
            missed_payments: 0,
            is_current: true,
            created_at: DateTime::now(),
        }
    }
}

/// CIBIL score response.
#[derive(Debug, Clone, Serialize)]
pub struct CibilScoreResponse {
    pub id: String,
    pub score: i32,
    pub score_date: String,
    pub score_type: String,
    pub payment_history_score: i32,
    pub credit_utilization_score: i32,
    pub credit_age_score: i32,
    pub credit_mix_score: i32,
    pub new_credit_score: i32,
    pub total_accounts: i32,
    pub active_accounts: i32,
    pub closed_accounts: i32,
    pub total_credit_limit: f64,
    pub total_outstanding: f64,
    pub late_payments: i32,
    pub missed_payments: i32,
    pub is_current: bool,
}

impl From<CibilScore> for CibilScoreResponse {
    fn from(score: CibilScore) -> Self {
        Self {
            id: score.id.to_hex(),
            score: score.score,
            score_date: score.score_date.to_chrono().to_rfc3339(),
            score_type: score.score_type,
            payment_history_score: score.payment_history_score,
            credit_utilization_score: score.credit_utilization_score,
            credit_age_score: score.credit_age_score,
            credit_mix_score: score.credit_mix_score,
            new_credit_score: score.new_credit_score,
            total_accounts: score.total_accounts,
            active_accounts: score.active_accounts,
            closed_accounts: score.closed_accounts,
            total_credit_limit: score.total_credit_limit,
            total_outstanding: score.total_outstanding,
            late_payments: score.late_payments,
            missed_payments: score.missed_payments,
            is_current: score.is_current,
        }
    }
}
