//! User document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

use super::Password;
use crate::errors::AppResult;

/// MongoDB collection name
pub const COLLECTION: &str = "users";

/// Account holder document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Fields accepted when registering a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub annual_income: Option<f64>,
}

impl User {
    /// Create a new active user, hashing the supplied password.
    pub fn create(new: NewUser) -> AppResult<Self> {
        let now = DateTime::now();
        Ok(Self {
            id: ObjectId::new(),
            username: new.username,
            email: new.email,
            password_hash: Password::new(&new.password)?.into_string(),
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            annual_income: new.annual_income,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Full display name used on cards and statements.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User response (safe to return to clients).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            created_at: user.created_at.to_chrono().to_rfc3339(),
        }
    }
}
