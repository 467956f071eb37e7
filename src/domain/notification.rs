//! Notification document and related types.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "notifications";

/// User-facing notification document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub title: String,
    pub message: String,
    /// bill / transaction / emi / promotional / system
    pub notification_type: String,
    /// low / medium / high
    pub priority: String,
    pub channels: Vec<String>,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl Notification {
    /// Create an unread in-app notification.
    pub fn create(
        user_id: ObjectId,
        title: impl Into<String>,
        message: impl Into<String>,
        notification_type: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type: notification_type.into(),
            priority: priority.into(),
            channels: vec!["in_app".to_string()],
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        }
    }

    /// Mark as read, stamping the read time.
    pub fn mark_as_read(&mut self) {
        self.is_read = true;
        self.read_at = Some(DateTime::now());
    }
}

/// Notification response.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub priority: String,
    pub channels: Vec<String>,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_hex(),
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            priority: n.priority,
            channels: n.channels,
            is_read: n.is_read,
            read_at: n.read_at.map(|d| d.to_chrono().to_rfc3339()),
            created_at: n.created_at.to_chrono().to_rfc3339(),
        }
    }
}
