//! Chat assistant message document.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

/// MongoDB collection name
pub const COLLECTION: &str = "chat_messages";

/// One exchange with the in-app finance assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub message: String,
    pub reply: String,
    pub created_at: DateTime,
}

impl ChatMessage {
    pub fn create(user_id: ObjectId, message: String, reply: String) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            message,
            reply,
            created_at: DateTime::now(),
        }
    }
}

/// Chat exchange response.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub message: String,
    pub reply: String,
    pub created_at: String,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(msg: ChatMessage) -> Self {
        Self {
            id: msg.id.to_hex(),
            message: msg.message,
            reply: msg.reply,
            created_at: msg.created_at.to_chrono().to_rfc3339(),
        }
    }
}
