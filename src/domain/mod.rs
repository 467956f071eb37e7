//! Domain layer - Document models and core business types
//!
//! Each entity maps to one MongoDB collection and carries a factory
//! constructor that establishes its invariants (derived balances,
//! installment amounts, initial state flags).

pub mod bill;
pub mod card;
pub mod chat_message;
pub mod cibil_score;
pub mod emi;
pub mod notification;
pub mod order;
pub mod password;
pub mod product;
pub mod transaction;
pub mod user;

pub use bill::{Bill, BillResponse, NewBill};
pub use card::{Card, CardResponse, NewCard};
pub use chat_message::{ChatMessage, ChatMessageResponse};
pub use cibil_score::{CibilScore, CibilScoreResponse, NewCibilScore};
pub use emi::{Emi, EmiResponse, NewEmi};
pub use notification::{Notification, NotificationResponse};
pub use order::{Order, OrderItem, OrderItemResponse, OrderResponse};
pub use password::Password;
pub use product::{Product, ProductResponse};
pub use transaction::{NewTransaction, Transaction, TransactionResponse};
pub use user::{NewUser, User, UserResponse};
