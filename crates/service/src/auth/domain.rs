use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_MANAGER: &str = "manager";

/// Customer registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCustomerInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Manager registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterManagerInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: String,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Login input, shared by both account kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain account (business view of a customer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAccount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Domain account (business view of a manager)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerAccount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub department: String,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub account_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Customer login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub account: AuthAccount,
    pub token: Option<String>,
}

/// Manager login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerSession {
    pub manager: ManagerAccount,
    pub token: Option<String>,
}

/// Pending password reset held on the customer record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}
