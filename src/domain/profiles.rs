//! Profile domain types
//!
//! Identity of the signed-in user, stored in the user table.

use serde::{Deserialize, Serialize};

/// Identifier of a user record.
pub type UserId = i64;

/// User identity entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Request DTO for updating a profile. Email is not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request DTO for starting a session
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub user_id: UserId,
}
