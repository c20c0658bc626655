//! User identity and auth payload models.

use serde::{Deserialize, Serialize};

/// The authenticated user identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Payload returned by signup/login (with token) and get-current-user
/// (without).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

/// Request body for signup.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
