//! Record models for users.

use crate::db::store::Record;
use crate::types::UserId;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Request for updating a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdateDBRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.password_hash.is_none() && self.is_active.is_none()
    }
}

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}

impl Record for UserDBResponse {
    type CreateRequest = UserCreateDBRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_create(id: i64, request: Self::CreateRequest) -> Self {
        Self {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            password_hash: request.password_hash,
            is_active: request.is_active,
        }
    }
}
