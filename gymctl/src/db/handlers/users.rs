//! Repository for users.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{ListFilter, Repository},
    models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    store::Tables,
};
use crate::types::UserId;
use tracing::instrument;

pub struct Users<'c> {
    db: &'c mut Tables,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut Tables) -> Self {
        Self { db }
    }

    /// Find a user by exact username. First match in insertion order wins.
    #[instrument(skip(self), err)]
    pub fn get_user_by_username(&mut self, username: &str) -> Result<Option<UserDBResponse>> {
        Ok(self.db.users.find_all().find(|u| u.username == username).cloned())
    }

    pub fn username_exists(&self, username: &str) -> bool {
        self.db.users.find_all().any(|u| u.username == username)
    }
}

impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        if self.username_exists(&request.username) {
            return Err(DbError::UniqueViolation {
                table: "users",
                conflicting_value: request.username.clone(),
            });
        }
        Ok(self.db.users.insert(request.clone()))
    }

    #[instrument(skip(self), err)]
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.db.users.find_by_id(id).cloned())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Ok(self.db.users.find_all().skip(filter.skip).take(filter.limit).cloned().collect())
    }

    #[instrument(skip(self), err)]
    fn delete(&mut self, id: Self::Id) -> Result<bool> {
        Ok(self.db.users.delete_by_id(id).is_some())
    }

    #[instrument(skip(self, request), err)]
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut user = self.db.users.find_by_id(id).cloned().ok_or(DbError::NotFound)?;

        if let Some(first_name) = &request.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &request.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(password_hash) = &request.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }

        self.db.users.update(user)
    }
}
