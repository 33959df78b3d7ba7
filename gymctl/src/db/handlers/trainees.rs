//! Repository for trainee profiles.

use crate::auth::password;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{ListFilter, Repository},
    models::trainees::{Trainee, TraineeCreateDBRequest, TraineeDBResponse, TraineeUpdateDBRequest},
    store::Tables,
};
use crate::types::{TraineeId, UserId};
use anyhow::anyhow;
use tracing::instrument;

pub struct Trainees<'c> {
    db: &'c mut Tables,
}

impl<'c> Trainees<'c> {
    pub fn new(db: &'c mut Tables) -> Self {
        Self { db }
    }

    fn resolve(&self, trainee: &Trainee) -> Result<TraineeDBResponse> {
        let user = self
            .db
            .users
            .find_by_id(trainee.user_id)
            .cloned()
            .ok_or_else(|| anyhow!("trainee {} references missing user {}", trainee.id, trainee.user_id))?;
        Ok(TraineeDBResponse::from((user, trainee.clone())))
    }

    #[instrument(skip(self), err)]
    pub fn get_by_user_id(&mut self, user_id: UserId) -> Result<Option<TraineeDBResponse>> {
        match self.db.trainees.find_all().find(|t| t.user_id == user_id) {
            Some(trainee) => self.resolve(trainee).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub fn get_by_username(&mut self, username: &str) -> Result<Option<TraineeDBResponse>> {
        let users = &self.db.users;
        let found = self.db.trainees.find_all().find_map(|trainee| {
            users
                .find_by_id(trainee.user_id)
                .filter(|user| user.username == username)
                .map(|user| TraineeDBResponse::from((user.clone(), trainee.clone())))
        });
        Ok(found)
    }

    /// Look up a trainee by username and check the plaintext password against the stored hash.
    ///
    /// Returns `None` when the username is unknown or the password does not match.
    #[instrument(skip(self, password), err)]
    pub fn get_by_credentials(&mut self, username: &str, password: &str) -> Result<Option<TraineeDBResponse>> {
        let Some(trainee) = self.get_by_username(username)? else {
            return Ok(None);
        };
        let matches = password::verify_string(password, &trainee.user.password_hash).map_err(|e| DbError::Other(e.into()))?;
        Ok(matches.then_some(trainee))
    }
}

impl<'c> Repository for Trainees<'c> {
    type CreateRequest = TraineeCreateDBRequest;
    type UpdateRequest = TraineeUpdateDBRequest;
    type Response = TraineeDBResponse;
    type Id = TraineeId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        if self.db.users.find_by_id(request.user_id).is_none() {
            return Err(DbError::ForeignKeyViolation {
                table: "trainees",
                message: format!("user {} does not exist", request.user_id),
            });
        }
        if self.db.trainees.find_all().any(|t| t.user_id == request.user_id) {
            return Err(DbError::UniqueViolation {
                table: "trainees",
                conflicting_value: request.user_id.to_string(),
            });
        }

        let trainee = self.db.trainees.insert(request.clone());
        self.resolve(&trainee)
    }

    #[instrument(skip(self), err)]
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        match self.db.trainees.find_by_id(id) {
            Some(trainee) => self.resolve(trainee).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        self.db
            .trainees
            .find_all()
            .skip(filter.skip)
            .take(filter.limit)
            .map(|trainee| self.resolve(trainee))
            .collect()
    }

    #[instrument(skip(self), err)]
    fn delete(&mut self, id: Self::Id) -> Result<bool> {
        Ok(self.db.trainees.delete_by_id(id).is_some())
    }

    #[instrument(skip(self, request), err)]
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut trainee = self.db.trainees.find_by_id(id).cloned().ok_or(DbError::NotFound)?;

        if let Some(date_of_birth) = request.date_of_birth {
            trainee.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = &request.address {
            trainee.address = Some(address.clone());
        }

        let trainee = self.db.trainees.update(trainee)?;
        self.resolve(&trainee)
    }
}
