//! Repository for trainer profiles.

use crate::auth::password;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{ListFilter, Repository},
    models::trainers::{Trainer, TrainerCreateDBRequest, TrainerDBResponse, TrainerUpdateDBRequest},
    store::Tables,
};
use crate::types::{TrainerId, TrainingTypeId, UserId};
use anyhow::anyhow;
use tracing::instrument;

pub struct Trainers<'c> {
    db: &'c mut Tables,
}

impl<'c> Trainers<'c> {
    pub fn new(db: &'c mut Tables) -> Self {
        Self { db }
    }

    fn resolve(&self, trainer: &Trainer) -> Result<TrainerDBResponse> {
        let user = self
            .db
            .users
            .find_by_id(trainer.user_id)
            .cloned()
            .ok_or_else(|| anyhow!("trainer {} references missing user {}", trainer.id, trainer.user_id))?;
        let specialization = self
            .db
            .training_types
            .find_by_id(trainer.specialization_id)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "trainer {} references missing training type {}",
                    trainer.id,
                    trainer.specialization_id
                )
            })?;
        Ok(TrainerDBResponse {
            id: trainer.id,
            user,
            specialization,
        })
    }

    fn ensure_training_type(&self, id: TrainingTypeId) -> Result<()> {
        match self.db.training_types.find_by_id(id) {
            Some(_) => Ok(()),
            None => Err(DbError::ForeignKeyViolation {
                table: "trainers",
                message: format!("training type {id} does not exist"),
            }),
        }
    }

    #[instrument(skip(self), err)]
    pub fn get_by_user_id(&mut self, user_id: UserId) -> Result<Option<TrainerDBResponse>> {
        match self.db.trainers.find_all().find(|t| t.user_id == user_id) {
            Some(trainer) => self.resolve(trainer).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub fn get_by_username(&mut self, username: &str) -> Result<Option<TrainerDBResponse>> {
        let found = self.db.trainers.find_all().find(|trainer| {
            self.db
                .users
                .find_by_id(trainer.user_id)
                .is_some_and(|user| user.username == username)
        });
        match found {
            Some(trainer) => self.resolve(trainer).map(Some),
            None => Ok(None),
        }
    }

    /// Look up a trainer by username and check the plaintext password against the stored hash.
    #[instrument(skip(self, password), err)]
    pub fn get_by_credentials(&mut self, username: &str, password: &str) -> Result<Option<TrainerDBResponse>> {
        let Some(trainer) = self.get_by_username(username)? else {
            return Ok(None);
        };
        let matches = password::verify_string(password, &trainer.user.password_hash).map_err(|e| DbError::Other(e.into()))?;
        Ok(matches.then_some(trainer))
    }
}

impl<'c> Repository for Trainers<'c> {
    type CreateRequest = TrainerCreateDBRequest;
    type UpdateRequest = TrainerUpdateDBRequest;
    type Response = TrainerDBResponse;
    type Id = TrainerId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(user_id = request.user_id), err)]
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        if self.db.users.find_by_id(request.user_id).is_none() {
            return Err(DbError::ForeignKeyViolation {
                table: "trainers",
                message: format!("user {} does not exist", request.user_id),
            });
        }
        self.ensure_training_type(request.specialization_id)?;
        if self.db.trainers.find_all().any(|t| t.user_id == request.user_id) {
            return Err(DbError::UniqueViolation {
                table: "trainers",
                conflicting_value: request.user_id.to_string(),
            });
        }

        let trainer = self.db.trainers.insert(request.clone());
        self.resolve(&trainer)
    }

    #[instrument(skip(self), err)]
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        match self.db.trainers.find_by_id(id) {
            Some(trainer) => self.resolve(trainer).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        self.db
            .trainers
            .find_all()
            .skip(filter.skip)
            .take(filter.limit)
            .map(|trainer| self.resolve(trainer))
            .collect()
    }

    #[instrument(skip(self), err)]
    fn delete(&mut self, id: Self::Id) -> Result<bool> {
        Ok(self.db.trainers.delete_by_id(id).is_some())
    }

    #[instrument(skip(self, request), err)]
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut trainer = self.db.trainers.find_by_id(id).cloned().ok_or(DbError::NotFound)?;

        if let Some(specialization_id) = request.specialization_id {
            self.ensure_training_type(specialization_id)?;
            trainer.specialization_id = specialization_id;
        }

        let trainer = self.db.trainers.update(trainer)?;
        self.resolve(&trainer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::Database;
    use crate::test_utils::{create_test_training_type, create_test_user};

    #[test]
    fn test_create_resolves_specialization() {
        let db = Database::new();
        let mut tx = db.begin();
        let user = create_test_user(&mut tx, "mike.tyson", "secret");
        let boxing = create_test_training_type(&mut tx, "Boxing");

        let mut repo = Trainers::new(&mut tx);
        let created = repo
            .create(&TrainerCreateDBRequest {
                user_id: user.id,
                specialization_id: boxing.id,
            })
            .unwrap();

        assert_eq!(created.specialization, boxing);
        assert_eq!(repo.get_by_username("mike.tyson").unwrap(), Some(created.clone()));
        assert_eq!(repo.get_by_user_id(user.id).unwrap(), Some(created.clone()));
        assert!(repo.get_by_credentials("mike.tyson", "secret").unwrap().is_some());
        assert!(repo.get_by_credentials("mike.tyson", "nope").unwrap().is_none());
    }

    #[test]
    fn test_unknown_specialization_is_rejected() {
        let db = Database::new();
        let mut tx = db.begin();
        let user = create_test_user(&mut tx, "mike.tyson", "secret");

        let mut repo = Trainers::new(&mut tx);
        let err = repo
            .create(&TrainerCreateDBRequest {
                user_id: user.id,
                specialization_id: 7,
            })
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { table: "trainers", .. }));
    }

    #[test]
    fn test_update_specialization() {
        let db = Database::new();
        let mut tx = db.begin();
        let user = create_test_user(&mut tx, "mike.tyson", "secret");
        let boxing = create_test_training_type(&mut tx, "Boxing");
        let cardio = create_test_training_type(&mut tx, "Cardio");

        let mut repo = Trainers::new(&mut tx);
        let created = repo
            .create(&TrainerCreateDBRequest {
                user_id: user.id,
                specialization_id: boxing.id,
            })
            .unwrap();

        let updated = repo
            .update(
                created.id,
                &TrainerUpdateDBRequest {
                    specialization_id: Some(cardio.id),
                },
            )
            .unwrap();
        assert_eq!(updated.specialization.name, "Cardio");

        let unchanged = repo.update(created.id, &TrainerUpdateDBRequest::default()).unwrap();
        assert_eq!(unchanged.specialization.name, "Cardio");

        assert!(matches!(
            repo.update(created.id, &TrainerUpdateDBRequest { specialization_id: Some(99) }),
            Err(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[test]
    fn test_list_pages_in_insertion_order() {
        let db = Database::new();
        let mut tx = db.begin();
        let boxing = create_test_training_type(&mut tx, "Boxing");
        for name in ["a.a", "b.b", "c.c"] {
            let user = create_test_user(&mut tx, name, "secret");
            Trainers::new(&mut tx)
                .create(&TrainerCreateDBRequest {
                    user_id: user.id,
                    specialization_id: boxing.id,
                })
                .unwrap();
        }

        let mut repo = Trainers::new(&mut tx);
        let names: Vec<_> = repo
            .list(&ListFilter::new(1, 10))
            .unwrap()
            .into_iter()
            .map(|t| t.user.username)
            .collect();
        assert_eq!(names, vec!["b.b", "c.c"]);
    }
}
