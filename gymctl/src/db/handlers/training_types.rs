//! Repository for training types.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::{ListFilter, Repository},
    models::training_types::{TrainingTypeCreateDBRequest, TrainingTypeDBResponse, TrainingTypeUpdateDBRequest},
    store::Tables,
};
use crate::types::TrainingTypeId;
use tracing::instrument;

pub struct TrainingTypes<'c> {
    db: &'c mut Tables,
}

impl<'c> TrainingTypes<'c> {
    pub fn new(db: &'c mut Tables) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub fn get_by_name(&mut self, name: &str) -> Result<Option<TrainingTypeDBResponse>> {
        Ok(self.db.training_types.find_all().find(|t| t.name == name).cloned())
    }

    fn name_taken(&self, name: &str, except: Option<TrainingTypeId>) -> bool {
        self.db
            .training_types
            .find_all()
            .any(|t| t.name == name && Some(t.id) != except)
    }
}

impl<'c> Repository for TrainingTypes<'c> {
    type CreateRequest = TrainingTypeCreateDBRequest;
    type UpdateRequest = TrainingTypeUpdateDBRequest;
    type Response = TrainingTypeDBResponse;
    type Id = TrainingTypeId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        if self.name_taken(&request.name, None) {
            return Err(DbError::UniqueViolation {
                table: "training_types",
                conflicting_value: request.name.clone(),
            });
        }
        Ok(self.db.training_types.insert(request.clone()))
    }

    #[instrument(skip(self), err)]
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.db.training_types.find_by_id(id).cloned())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Ok(self
            .db
            .training_types
            .find_all()
            .skip(filter.skip)
            .take(filter.limit)
            .cloned()
            .collect())
    }

    /// Delete a training type. Fails while any trainer or training still references it.
    #[instrument(skip(self), err)]
    fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let referenced = self.db.trainers.find_all().any(|t| t.specialization_id == id)
            || self.db.trainings.find_all().any(|t| t.training_type_id == id);
        if referenced {
            return Err(DbError::ForeignKeyViolation {
                table: "training_types",
                message: format!("training type {id} is still referenced"),
            });
        }
        Ok(self.db.training_types.delete_by_id(id).is_some())
    }

    #[instrument(skip(self, request), err)]
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut training_type = self.db.training_types.find_by_id(id).cloned().ok_or(DbError::NotFound)?;

        if let Some(name) = &request.name {
            if self.name_taken(name, Some(id)) {
                return Err(DbError::UniqueViolation {
                    table: "training_types",
                    conflicting_value: name.clone(),
                });
            }
            training_type.name = name.clone();
        }

        self.db.training_types.update(training_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::Database;

    fn create_request(name: &str) -> TrainingTypeCreateDBRequest {
        TrainingTypeCreateDBRequest { name: name.to_string() }
    }

    #[test]
    fn test_names_are_unique() {
        let db = Database::new();
        let mut tx = db.begin();
        let mut repo = TrainingTypes::new(&mut tx);

        let yoga = repo.create(&create_request("Yoga")).unwrap();
        let boxing = repo.create(&create_request("Boxing")).unwrap();
        assert!(matches!(
            repo.create(&create_request("Yoga")),
            Err(DbError::UniqueViolation { table: "training_types", .. })
        ));

        assert_eq!(repo.get_by_name("Boxing").unwrap(), Some(boxing.clone()));
        assert!(repo.get_by_name("Pilates").unwrap().is_none());

        assert!(matches!(
            repo.update(
                boxing.id,
                &TrainingTypeUpdateDBRequest {
                    name: Some("Yoga".to_string())
                }
            ),
            Err(DbError::UniqueViolation { .. })
        ));
        let renamed = repo
            .update(
                yoga.id,
                &TrainingTypeUpdateDBRequest {
                    name: Some("Yoga".to_string()),
                },
            )
            .unwrap();
        assert_eq!(renamed, yoga);
    }

    #[test]
    fn test_referenced_type_cannot_be_deleted() {
        let db = Database::new();
        let mut tx = db.begin();
        let user = crate::test_utils::create_test_user(&mut tx, "mike.tyson", "secret");
        let boxing = TrainingTypes::new(&mut tx).create(&create_request("Boxing")).unwrap();
        tx.trainers.insert(crate::db::models::trainers::TrainerCreateDBRequest {
            user_id: user.id,
            specialization_id: boxing.id,
        });

        let mut repo = TrainingTypes::new(&mut tx);
        let cardio = repo.create(&create_request("Cardio")).unwrap();
        assert!(matches!(repo.delete(boxing.id), Err(DbError::ForeignKeyViolation { .. })));
        assert!(repo.delete(cardio.id).unwrap());
        assert!(!repo.delete(cardio.id).unwrap());
        assert_eq!(repo.list(&ListFilter::default()).unwrap(), vec![boxing]);
    }
}
