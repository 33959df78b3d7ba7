//! Training type catalogue.

use tracing::{info, instrument};

use crate::api::models::training_types::TrainingTypeResponse;
use crate::db::{
    errors::DbError,
    handlers::{ListFilter, Repository, TrainingTypes},
    models::training_types::TrainingTypeCreateDBRequest,
    store::Database,
};
use crate::errors::{Error, Result};
use crate::types::TrainingTypeId;

#[derive(Clone)]
pub struct TrainingTypeService {
    db: Database,
}

impl TrainingTypeService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub fn list(&self) -> Result<Vec<TrainingTypeResponse>> {
        let mut tx = self.db.read();
        let types = TrainingTypes::new(&mut tx).list(&ListFilter::default())?;
        Ok(types.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    pub fn get_by_id(&self, id: TrainingTypeId) -> Result<TrainingTypeResponse> {
        let mut tx = self.db.read();
        let training_type = TrainingTypes::new(&mut tx).get_by_id(id)?.ok_or_else(|| Error::NotFound {
            resource: "Training type".to_string(),
            id: id.to_string(),
        })?;
        Ok(training_type.into())
    }

    /// Register a training type. Names are trimmed and must be unique.
    #[instrument(skip(self), err)]
    pub fn register(&self, name: &str) -> Result<TrainingTypeResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingAttributes {
                attributes: vec!["name".to_string()],
            });
        }

        let mut tx = self.db.begin();
        let created = match TrainingTypes::new(&mut tx).create(&TrainingTypeCreateDBRequest { name: name.to_string() }) {
            Ok(created) => created,
            Err(DbError::UniqueViolation { .. }) => {
                return Err(Error::Conflict {
                    message: format!("Training type '{name}' already exists"),
                });
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit();

        info!(%name, id = created.id, "Registered training type");
        Ok(created.into())
    }
}
