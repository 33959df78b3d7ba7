//! Repository for training sessions.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::trainings::{Training, TrainingCreateDBRequest, TrainingDBResponse, TrainingUpdateDBRequest},
    store::Tables,
};
use crate::types::{TraineeId, TrainerId, TrainingId};
use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::instrument;

/// Filter for listing trainings. Every `Some` criterion must match.
#[derive(Debug, Clone)]
pub struct TrainingFilter {
    pub trainee_id: Option<TraineeId>,
    pub trainer_id: Option<TrainerId>,
    /// Inclusive lower bound on the training date
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the training date
    pub to: Option<NaiveDate>,
    pub trainee_username: Option<String>,
    pub trainer_username: Option<String>,
    pub training_type: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for TrainingFilter {
    fn default() -> Self {
        Self {
            trainee_id: None,
            trainer_id: None,
            from: None,
            to: None,
            trainee_username: None,
            trainer_username: None,
            training_type: None,
            skip: 0,
            limit: usize::MAX,
        }
    }
}

impl TrainingFilter {
    fn matches(&self, training: &TrainingDBResponse) -> bool {
        self.trainee_id.is_none_or(|id| training.trainee_id == id)
            && self.trainer_id.is_none_or(|id| training.trainer_id == id)
            && self.from.is_none_or(|from| training.date >= from)
            && self.to.is_none_or(|to| training.date <= to)
            && self
                .trainee_username
                .as_deref()
                .is_none_or(|username| training.trainee.username == username)
            && self
                .trainer_username
                .as_deref()
                .is_none_or(|username| training.trainer.username == username)
            && self
                .training_type
                .as_deref()
                .is_none_or(|name| training.training_type.name == name)
    }
}

pub struct Trainings<'c> {
    db: &'c mut Tables,
}

impl<'c> Trainings<'c> {
    pub fn new(db: &'c mut Tables) -> Self {
        Self { db }
    }

    fn resolve(&self, training: &Training) -> Result<TrainingDBResponse> {
        let trainee = self
            .db
            .trainees
            .find_by_id(training.trainee_id)
            .and_then(|t| self.db.users.find_by_id(t.user_id))
            .cloned()
            .ok_or_else(|| anyhow!("training {} references missing trainee {}", training.id, training.trainee_id))?;
        let trainer = self
            .db
            .trainers
            .find_by_id(training.trainer_id)
            .and_then(|t| self.db.users.find_by_id(t.user_id))
            .cloned()
            .ok_or_else(|| anyhow!("training {} references missing trainer {}", training.id, training.trainer_id))?;
        let training_type = self
            .db
            .training_types
            .find_by_id(training.training_type_id)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "training {} references missing training type {}",
                    training.id,
                    training.training_type_id
                )
            })?;

        Ok(TrainingDBResponse {
            id: training.id,
            name: training.name.clone(),
            date: training.date,
            duration: training.duration,
            trainee_id: training.trainee_id,
            trainer_id: training.trainer_id,
            trainee,
            trainer,
            training_type,
        })
    }

    /// Delete every training of a trainee, returning the removed trainings.
    ///
    /// Participants must still exist, so call this before deleting the profile.
    #[instrument(skip(self), err)]
    pub fn delete_by_trainee(&mut self, trainee_id: TraineeId) -> Result<Vec<TrainingDBResponse>> {
        let removed = self.db.trainings.delete_where(|t| t.trainee_id == trainee_id);
        removed.iter().map(|training| self.resolve(training)).collect()
    }

    /// Delete every training of a trainer, returning the removed trainings.
    ///
    /// Participants must still exist, so call this before deleting the profile.
    #[instrument(skip(self), err)]
    pub fn delete_by_trainer(&mut self, trainer_id: TrainerId) -> Result<Vec<TrainingDBResponse>> {
        let removed = self.db.trainings.delete_where(|t| t.trainer_id == trainer_id);
        removed.iter().map(|training| self.resolve(training)).collect()
    }
}

impl<'c> Repository for Trainings<'c> {
    type CreateRequest = TrainingCreateDBRequest;
    type UpdateRequest = TrainingUpdateDBRequest;
    type Response = TrainingDBResponse;
    type Id = TrainingId;
    type Filter = TrainingFilter;

    #[instrument(skip(self, request), fields(trainee_id = request.trainee_id, trainer_id = request.trainer_id), err)]
    fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let missing = if self.db.trainees.find_by_id(request.trainee_id).is_none() {
            Some(format!("trainee {} does not exist", request.trainee_id))
        } else if self.db.trainers.find_by_id(request.trainer_id).is_none() {
            Some(format!("trainer {} does not exist", request.trainer_id))
        } else if self.db.training_types.find_by_id(request.training_type_id).is_none() {
            Some(format!("training type {} does not exist", request.training_type_id))
        } else {
            None
        };
        if let Some(message) = missing {
            return Err(DbError::ForeignKeyViolation {
                table: "trainings",
                message,
            });
        }

        let training = self.db.trainings.insert(request.clone());
        self.resolve(&training)
    }

    #[instrument(skip(self), err)]
    fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        match self.db.trainings.find_by_id(id) {
            Some(training) => self.resolve(training).map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut matching = Vec::new();
        for training in self.db.trainings.find_all() {
            let training = self.resolve(training)?;
            if filter.matches(&training) {
                matching.push(training);
            }
        }
        Ok(matching.into_iter().skip(filter.skip).take(filter.limit).collect())
    }

    #[instrument(skip(self), err)]
    fn delete(&mut self, id: Self::Id) -> Result<bool> {
        Ok(self.db.trainings.delete_by_id(id).is_some())
    }

    #[instrument(skip(self, request), err)]
    fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let mut training = self.db.trainings.find_by_id(id).cloned().ok_or(DbError::NotFound)?;

        if let Some(name) = &request.name {
            training.name = name.clone();
        }
        if let Some(date) = request.date {
            training.date = date;
        }
        if let Some(duration) = request.duration {
            training.duration = duration;
        }

        let training = self.db.trainings.update(training)?;
        self.resolve(&training)
    }
}
