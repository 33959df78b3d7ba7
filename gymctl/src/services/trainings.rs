//! Training sessions.
//!
//! Adding and deleting a training commits the store transaction first and then reports the
//! event to the workload service. The notification is best effort, see [`crate::workload`].

use tracing::{info, instrument};

use crate::api::models::trainings::{TrainingCreate, TrainingListQuery, TrainingResponse};
use crate::db::{
    handlers::{Repository, Trainees, Trainers, TrainingFilter, TrainingTypes, Trainings},
    models::{
        trainees::TraineeDBResponse,
        trainings::{TrainingCreateDBRequest, TrainingDBResponse},
        users::UserDBResponse,
    },
    store::{Database, Tables},
};
use crate::errors::{Error, Result};
use crate::services::{blocking, users};
use crate::types::TrainingId;
use crate::workload::{ActionType, TrainingRequest, Workload};

/// Request-scoped values forwarded to the workload service.
#[derive(Debug, Clone, Default)]
pub struct Propagation {
    pub transaction_id: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
pub struct TrainingService {
    db: Database,
    workload: Workload,
}

fn workload_event(training: &TrainingDBResponse, action_type: ActionType) -> TrainingRequest {
    let trainer: &UserDBResponse = &training.trainer;
    TrainingRequest {
        trainer_username: trainer.username.clone(),
        trainer_first_name: trainer.first_name.clone(),
        trainer_last_name: trainer.last_name.clone(),
        is_active: trainer.is_active,
        training_date: training.date,
        training_duration: training.duration,
        action_type,
    }
}

fn profile_not_found(resource: &str, username: &str) -> Error {
    Error::NotFound {
        resource: resource.to_string(),
        id: username.to_string(),
    }
}

/// Report trainings removed together with a trainee or trainer.
pub(crate) async fn report_removed(workload: &Workload, trainings: &[TrainingDBResponse], propagation: &Propagation) {
    for training in trainings {
        workload
            .action_training(
                &workload_event(training, ActionType::Delete),
                &propagation.transaction_id,
                propagation.authorization.as_deref(),
            )
            .await;
    }
}

/// Add a training for a caller whose password was already checked.
fn add_training(tables: &mut Tables, caller: &UserDBResponse, request: &TrainingCreate) -> Result<TrainingDBResponse> {
    users::ensure_unchanged(tables, caller)?;
    if caller.username != request.trainee_username && caller.username != request.trainer_username {
        return Err(Error::FailedAuthentication {
            username: caller.username.clone(),
        });
    }

    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::MissingAttributes {
            attributes: vec!["name".to_string()],
        });
    }
    if request.duration <= 0 {
        return Err(Error::BadRequest {
            message: "Training duration must be positive".to_string(),
        });
    }

    let trainee = Trainees::new(tables)
        .get_by_username(&request.trainee_username)?
        .ok_or_else(|| profile_not_found("Trainee", &request.trainee_username))?;
    let trainer = Trainers::new(tables)
        .get_by_username(&request.trainer_username)?
        .ok_or_else(|| profile_not_found("Trainer", &request.trainer_username))?;

    let training_type_id = match request.training_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(type_name) => {
            TrainingTypes::new(tables)
                .get_by_name(type_name)?
                .ok_or_else(|| Error::NotFound {
                    resource: "Training type".to_string(),
                    id: type_name.to_string(),
                })?
                .id
        }
        None => trainer.specialization.id,
    };

    Ok(Trainings::new(tables).create(&TrainingCreateDBRequest {
        trainee_id: trainee.id,
        trainer_id: trainer.id,
        name: name.to_string(),
        date: request.date,
        training_type_id,
        duration: request.duration,
    })?)
}

/// Fetch a trainee by username and check the password with the store unlocked.
fn authenticate_trainee(db: &Database, username: &str, password: &str) -> Result<TraineeDBResponse> {
    let trainee = {
        let mut tx = db.read();
        Trainees::new(&mut tx).get_by_username(username)?
    }
    .ok_or_else(|| profile_not_found("Trainee", username))?;
    users::check_password(&trainee.user, password)?;
    Ok(trainee)
}

/// Delete a training owned by an already authenticated trainee.
fn delete_training(tables: &mut Tables, trainee: &TraineeDBResponse, training_id: TrainingId) -> Result<TrainingDBResponse> {
    users::ensure_unchanged(tables, &trainee.user)?;

    let not_found = || Error::NotFound {
        resource: "Training".to_string(),
        id: training_id.to_string(),
    };
    let mut trainings = Trainings::new(tables);
    let training = trainings.get_by_id(training_id)?.ok_or_else(not_found)?;
    // Another trainee's training is reported as missing
    if training.trainee_id != trainee.id {
        return Err(not_found());
    }
    trainings.delete(training_id)?;
    Ok(training)
}

impl TrainingService {
    pub fn new(db: Database, workload: Workload) -> Self {
        Self { db, workload }
    }

    /// Add a training. The caller must be the training's trainee or trainer.
    ///
    /// `trainingType` defaults to the trainer's specialization.
    #[instrument(skip(self, password, request, propagation), fields(trainee = %request.trainee_username, trainer = %request.trainer_username), err)]
    pub async fn add(&self, username: &str, password: &str, request: TrainingCreate, propagation: &Propagation) -> Result<TrainingResponse> {
        let db = self.db.clone();
        let (username, password) = (username.to_string(), password.to_string());
        let training = blocking(move || {
            let caller = users::authenticate(&db, &username, &password)?;
            let mut tx = db.begin();
            let training = add_training(&mut tx, &caller, &request)?;
            tx.commit();
            Ok(training)
        })
        .await?;

        info!(training_id = training.id, "Added training");
        self.workload
            .action_training(
                &workload_event(&training, ActionType::Add),
                &propagation.transaction_id,
                propagation.authorization.as_deref(),
            )
            .await;
        Ok(training.into())
    }

    /// Delete one of the authenticated trainee's trainings.
    #[instrument(skip(self, password, propagation), err)]
    pub async fn delete(&self, username: &str, password: &str, training_id: TrainingId, propagation: &Propagation) -> Result<()> {
        let db = self.db.clone();
        let (username, password) = (username.to_string(), password.to_string());
        let training = blocking(move || {
            let trainee = authenticate_trainee(&db, &username, &password)?;
            let mut tx = db.begin();
            let training = delete_training(&mut tx, &trainee, training_id)?;
            tx.commit();
            Ok(training)
        })
        .await?;

        info!(training_id, "Deleted training");
        self.workload
            .action_training(
                &workload_event(&training, ActionType::Delete),
                &propagation.transaction_id,
                propagation.authorization.as_deref(),
            )
            .await;
        Ok(())
    }

    /// A trainee's trainings, filtered by date range, trainer username and training type.
    #[instrument(skip(self), err)]
    pub fn list_for_trainee(&self, username: &str, query: &TrainingListQuery) -> Result<Vec<TrainingResponse>> {
        let mut tx = self.db.read();
        let trainee = Trainees::new(&mut tx)
            .get_by_username(username)?
            .ok_or_else(|| profile_not_found("Trainee", username))?;

        let trainings = Trainings::new(&mut tx).list(&TrainingFilter {
            trainee_id: Some(trainee.id),
            from: query.from,
            to: query.to,
            trainer_username: query.trainer.clone(),
            training_type: query.training_type.clone(),
            ..Default::default()
        })?;
        Ok(trainings.into_iter().map(Into::into).collect())
    }

    /// A trainer's trainings, filtered by date range, trainee username and training type.
    #[instrument(skip(self), err)]
    pub fn list_for_trainer(&self, username: &str, query: &TrainingListQuery) -> Result<Vec<TrainingResponse>> {
        let mut tx = self.db.read();
        let trainer = Trainers::new(&mut tx)
            .get_by_username(username)?
            .ok_or_else(|| profile_not_found("Trainer", username))?;

        let trainings = Trainings::new(&mut tx).list(&TrainingFilter {
            trainer_id: Some(trainer.id),
            from: query.from,
            to: query.to,
            trainee_username: query.trainee.clone(),
            training_type: query.training_type.clone(),
            ..Default::default()
        })?;
        Ok(trainings.into_iter().map(Into::into).collect())
    }
}
