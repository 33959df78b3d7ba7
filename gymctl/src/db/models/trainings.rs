//! Record models for training sessions.

use chrono::NaiveDate;

use crate::db::models::{training_types::TrainingTypeDBResponse, users::UserDBResponse};
use crate::db::store::Record;
use crate::types::{TraineeId, TrainerId, TrainingId, TrainingTypeId};

/// Request for creating a new training
#[derive(Debug, Clone)]
pub struct TrainingCreateDBRequest {
    pub trainee_id: TraineeId,
    pub trainer_id: TrainerId,
    pub name: String,
    pub date: NaiveDate,
    pub training_type_id: TrainingTypeId,
    /// Duration in minutes
    pub duration: i32,
}

/// Request for updating a training. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TrainingUpdateDBRequest {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub duration: Option<i32>,
}

/// Stored training row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    pub id: TrainingId,
    pub trainee_id: TraineeId,
    pub trainer_id: TrainerId,
    pub name: String,
    pub date: NaiveDate,
    pub training_type_id: TrainingTypeId,
    pub duration: i32,
}

impl Record for Training {
    type CreateRequest = TrainingCreateDBRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_create(id: i64, request: Self::CreateRequest) -> Self {
        Self {
            id,
            trainee_id: request.trainee_id,
            trainer_id: request.trainer_id,
            name: request.name,
            date: request.date,
            training_type_id: request.training_type_id,
            duration: request.duration,
        }
    }
}

/// Training joined with both participants and its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingDBResponse {
    pub id: TrainingId,
    pub name: String,
    pub date: NaiveDate,
    pub duration: i32,
    pub trainee_id: TraineeId,
    pub trainer_id: TrainerId,
    pub trainee: UserDBResponse,
    pub trainer: UserDBResponse,
    pub training_type: TrainingTypeDBResponse,
}
