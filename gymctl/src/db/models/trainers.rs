//! Record models for trainers.

use crate::db::models::{training_types::TrainingTypeDBResponse, users::UserDBResponse};
use crate::db::store::Record;
use crate::types::{TrainerId, TrainingTypeId, UserId};

/// Request for creating a new trainer profile for an existing user
#[derive(Debug, Clone)]
pub struct TrainerCreateDBRequest {
    pub user_id: UserId,
    pub specialization_id: TrainingTypeId,
}

/// Request for updating a trainer profile
#[derive(Debug, Clone, Default)]
pub struct TrainerUpdateDBRequest {
    pub specialization_id: Option<TrainingTypeId>,
}

/// Stored trainer row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: TrainerId,
    pub user_id: UserId,
    pub specialization_id: TrainingTypeId,
}

impl Record for Trainer {
    type CreateRequest = TrainerCreateDBRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_create(id: i64, request: Self::CreateRequest) -> Self {
        Self {
            id,
            user_id: request.user_id,
            specialization_id: request.specialization_id,
        }
    }
}

/// Trainer joined with its user and specialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerDBResponse {
    pub id: TrainerId,
    pub user: UserDBResponse,
    pub specialization: TrainingTypeDBResponse,
}
