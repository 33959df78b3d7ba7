//! Record models for trainees.

use chrono::NaiveDate;

use crate::db::models::users::UserDBResponse;
use crate::db::store::Record;
use crate::types::{TraineeId, UserId};

/// Request for creating a new trainee profile for an existing user
#[derive(Debug, Clone)]
pub struct TraineeCreateDBRequest {
    pub user_id: UserId,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Request for updating a trainee profile. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TraineeUpdateDBRequest {
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Stored trainee row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainee {
    pub id: TraineeId,
    pub user_id: UserId,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl Record for Trainee {
    type CreateRequest = TraineeCreateDBRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_create(id: i64, request: Self::CreateRequest) -> Self {
        Self {
            id,
            user_id: request.user_id,
            date_of_birth: request.date_of_birth,
            address: request.address,
        }
    }
}

/// Trainee joined with its user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraineeDBResponse {
    pub id: TraineeId,
    pub user: UserDBResponse,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<(UserDBResponse, Trainee)> for TraineeDBResponse {
    fn from((user, trainee): (UserDBResponse, Trainee)) -> Self {
        Self {
            id: trainee.id,
            user,
            date_of_birth: trainee.date_of_birth,
            address: trainee.address,
        }
    }
}
