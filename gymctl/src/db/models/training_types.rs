//! Record models for training types.

use crate::db::store::Record;
use crate::types::TrainingTypeId;

/// Request for creating a new training type
#[derive(Debug, Clone)]
pub struct TrainingTypeCreateDBRequest {
    pub name: String,
}

/// Request for renaming a training type
#[derive(Debug, Clone, Default)]
pub struct TrainingTypeUpdateDBRequest {
    pub name: Option<String>,
}

/// A stored training type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingTypeDBResponse {
    pub id: TrainingTypeId,
    pub name: String,
}

impl Record for TrainingTypeDBResponse {
    type CreateRequest = TrainingTypeCreateDBRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_create(id: i64, request: Self::CreateRequest) -> Self {
        Self { id, name: request.name }
    }
}
