//! API request/response models for training types.

use crate::db::models::training_types::TrainingTypeDBResponse;
use crate::types::TrainingTypeId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrainingTypeCreate {
    #[schema(example = "Yoga")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrainingTypeResponse {
    pub id: TrainingTypeId,
    #[schema(example = "Yoga")]
    pub name: String,
}

impl From<TrainingTypeDBResponse> for TrainingTypeResponse {
    fn from(db: TrainingTypeDBResponse) -> Self {
        Self { id: db.id, name: db.name }
    }
}
