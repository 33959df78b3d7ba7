//! API request/response models for trainers.

use std::collections::HashMap;

use super::training_types::TrainingTypeResponse;
use crate::db::models::trainers::TrainerDBResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attributes accepted when registering a trainer. `specialization` is a training type name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(example = json!({"firstName": "Mike", "lastName": "Tyson", "specialization": "Boxing"}))]
pub struct TrainerAttributes(pub HashMap<String, String>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainerResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: TrainingTypeResponse,
    pub is_active: bool,
}

impl From<TrainerDBResponse> for TrainerResponse {
    fn from(db: TrainerDBResponse) -> Self {
        Self {
            username: db.user.username,
            first_name: db.user.first_name,
            last_name: db.user.last_name,
            specialization: db.specialization.into(),
            is_active: db.user.is_active,
        }
    }
}
