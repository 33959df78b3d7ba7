//! API request/response models for trainees.

use std::collections::HashMap;

use crate::db::models::trainees::TraineeDBResponse;
use crate::types::dmy_date_option;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attributes accepted when registering a trainee.
///
/// Sent as a flat JSON object of strings, e.g.
/// `{"firstName": "John", "lastName": "Doe", "dateOfBirth": "17-05-1990"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(example = json!({"firstName": "John", "lastName": "Doe", "dateOfBirth": "17-05-1990", "address": "1 Main St"}))]
pub struct TraineeAttributes(pub HashMap<String, String>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraineeResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "dmy_date_option", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "17-05-1990")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub is_active: bool,
}

impl From<TraineeDBResponse> for TraineeResponse {
    fn from(db: TraineeDBResponse) -> Self {
        Self {
            username: db.user.username,
            first_name: db.user.first_name,
            last_name: db.user.last_name,
            date_of_birth: db.date_of_birth,
            address: db.address,
            is_active: db.user.is_active,
        }
    }
}
