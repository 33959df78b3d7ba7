//! API request/response models for training sessions.

use super::training_types::TrainingTypeResponse;
use crate::db::models::trainings::TrainingDBResponse;
use crate::types::{TrainingId, dmy_date, dmy_date_option};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request to add a training.
///
/// `trainingType` defaults to the trainer's specialization when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingCreate {
    pub trainee_username: String,
    pub trainer_username: String,
    pub name: String,
    #[serde(with = "dmy_date")]
    #[schema(value_type = String, example = "12-12-2022")]
    pub date: NaiveDate,
    /// Duration in minutes
    pub duration: i32,
    #[serde(default)]
    pub training_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub id: TrainingId,
    pub name: String,
    #[serde(with = "dmy_date")]
    #[schema(value_type = String, example = "12-12-2022")]
    pub date: NaiveDate,
    pub duration: i32,
    pub trainee_username: String,
    pub trainer_username: String,
    pub training_type: TrainingTypeResponse,
}

impl From<TrainingDBResponse> for TrainingResponse {
    fn from(db: TrainingDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            date: db.date,
            duration: db.duration,
            trainee_username: db.trainee.username,
            trainer_username: db.trainer.username,
            training_type: db.training_type.into(),
        }
    }
}

/// Filters for listing a trainee's or trainer's trainings
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TrainingListQuery {
    /// Earliest training date, inclusive (dd-MM-yyyy)
    #[serde(with = "dmy_date_option", default)]
    #[param(value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    /// Latest training date, inclusive (dd-MM-yyyy)
    #[serde(with = "dmy_date_option", default)]
    #[param(value_type = Option<String>)]
    pub to: Option<NaiveDate>,
    /// Only trainings with this trainer (when listing a trainee's trainings)
    pub trainer: Option<String>,
    /// Only trainings with this trainee (when listing a trainer's trainings)
    pub trainee: Option<String>,
    /// Only trainings of this training type name
    pub training_type: Option<String>,
}
