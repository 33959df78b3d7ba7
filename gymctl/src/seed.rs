//! Startup seeding from a JSON data file.
//!
//! The file has three optional arrays:
//!
//! ```json
//! {
//!   "trainingTypes": [{ "name": "Yoga" }],
//!   "trainees": [{ "firstName": "Ann", "lastName": "Lee", "dateOfBirth": "01-02-1990", "address": "1 Main St" }],
//!   "trainers": [{ "firstName": "Tom", "lastName": "Hardy", "specialization": "Yoga" }]
//! }
//! ```
//!
//! Training types are loaded first so trainer specializations resolve. Every row goes through
//! the regular services, so usernames and passwords are generated exactly as for API
//! registrations. In [`SeedMode::Strict`] the first failure aborts; in [`SeedMode::Lenient`]
//! failures are logged and skipped.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::{SeedConfig, SeedMode};
use crate::errors::Error;
use crate::services::{
    ADDRESS, Attributes, DATE_OF_BIRTH, FIRST_NAME, LAST_NAME, SPECIALIZATION, trainees::TraineeService, trainers::TrainerService,
    training_types::TrainingTypeService,
};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to seed {kind} #{index}: {source}")]
    Row {
        kind: &'static str,
        index: usize,
        #[source]
        source: Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SeedData {
    training_types: Vec<SeedTrainingType>,
    trainees: Vec<SeedTrainee>,
    trainers: Vec<SeedTrainer>,
}

#[derive(Debug, Deserialize)]
struct SeedTrainingType {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedTrainee {
    first_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedTrainer {
    first_name: String,
    last_name: String,
    specialization: Specialization,
}

/// A specialization given either as a bare name or as a training type object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Specialization {
    Name(String),
    Object { name: String },
}

impl Specialization {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

impl SeedTrainee {
    fn attributes(&self) -> Attributes {
        let mut attributes = Attributes::from([
            (FIRST_NAME.to_string(), self.first_name.clone()),
            (LAST_NAME.to_string(), self.last_name.clone()),
        ]);
        if let Some(date_of_birth) = &self.date_of_birth {
            attributes.insert(DATE_OF_BIRTH.to_string(), date_of_birth.clone());
        }
        if let Some(address) = &self.address {
            attributes.insert(ADDRESS.to_string(), address.clone());
        }
        attributes
    }
}

impl SeedTrainer {
    fn attributes(&self) -> Attributes {
        Attributes::from([
            (FIRST_NAME.to_string(), self.first_name.clone()),
            (LAST_NAME.to_string(), self.last_name.clone()),
            (SPECIALIZATION.to_string(), self.specialization.name().to_string()),
        ])
    }
}

/// Counts of seeded and skipped rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub training_types: usize,
    pub trainees: usize,
    pub trainers: usize,
    pub skipped: usize,
}

/// Services the seeder writes through.
pub struct Seeder<'a> {
    pub training_types: &'a TrainingTypeService,
    pub trainees: &'a TraineeService,
    pub trainers: &'a TrainerService,
}

impl Seeder<'_> {
    /// Seed according to `config`. Does nothing when seeding is disabled.
    #[instrument(skip(self, config), fields(path = %config.path.display(), mode = ?config.mode))]
    pub fn run(&self, config: &SeedConfig) -> Result<SeedSummary, SeedError> {
        if !config.enabled {
            debug!("Seeding disabled");
            return Ok(SeedSummary::default());
        }

        let data = match load(&config.path) {
            Ok(data) => data,
            Err(e) if config.mode == SeedMode::Lenient => {
                warn!(error = %e, "Skipping seed data");
                return Ok(SeedSummary::default());
            }
            Err(e) => return Err(e),
        };

        let summary = self.apply(&data, config.mode)?;
        info!(
            training_types = summary.training_types,
            trainees = summary.trainees,
            trainers = summary.trainers,
            skipped = summary.skipped,
            "Seed data loaded"
        );
        Ok(summary)
    }

    fn apply(&self, data: &SeedData, mode: SeedMode) -> Result<SeedSummary, SeedError> {
        let mut summary = SeedSummary::default();

        // Lenient mode logs the failure and moves on
        let mut check = |kind: &'static str, index: usize, result: Result<(), Error>| -> Result<bool, SeedError> {
            match result {
                Ok(()) => Ok(true),
                Err(source) if mode == SeedMode::Lenient => {
                    warn!(kind, index, error = %source, "Skipping seed row");
                    summary.skipped += 1;
                    Ok(false)
                }
                Err(source) => Err(SeedError::Row { kind, index, source }),
            }
        };

        let mut training_types = 0;
        for (index, training_type) in data.training_types.iter().enumerate() {
            let result = self.training_types.register(&training_type.name).map(|created| {
                debug!(id = created.id, name = %created.name, "Seeded training type");
            });
            if check("training type", index, result)? {
                training_types += 1;
            }
        }

        let mut trainees = 0;
        for (index, trainee) in data.trainees.iter().enumerate() {
            let result = self.trainees.register(&trainee.attributes()).map(|registered| {
                debug!(username = %registered.profile.username, password = %registered.password, "Seeded trainee");
            });
            if check("trainee", index, result)? {
                trainees += 1;
            }
        }

        let mut trainers = 0;
        for (index, trainer) in data.trainers.iter().enumerate() {
            let result = self.trainers.register(&trainer.attributes()).map(|registered| {
                debug!(username = %registered.profile.username, password = %registered.password, "Seeded trainer");
            });
            if check("trainer", index, result)? {
                trainers += 1;
            }
        }

        summary.training_types = training_types;
        summary.trainees = trainees;
        summary.trainers = trainers;
        Ok(summary)
    }
}

fn load(path: &Path) -> Result<SeedData, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
