//! Domain services.
//!
//! Services own the workflows behind every operation: they validate attribute maps, check
//! credentials, and run each operation inside one store transaction. The profile services
//! ([`trainees::TraineeService`], [`trainers::TrainerService`]) and
//! [`training_types::TrainingTypeService`] are synchronous, because password hashing is CPU
//! bound and the store lock must never be held across an `.await`. HTTP handlers call them
//! through [`blocking`]. [`trainings::TrainingService`] is async since it notifies the workload
//! service after its transaction commits.

use std::collections::HashMap;

use crate::errors::{Error, Result};

pub mod auth;
pub mod dates;
pub mod trainees;
pub mod trainers;
pub mod training_types;
pub mod trainings;
pub mod users;

/// Attribute map accepted by registration and update operations.
pub type Attributes = HashMap<String, String>;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const ADDRESS: &str = "address";
pub const SPECIALIZATION: &str = "specialization";

/// A newly registered profile together with its one-time plaintext password.
#[derive(Debug, Clone)]
pub struct Registered<T> {
    pub profile: T,
    pub password: String,
}

/// Fail with `MissingAttributes` naming every required key that is absent or blank.
pub(crate) fn require_attributes(attributes: &Attributes, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|key| attributes.get(**key).is_none_or(|value| value.trim().is_empty()))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingAttributes { attributes: missing })
    }
}

/// Check an update map: it must contain at least one recognized key, and the recognized keys in
/// `non_blank` must not be blank.
pub(crate) fn check_update_attributes(attributes: &Attributes, recognized: &[&str], non_blank: &[&str]) -> Result<()> {
    if !attributes.keys().any(|key| recognized.contains(&key.as_str())) {
        return Err(Error::MissingAttributes {
            attributes: recognized.iter().map(|key| key.to_string()).collect(),
        });
    }

    let blank: Vec<String> = non_blank
        .iter()
        .filter(|key| attributes.get(**key).is_some_and(|value| value.trim().is_empty()))
        .map(|key| key.to_string())
        .collect();
    if blank.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingAttributes { attributes: blank })
    }
}

/// Trimmed value of an attribute, if present.
pub(crate) fn attribute<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).map(|value| value.trim())
}

/// Run synchronous service work on the blocking thread pool.
pub async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| Error::Internal {
        operation: format!("join blocking task: {e}"),
    })?
}
