//! Trainer workflows.

use tracing::{info, instrument};

use crate::api::models::trainers::TrainerResponse;
use crate::config::PasswordConfig;
use crate::db::{
    handlers::{ListFilter, Repository, Trainers, TrainingTypes, Trainings, Users},
    models::{
        trainers::{TrainerCreateDBRequest, TrainerDBResponse, TrainerUpdateDBRequest},
        training_types::TrainingTypeDBResponse,
        trainings::TrainingDBResponse,
    },
    store::{Database, Tables},
};
use crate::errors::{Error, Result};
use crate::services::{
    Attributes, FIRST_NAME, LAST_NAME, Registered, SPECIALIZATION, attribute, blocking, check_update_attributes, require_attributes,
    trainings::{Propagation, report_removed},
    users,
};
use crate::workload::Workload;

const UPDATABLE: [&str; 3] = [FIRST_NAME, LAST_NAME, SPECIALIZATION];

#[derive(Clone)]
pub struct TrainerService {
    db: Database,
    passwords: PasswordConfig,
    workload: Workload,
}

fn not_found(username: &str) -> Error {
    Error::NotFound {
        resource: "Trainer".to_string(),
        id: username.to_string(),
    }
}

/// Resolve a specialization by training type name.
fn specialization(tables: &mut Tables, name: &str) -> Result<TrainingTypeDBResponse> {
    TrainingTypes::new(tables).get_by_name(name)?.ok_or_else(|| Error::NotFound {
        resource: "Training type".to_string(),
        id: name.to_string(),
    })
}

impl TrainerService {
    pub fn new(db: Database, passwords: PasswordConfig, workload: Workload) -> Self {
        Self { db, passwords, workload }
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<TrainerDBResponse> {
        let trainer = {
            let mut tx = self.db.read();
            Trainers::new(&mut tx).get_by_username(username)?
        }
        .ok_or_else(|| not_found(username))?;
        users::check_password(&trainer.user, password)?;
        Ok(trainer)
    }

    /// Register a trainer from `firstName`, `lastName` and `specialization` (a training type name).
    #[instrument(skip(self, attributes), err)]
    pub fn register(&self, attributes: &Attributes) -> Result<Registered<TrainerResponse>> {
        require_attributes(attributes, &[FIRST_NAME, LAST_NAME, SPECIALIZATION])?;
        let first_name = attribute(attributes, FIRST_NAME).unwrap_or_default();
        let last_name = attribute(attributes, LAST_NAME).unwrap_or_default();
        let specialization_name = attribute(attributes, SPECIALIZATION).unwrap_or_default();

        let (password, password_hash) = users::new_password(&self.passwords)?;

        let mut tx = self.db.begin();
        let specialization = specialization(&mut tx, specialization_name)?;
        let user = users::create_user(&mut tx, first_name, last_name, password_hash)?;
        let trainer = Trainers::new(&mut tx).create(&TrainerCreateDBRequest {
            user_id: user.id,
            specialization_id: specialization.id,
        })?;
        tx.commit();

        info!(username = %trainer.user.username, trainer_id = trainer.id, "Registered trainer");
        Ok(Registered {
            profile: trainer.into(),
            password,
        })
    }

    #[instrument(skip(self), err)]
    pub fn get_by_username(&self, username: &str) -> Result<TrainerResponse> {
        let mut tx = self.db.read();
        let trainer = Trainers::new(&mut tx).get_by_username(username)?.ok_or_else(|| not_found(username))?;
        Ok(trainer.into())
    }

    /// A page of trainers and the total number of trainers.
    #[instrument(skip(self), err)]
    pub fn list(&self, skip: usize, limit: usize) -> Result<(Vec<TrainerResponse>, usize)> {
        let mut tx = self.db.read();
        let total = tx.trainers.len();
        let trainers = Trainers::new(&mut tx).list(&ListFilter::new(skip, limit))?;
        Ok((trainers.into_iter().map(Into::into).collect(), total))
    }

    /// Check a trainer's credentials.
    #[instrument(skip(self, password), err)]
    pub fn login(&self, username: &str, password: &str) -> Result<TrainerResponse> {
        Ok(self.authenticate(username, password)?.into())
    }

    /// Apply the supplied keys of `firstName`, `lastName`, `specialization`.
    #[instrument(skip(self, password, attributes), err)]
    pub fn update(&self, username: &str, password: &str, attributes: &Attributes) -> Result<TrainerResponse> {
        let trainer = self.authenticate(username, password)?;
        check_update_attributes(attributes, &UPDATABLE, &UPDATABLE)?;
        let names = users::name_update(attributes);

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainer.user)?;
        let specialization_id = match attribute(attributes, SPECIALIZATION) {
            Some(name) => Some(specialization(&mut tx, name)?.id),
            None => None,
        };
        if !names.is_empty() {
            Users::new(&mut tx).update(trainer.user.id, &names)?;
        }
        let updated = Trainers::new(&mut tx).update(trainer.id, &TrainerUpdateDBRequest { specialization_id })?;
        tx.commit();

        info!(%username, "Updated trainer");
        Ok(updated.into())
    }

    #[instrument(skip(self, old_password, new_password), err)]
    pub fn change_password(&self, username: &str, old_password: &str, new_password: &str) -> Result<()> {
        let trainer = self.authenticate(username, old_password)?;
        users::change_password(&self.db, &trainer.user, &self.passwords, new_password)?;

        info!(%username, "Changed trainer password");
        Ok(())
    }

    #[instrument(skip(self, password), err)]
    pub fn set_active(&self, username: &str, password: &str, is_active: bool) -> Result<TrainerResponse> {
        let trainer = self.authenticate(username, password)?;

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainer.user)?;
        users::set_active(&mut tx, trainer.user.id, is_active)?;
        let updated = Trainers::new(&mut tx).get_by_id(trainer.id)?.ok_or_else(|| not_found(username))?;
        tx.commit();

        info!(%username, is_active, "Changed trainer activation");
        Ok(updated.into())
    }

    fn remove(&self, username: &str, password: &str) -> Result<Vec<TrainingDBResponse>> {
        let trainer = self.authenticate(username, password)?;

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainer.user)?;
        let trainings = Trainings::new(&mut tx).delete_by_trainer(trainer.id)?;
        Trainers::new(&mut tx).delete(trainer.id)?;
        Users::new(&mut tx).delete(trainer.user.id)?;
        tx.commit();

        info!(%username, trainings = trainings.len(), "Deleted trainer");
        Ok(trainings)
    }

    /// Delete the trainer, its trainings and its user. Each removed training is reported to the
    /// workload service.
    #[instrument(skip(self, password, propagation), err)]
    pub async fn delete(&self, username: &str, password: &str, propagation: &Propagation) -> Result<()> {
        let service = self.clone();
        let (username, password) = (username.to_string(), password.to_string());
        let removed = blocking(move || service.remove(&username, &password)).await?;

        report_removed(&self.workload, &removed, propagation).await;
        Ok(())
    }
}
