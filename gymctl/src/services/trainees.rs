//! Trainee workflows.

use tracing::{info, instrument};

use crate::api::models::trainees::TraineeResponse;
use crate::config::PasswordConfig;
use crate::db::{
    handlers::{ListFilter, Repository, Trainees, Trainings, Users},
    models::{
        trainees::{TraineeCreateDBRequest, TraineeDBResponse, TraineeUpdateDBRequest},
        trainings::TrainingDBResponse,
    },
    store::Database,
};
use crate::errors::{Error, Result};
use crate::services::{
    ADDRESS, Attributes, DATE_OF_BIRTH, FIRST_NAME, LAST_NAME, Registered, attribute, blocking, check_update_attributes,
    dates::validate_date, require_attributes,
    trainings::{Propagation, report_removed},
    users,
};
use crate::workload::Workload;

const UPDATABLE: [&str; 4] = [FIRST_NAME, LAST_NAME, DATE_OF_BIRTH, ADDRESS];
const NON_BLANK: [&str; 2] = [FIRST_NAME, LAST_NAME];

#[derive(Clone)]
pub struct TraineeService {
    db: Database,
    passwords: PasswordConfig,
    workload: Workload,
}

fn not_found(username: &str) -> Error {
    Error::NotFound {
        resource: "Trainee".to_string(),
        id: username.to_string(),
    }
}

fn parse_profile_fields(attributes: &Attributes) -> Result<TraineeUpdateDBRequest> {
    let date_of_birth = match attribute(attributes, DATE_OF_BIRTH) {
        Some(raw) if !raw.is_empty() => Some(validate_date(raw)?),
        _ => None,
    };
    Ok(TraineeUpdateDBRequest {
        date_of_birth,
        address: attribute(attributes, ADDRESS).map(str::to_string),
    })
}

impl TraineeService {
    pub fn new(db: Database, passwords: PasswordConfig, workload: Workload) -> Self {
        Self { db, passwords, workload }
    }

    /// Fetch a trainee by username and check the password with the store unlocked.
    fn authenticate(&self, username: &str, password: &str) -> Result<TraineeDBResponse> {
        let trainee = {
            let mut tx = self.db.read();
            Trainees::new(&mut tx).get_by_username(username)?
        }
        .ok_or_else(|| not_found(username))?;
        users::check_password(&trainee.user, password)?;
        Ok(trainee)
    }

    /// Register a trainee from `firstName`, `lastName` and optional `dateOfBirth`, `address`.
    #[instrument(skip(self, attributes), err)]
    pub fn register(&self, attributes: &Attributes) -> Result<Registered<TraineeResponse>> {
        require_attributes(attributes, &[FIRST_NAME, LAST_NAME])?;
        let profile = parse_profile_fields(attributes)?;
        let first_name = attribute(attributes, FIRST_NAME).unwrap_or_default();
        let last_name = attribute(attributes, LAST_NAME).unwrap_or_default();

        let (password, password_hash) = users::new_password(&self.passwords)?;

        let mut tx = self.db.begin();
        let user = users::create_user(&mut tx, first_name, last_name, password_hash)?;
        let trainee = Trainees::new(&mut tx).create(&TraineeCreateDBRequest {
            user_id: user.id,
            date_of_birth: profile.date_of_birth,
            address: profile.address.filter(|address| !address.is_empty()),
        })?;
        tx.commit();

        info!(username = %trainee.user.username, trainee_id = trainee.id, "Registered trainee");
        Ok(Registered {
            profile: trainee.into(),
            password,
        })
    }

    #[instrument(skip(self), err)]
    pub fn get_by_username(&self, username: &str) -> Result<TraineeResponse> {
        let mut tx = self.db.read();
        let trainee = Trainees::new(&mut tx).get_by_username(username)?.ok_or_else(|| not_found(username))?;
        Ok(trainee.into())
    }

    /// A page of trainees and the total number of trainees.
    #[instrument(skip(self), err)]
    pub fn list(&self, skip: usize, limit: usize) -> Result<(Vec<TraineeResponse>, usize)> {
        let mut tx = self.db.read();
        let total = tx.trainees.len();
        let trainees = Trainees::new(&mut tx).list(&ListFilter::new(skip, limit))?;
        Ok((trainees.into_iter().map(Into::into).collect(), total))
    }

    /// Check a trainee's credentials.
    #[instrument(skip(self, password), err)]
    pub fn login(&self, username: &str, password: &str) -> Result<TraineeResponse> {
        Ok(self.authenticate(username, password)?.into())
    }

    /// Apply the supplied keys of `firstName`, `lastName`, `dateOfBirth`, `address`.
    #[instrument(skip(self, password, attributes), err)]
    pub fn update(&self, username: &str, password: &str, attributes: &Attributes) -> Result<TraineeResponse> {
        let trainee = self.authenticate(username, password)?;

        check_update_attributes(attributes, &UPDATABLE, &NON_BLANK)?;
        let profile = parse_profile_fields(attributes)?;
        let names = users::name_update(attributes);

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainee.user)?;
        if !names.is_empty() {
            Users::new(&mut tx).update(trainee.user.id, &names)?;
        }
        let updated = Trainees::new(&mut tx).update(trainee.id, &profile)?;
        tx.commit();

        info!(%username, "Updated trainee");
        Ok(updated.into())
    }

    #[instrument(skip(self, old_password, new_password), err)]
    pub fn change_password(&self, username: &str, old_password: &str, new_password: &str) -> Result<()> {
        let trainee = self.authenticate(username, old_password)?;
        users::change_password(&self.db, &trainee.user, &self.passwords, new_password)?;

        info!(%username, "Changed trainee password");
        Ok(())
    }

    #[instrument(skip(self, password), err)]
    pub fn set_active(&self, username: &str, password: &str, is_active: bool) -> Result<TraineeResponse> {
        let trainee = self.authenticate(username, password)?;

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainee.user)?;
        users::set_active(&mut tx, trainee.user.id, is_active)?;
        let updated = Trainees::new(&mut tx).get_by_id(trainee.id)?.ok_or_else(|| not_found(username))?;
        tx.commit();

        info!(%username, is_active, "Changed trainee activation");
        Ok(updated.into())
    }

    /// Delete the trainee's trainings, the trainee and its user, returning the removed trainings.
    fn remove(&self, username: &str, password: &str) -> Result<Vec<TrainingDBResponse>> {
        let trainee = self.authenticate(username, password)?;

        let mut tx = self.db.begin();
        users::ensure_unchanged(&mut tx, &trainee.user)?;
        let trainings = Trainings::new(&mut tx).delete_by_trainee(trainee.id)?;
        Trainees::new(&mut tx).delete(trainee.id)?;
        Users::new(&mut tx).delete(trainee.user.id)?;
        tx.commit();

        info!(%username, trainings = trainings.len(), "Deleted trainee");
        Ok(trainings)
    }

    /// Delete the trainee with its trainings and report each removed training to the workload
    /// service.
    #[instrument(skip(self, password, propagation), err)]
    pub async fn delete(&self, username: &str, password: &str, propagation: &Propagation) -> Result<()> {
        let service = self.clone();
        let (username, password) = (username.to_string(), password.to_string());
        let removed = blocking(move || service.remove(&username, &password)).await?;

        report_removed(&self.workload, &removed, propagation).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::TrainingFilter;
    use crate::db::models::trainings::TrainingCreateDBRequest;
    use crate::test_utils::{attributes, create_test_trainer, create_test_training_type, test_password_config};
    use crate::workload::{ActionType, mock::MockWorkloadClient};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    fn service() -> (Database, TraineeService) {
        let db = Database::new();
        (db.clone(), TraineeService::new(db, test_password_config(), Workload::disabled()))
    }

    fn propagation() -> Propagation {
        Propagation {
            transaction_id: "tx-delete".to_string(),
            authorization: None,
        }
    }

    fn register_john(service: &TraineeService) -> Registered<TraineeResponse> {
        service
            .register(&attributes(&[(FIRST_NAME, "John"), (LAST_NAME, "Doe")]))
            .unwrap()
    }

    #[test]
    fn test_register_returns_names_and_credentials() {
        let (_, service) = service();
        let registered = service
            .register(&attributes(&[
                (FIRST_NAME, "John"),
                (LAST_NAME, "Doe"),
                (DATE_OF_BIRTH, "17-05-1990"),
                (ADDRESS, "1 Main St"),
            ]))
            .unwrap();

        assert_eq!(registered.profile.first_name, "John");
        assert_eq!(registered.profile.last_name, "Doe");
        assert_eq!(registered.profile.username, "john.doe");
        assert_eq!(registered.profile.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 17));
        assert!(registered.profile.is_active);
        assert_eq!(registered.password.len(), 10);

        assert!(service.login("john.doe", &registered.password).is_ok());
    }

    #[test]
    fn test_register_with_empty_map_fails() {
        let (db, service) = service();
        assert!(matches!(
            service.register(&Attributes::new()),
            Err(Error::MissingAttributes { .. })
        ));
        assert!(db.read().users.is_empty());
    }

    #[test]
    fn test_register_with_bad_date_fails() {
        let (db, service) = service();
        let err = service
            .register(&attributes(&[(FIRST_NAME, "John"), (LAST_NAME, "Doe"), (DATE_OF_BIRTH, "1990-05-17")]))
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
        assert!(db.read().users.is_empty());
    }

    #[test]
    fn test_same_names_get_distinct_usernames() {
        let (_, service) = service();
        let first = register_john(&service);
        let second = register_john(&service);

        assert_eq!(first.profile.username, "john.doe");
        assert_eq!(second.profile.username, "john.doe0");
    }

    #[test]
    fn test_get_by_username() {
        let (_, service) = service();
        register_john(&service);

        assert_eq!(service.get_by_username("john.doe").unwrap().first_name, "John");
        assert!(matches!(service.get_by_username("jane.doe"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let (_, service) = service();
        let registered = register_john(&service);

        let updated = service
            .update(
                "john.doe",
                &registered.password,
                &attributes(&[(LAST_NAME, "Smith"), (ADDRESS, "2 Side St")]),
            )
            .unwrap();

        assert_eq!(updated.first_name, "John");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.address.as_deref(), Some("2 Side St"));
        // Username is kept when names change
        assert_eq!(updated.username, "john.doe");
        assert_eq!(service.get_by_username("john.doe").unwrap(), updated);
    }

    #[test]
    fn test_update_with_wrong_password_persists_nothing() {
        let (_, service) = service();
        register_john(&service);

        let err = service
            .update("john.doe", "not the right password", &attributes(&[(FIRST_NAME, "Jack")]))
            .unwrap_err();
        assert!(matches!(err, Error::FailedAuthentication { .. }));
        assert_eq!(service.get_by_username("john.doe").unwrap().first_name, "John");

        // Authentication is checked before the attribute map
        assert!(matches!(
            service.update("john.doe", "not the right password", &Attributes::new()),
            Err(Error::FailedAuthentication { .. })
        ));
    }

    #[test]
    fn test_update_rejects_empty_unknown_and_blank_attributes() {
        let (_, service) = service();
        let registered = register_john(&service);
        let password = registered.password.as_str();

        for attrs in [
            Attributes::new(),
            attributes(&[("nickname", "JD")]),
            attributes(&[(FIRST_NAME, " ")]),
        ] {
            assert!(matches!(
                service.update("john.doe", password, &attrs),
                Err(Error::MissingAttributes { .. })
            ));
        }
        assert!(matches!(
            service.update("john.doe", password, &attributes(&[(DATE_OF_BIRTH, "yesterday")])),
            Err(Error::BadRequest { .. })
        ));
        assert!(matches!(
            service.update("nobody", password, &attributes(&[(FIRST_NAME, "Jack")])),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_change_password() {
        let (_, service) = service();
        let registered = register_john(&service);

        assert!(matches!(
            service.change_password("john.doe", &registered.password, "abc"),
            Err(Error::InvalidPassword { .. })
        ));
        assert!(service.login("john.doe", &registered.password).is_ok());

        assert!(matches!(
            service.change_password("john.doe", "wrong", "newPassword"),
            Err(Error::FailedAuthentication { .. })
        ));

        service.change_password("john.doe", &registered.password, "newPassword").unwrap();
        assert!(service.login("john.doe", "newPassword").is_ok());
        assert!(matches!(
            service.login("john.doe", &registered.password),
            Err(Error::FailedAuthentication { .. })
        ));
    }

    #[test]
    fn test_set_active() {
        let (_, service) = service();
        let registered = register_john(&service);

        let deactivated = service.set_active("john.doe", &registered.password, false).unwrap();
        assert!(!deactivated.is_active);
        assert!(!service.get_by_username("john.doe").unwrap().is_active);
    }

    #[tokio::test]
    async fn test_delete_removes_trainee_user_and_trainings() {
        let mock = MockWorkloadClient::new();
        let db = Database::new();
        let service = TraineeService::new(db.clone(), test_password_config(), Workload::new(Arc::new(mock.clone())));
        let registered = register_john(&service);

        {
            let mut tx = db.begin();
            let yoga = create_test_training_type(&mut tx, "Yoga");
            let trainer = create_test_trainer(&mut tx, "tom.hardy", yoga.id);
            let trainee_id = tx.trainees.find_all().next().unwrap().id;
            for (day, duration) in [(1, 45), (2, 30)] {
                Trainings::new(&mut tx)
                    .create(&TrainingCreateDBRequest {
                        trainee_id,
                        trainer_id: trainer.id,
                        name: "Morning flow".to_string(),
                        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                        training_type_id: yoga.id,
                        duration,
                    })
                    .unwrap();
            }
            tx.commit();
        }

        service.delete("john.doe", &registered.password, &propagation()).await.unwrap();

        // Every cascaded training is reported as deleted
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.request.action_type == ActionType::Delete));
        assert!(calls.iter().all(|call| call.request.trainer_username == "tom.hardy"));
        assert!(calls.iter().all(|call| call.transaction_id == "tx-delete"));
        let durations: Vec<_> = calls.iter().map(|call| call.request.training_duration).collect();
        assert_eq!(durations, vec![45, 30]);

        let mut tx = db.begin();
        assert!(tx.trainees.is_empty());
        assert!(Users::new(&mut tx).get_user_by_username("john.doe").unwrap().is_none());
        assert!(Trainings::new(&mut tx).list(&TrainingFilter::default()).unwrap().is_empty());
        // The trainer is untouched
        assert_eq!(tx.trainers.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_username_mutates_nothing() {
        let (db, service) = service();
        register_john(&service);

        assert!(matches!(
            service.delete("jane.doe", "password", &propagation()).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            service.delete("john.doe", "password", &propagation()).await,
            Err(Error::FailedAuthentication { .. })
        ));

        let tx = db.begin();
        assert_eq!(tx.trainees.len(), 1);
        assert_eq!(tx.users.len(), 1);
    }

    #[test]
    fn test_list_pages() {
        let (_, service) = service();
        for _ in 0..3 {
            register_john(&service);
        }
        let (page, total) = service.list(1, 1).unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].username, "john.doe0");
    }

    #[test]
    fn test_parallel_registrations_never_share_a_username() {
        let (_, service) = service();

        let usernames: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| register_john(&service).profile.username))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        let mut unique = usernames.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), usernames.len());
        assert!(usernames.iter().all(|username| username.starts_with("john.doe")));
        assert!(usernames.contains(&"john.doe".to_string()));
        assert!(usernames.contains(&"john.doe14".to_string()));
    }

    #[test]
    fn test_password_checks_do_not_block_other_requests() {
        // Production Argon2 cost so that a verification takes far longer than a lookup
        let db = Database::new();
        let service = TraineeService::new(db, PasswordConfig::default(), Workload::disabled());
        register_john(&service);

        let started = Instant::now();
        assert!(service.login("john.doe", "wrong").is_err());
        let verify_cost = started.elapsed();

        let done = AtomicBool::new(false);
        let slowest_read = std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..2 {
                    assert!(service.login("john.doe", "wrong").is_err());
                }
                done.store(true, Ordering::SeqCst);
            });

            let mut slowest = Duration::ZERO;
            while !done.load(Ordering::SeqCst) {
                let started = Instant::now();
                service.get_by_username("john.doe").unwrap();
                slowest = slowest.max(started.elapsed());
            }
            slowest
        });

        assert!(
            slowest_read < verify_cost / 2,
            "a lookup waited {slowest_read:?} behind a {verify_cost:?} password check"
        );
    }
}
