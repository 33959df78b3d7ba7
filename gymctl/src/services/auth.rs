//! Login and password changes for either profile kind.

use tracing::{info, instrument};

use crate::api::models::auth::{LoginResponse, ProfileKind};
use crate::config::PasswordConfig;
use crate::db::{
    handlers::{Trainees, Trainers},
    models::users::UserDBResponse,
    store::Database,
};
use crate::errors::{Error, Result};
use crate::services::users;

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    passwords: PasswordConfig,
}

impl AuthService {
    pub fn new(db: Database, passwords: PasswordConfig) -> Self {
        Self { db, passwords }
    }

    /// The user behind `username` and the kind of profile it owns. Usernames are unique across
    /// both kinds.
    fn find_account(&self, username: &str) -> Result<Option<(UserDBResponse, ProfileKind)>> {
        let mut tx = self.db.read();
        if let Some(trainee) = Trainees::new(&mut tx).get_by_username(username)? {
            return Ok(Some((trainee.user, ProfileKind::Trainee)));
        }
        if let Some(trainer) = Trainers::new(&mut tx).get_by_username(username)? {
            return Ok(Some((trainer.user, ProfileKind::Trainer)));
        }
        Ok(None)
    }

    /// Check credentials against trainee and trainer profiles.
    #[instrument(skip(self, password), err)]
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let (user, profile) = self.find_account(username)?.ok_or_else(|| Error::FailedAuthentication {
            username: username.to_string(),
        })?;
        users::check_password(&user, password)?;

        info!(%username, ?profile, "Login succeeded");
        Ok(LoginResponse {
            username: username.to_string(),
            profile,
        })
    }

    /// Change the password of whichever profile owns `username`.
    #[instrument(skip(self, old_password, new_password), err)]
    pub fn change_password(&self, username: &str, old_password: &str, new_password: &str) -> Result<()> {
        let (user, profile) = self.find_account(username)?.ok_or_else(|| Error::NotFound {
            resource: "User".to_string(),
            id: username.to_string(),
        })?;
        users::check_password(&user, old_password)?;
        users::change_password(&self.db, &user, &self.passwords, new_password)?;

        info!(%username, ?profile, "Changed password");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        FIRST_NAME, LAST_NAME, SPECIALIZATION, trainees::TraineeService, trainers::TrainerService, trainings::Propagation,
    };
    use crate::test_utils::{attributes, create_test_training_type, test_password_config};
    use crate::workload::Workload;

    struct Fixture {
        auth: AuthService,
        trainees: TraineeService,
        trainee_password: String,
        trainer_password: String,
    }

    fn fixture() -> Fixture {
        let db = Database::new();
        {
            let mut tx = db.begin();
            create_test_training_type(&mut tx, "Yoga");
            tx.commit();
        }
        let trainees = TraineeService::new(db.clone(), test_password_config(), Workload::disabled());
        let trainers = TrainerService::new(db.clone(), test_password_config(), Workload::disabled());

        let trainee = trainees
            .register(&attributes(&[(FIRST_NAME, "Ann"), (LAST_NAME, "Lee")]))
            .unwrap();
        let trainer = trainers
            .register(&attributes(&[(FIRST_NAME, "Tom"), (LAST_NAME, "Hardy"), (SPECIALIZATION, "Yoga")]))
            .unwrap();

        Fixture {
            auth: AuthService::new(db, test_password_config()),
            trainees,
            trainee_password: trainee.password,
            trainer_password: trainer.password,
        }
    }

    #[test]
    fn test_login_identifies_profile_kind() {
        let f = fixture();

        let trainee = f.auth.login("ann.lee", &f.trainee_password).unwrap();
        assert_eq!(trainee.profile, ProfileKind::Trainee);
        let trainer = f.auth.login("tom.hardy", &f.trainer_password).unwrap();
        assert_eq!(trainer.profile, ProfileKind::Trainer);

        assert!(matches!(
            f.auth.login("ann.lee", &f.trainer_password),
            Err(Error::FailedAuthentication { .. })
        ));
        assert!(matches!(
            f.auth.login("nobody", "pw"),
            Err(Error::FailedAuthentication { .. })
        ));
    }

    #[test]
    fn test_change_password_dispatches_by_owner() {
        let f = fixture();

        f.auth.change_password("tom.hardy", &f.trainer_password, "new-secret").unwrap();
        assert!(f.auth.login("tom.hardy", "new-secret").is_ok());

        assert!(matches!(
            f.auth.change_password("ann.lee", &f.trainee_password, "abc"),
            Err(Error::InvalidPassword { .. })
        ));
        assert!(f.auth.login("ann.lee", &f.trainee_password).is_ok());

        assert!(matches!(
            f.auth.change_password("nobody", "pw", "new-secret"),
            Err(Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_change_password_after_the_profile_is_gone() {
        let f = fixture();
        f.trainees
            .delete("ann.lee", &f.trainee_password, &Propagation::default())
            .await
            .unwrap();

        match f.auth.change_password("ann.lee", &f.trainee_password, "new-secret") {
            Err(Error::NotFound { resource, .. }) => assert_eq!(resource, "User"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            f.auth.login("ann.lee", &f.trainee_password),
            Err(Error::FailedAuthentication { .. })
        ));
    }
}
