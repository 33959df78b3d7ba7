//! Shared fixtures for unit tests.

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose};

use crate::auth::password;
use crate::config::{Config, PasswordConfig};
use crate::db::{
    handlers::{Repository, Trainees, Trainers, TrainingTypes, Users},
    models::{
        trainees::{TraineeCreateDBRequest, TraineeDBResponse},
        trainers::{TrainerCreateDBRequest, TrainerDBResponse},
        training_types::{TrainingTypeCreateDBRequest, TrainingTypeDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
    store::{Database, Tables},
};
use crate::services::Attributes;
use crate::types::TrainingTypeId;
use crate::workload::Workload;
use crate::{AppState, build_router};

/// Password of every user created by the `create_test_*` helpers.
pub const TEST_PASSWORD: &str = "password";

/// Password policy with cheap Argon2 parameters.
pub fn test_password_config() -> PasswordConfig {
    PasswordConfig {
        min_length: 4,
        generated_length: 10,
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
    }
}

pub fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Insert a user directly. Names are taken from a `first.last` username.
pub fn create_test_user(tables: &mut Tables, username: &str, password: &str) -> UserDBResponse {
    let (first_name, last_name) = username.split_once('.').unwrap_or((username, "Test"));
    let password_hash =
        password::hash_string_with_params(password, Some(test_password_config().argon2_params())).expect("Failed to hash password");

    Users::new(tables)
        .create(&UserCreateDBRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            password_hash,
            is_active: true,
        })
        .expect("Failed to create test user")
}

pub fn create_test_training_type(tables: &mut Tables, name: &str) -> TrainingTypeDBResponse {
    TrainingTypes::new(tables)
        .create(&TrainingTypeCreateDBRequest { name: name.to_string() })
        .expect("Failed to create test training type")
}

/// Insert a trainee whose password is [`TEST_PASSWORD`].
pub fn create_test_trainee(tables: &mut Tables, username: &str) -> TraineeDBResponse {
    let user = create_test_user(tables, username, TEST_PASSWORD);
    Trainees::new(tables)
        .create(&TraineeCreateDBRequest {
            user_id: user.id,
            date_of_birth: None,
            address: None,
        })
        .expect("Failed to create test trainee")
}

/// Insert a trainer whose password is [`TEST_PASSWORD`].
pub fn create_test_trainer(tables: &mut Tables, username: &str, specialization_id: TrainingTypeId) -> TrainerDBResponse {
    let user = create_test_user(tables, username, TEST_PASSWORD);
    Trainers::new(tables)
        .create(&TrainerCreateDBRequest {
            user_id: user.id,
            specialization_id,
        })
        .expect("Failed to create test trainer")
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.seed.enabled = false;
    config.auth.password = test_password_config();
    config
}

/// A test server over a fresh store with the workload service disabled.
pub fn create_test_server() -> (TestServer, Database) {
    create_test_server_with_workload(Workload::disabled())
}

pub fn create_test_server_with_workload(workload: Workload) -> (TestServer, Database) {
    let db = Database::new();
    let state = AppState::from_parts(create_test_config(), db.clone(), workload);
    let server = TestServer::new(build_router(state)).expect("Failed to create test server");
    (server, db)
}

/// An `Authorization: Basic` header.
pub fn basic_auth(username: &str, password: &str) -> (HeaderName, HeaderValue) {
    let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
    let value = HeaderValue::from_str(&format!("Basic {encoded}")).expect("Invalid header value");
    (header::AUTHORIZATION, value)
}
