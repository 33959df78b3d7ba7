//! # gymctl: gym management backend
//!
//! `gymctl` keeps track of a gym's trainees, trainers, training types and the trainings that
//! link them, and exposes them over a small REST API.
//!
//! ## Overview
//!
//! Every trainee and trainer wraps a user identity with a generated `firstname.lastname`
//! username and a generated password. The plaintext password is returned once, at
//! registration; afterwards every mutating operation takes the username and password (HTTP
//! Basic on the API) and checks them before changing anything.
//!
//! Trainings are reported to an external workload service as they are added and deleted. That
//! call is best effort: if the service is disabled or unreachable a fallback logs the event and
//! the operation still succeeds.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum). State lives in an
//! in-memory [`db::store::Database`]: one set of tables behind a single mutex, accessed through
//! transactions that roll back when dropped uncommitted. Repositories in [`db::handlers`] add
//! integrity checks and derived lookups; services in [`services`] implement the workflows; the
//! handlers in [`api::handlers`] translate HTTP to service calls.
//!
//! On startup the store can be seeded from a JSON file ([`seed`]). Data does not survive a
//! restart.
//!
//! ## Configuration
//!
//! Configuration comes from a YAML file merged with `GYMCTL_`-prefixed environment variables.
//! See [`config`] for the keys.
//!
//! ## Getting Started
//!
//! ```no_run
//! use gymctl::{Application, Config, telemetry};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = gymctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     telemetry::init_telemetry(config.log_format)?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     Application::new(config)?
//!         .serve(async {
//!             tokio::signal::ctrl_c().await.ok();
//!         })
//!         .await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod seed;
pub mod services;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod types;
pub mod workload;

use axum::{
    Json, Router,
    routing::{delete, get, patch, post, put},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;

pub use config::Config;
use db::store::Database;
use openapi::ApiDoc;
use seed::Seeder;
use services::{
    auth::AuthService, trainees::TraineeService, trainers::TrainerService, training_types::TrainingTypeService,
    trainings::TrainingService,
};
use workload::Workload;

/// Application state shared across all request handlers.
///
/// Services share one [`Database`]; cloning the state is cheap.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .trainees(trainees)
///     .trainers(trainers)
///     .training_types(training_types)
///     .trainings(trainings)
///     .auth(auth)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub trainees: TraineeService,
    pub trainers: TrainerService,
    pub training_types: TrainingTypeService,
    pub trainings: TrainingService,
    pub auth: AuthService,
}

impl AppState {
    /// Wire every service to `db`.
    pub fn from_parts(config: Config, db: Database, workload: Workload) -> Self {
        let passwords = config.auth.password.clone();

        AppState::builder()
            .auth(AuthService::new(db.clone(), passwords.clone()))
            .trainees(TraineeService::new(db.clone(), passwords.clone(), workload.clone()))
            .trainers(TrainerService::new(db.clone(), passwords, workload.clone()))
            .training_types(TrainingTypeService::new(db.clone()))
            .trainings(TrainingService::new(db, workload))
            .config(config)
            .build()
    }

    pub fn seeder(&self) -> Seeder<'_> {
        Seeder {
            training_types: &self.training_types,
            trainees: &self.trainees,
            trainers: &self.trainers,
        }
    }
}

/// Build the application router with every route and the tracing layer.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/authentication/login", post(api::handlers::auth::login))
        .route("/authentication/password", put(api::handlers::auth::change_password));

    let trainee_routes = Router::new()
        .route(
            "/trainees",
            post(api::handlers::trainees::register_trainee).get(api::handlers::trainees::list_trainees),
        )
        .route(
            "/trainees/{username}",
            get(api::handlers::trainees::get_trainee)
                .patch(api::handlers::trainees::update_trainee)
                .delete(api::handlers::trainees::delete_trainee),
        )
        .route("/trainees/{username}/active", patch(api::handlers::trainees::set_trainee_active))
        .route("/trainees/{username}/trainings", get(api::handlers::trainees::list_trainee_trainings));

    let trainer_routes = Router::new()
        .route(
            "/trainers",
            post(api::handlers::trainers::register_trainer).get(api::handlers::trainers::list_trainers),
        )
        .route(
            "/trainers/{username}",
            get(api::handlers::trainers::get_trainer)
                .patch(api::handlers::trainers::update_trainer)
                .delete(api::handlers::trainers::delete_trainer),
        )
        .route("/trainers/{username}/active", patch(api::handlers::trainers::set_trainer_active))
        .route("/trainers/{username}/trainings", get(api::handlers::trainers::list_trainer_trainings));

    let training_routes = Router::new()
        .route(
            "/training-types",
            get(api::handlers::training_types::list_training_types).post(api::handlers::training_types::create_training_type),
        )
        .route("/training-types/{id}", get(api::handlers::training_types::get_training_type))
        .route("/trainings", post(api::handlers::trainings::add_training))
        .route("/trainings/{id}", delete(api::handlers::trainings::delete_training));

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(auth_routes)
        .merge(trainee_routes)
        .merge(trainer_routes)
        .merge(training_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// A configured, seeded application ready to serve.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create the store, seed it and build the router.
    ///
    /// Fails if the workload client cannot be built or if seeding fails in strict mode.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting gymctl with configuration: {:#?}", config);

        let workload = Workload::from_config(&config.workload)?;
        let state = AppState::from_parts(config.clone(), Database::new(), workload);
        state.seeder().run(&config.seed)?;

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("gymctl listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;
        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedMode;
    use std::io::Write;

    #[test_log::test(tokio::test)]
    async fn test_health_and_openapi_routes() {
        let (server, _) = test_utils::create_test_server();

        server.get("/healthz").await.assert_text("OK");
        let doc: serde_json::Value = server.get("/openapi.json").await.json();
        assert_eq!(doc["info"]["title"], "gymctl");
    }

    #[test]
    fn test_application_seeds_on_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "trainingTypes": [{ "name": "Yoga" }], "trainees": [{ "firstName": "Ann", "lastName": "Lee" }] }"#)
            .unwrap();

        let mut config = Config::default();
        config.seed.path = file.path().to_path_buf();
        config.seed.mode = SeedMode::Strict;
        config.auth.password = test_utils::test_password_config();
        assert!(Application::new(config.clone()).is_ok());

        config.seed.path = "/nonexistent/data.json".into();
        assert!(Application::new(config).is_err());
    }
}
