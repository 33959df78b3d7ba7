//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] collects every handler's `utoipa::path` annotation and is served as JSON at
//! `/openapi.json`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api::{handlers, models};

/// HTTP Basic security scheme used by the mutating routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BasicAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some(
                            "Username and password issued at registration. The username must match the \
                            `{username}` path segment of the route.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "gymctl", description = "Gym management API: trainees, trainers, training types and trainings"),
    paths(
        handlers::auth::login,
        handlers::auth::change_password,
        handlers::trainees::register_trainee,
        handlers::trainees::list_trainees,
        handlers::trainees::get_trainee,
        handlers::trainees::update_trainee,
        handlers::trainees::delete_trainee,
        handlers::trainees::set_trainee_active,
        handlers::trainees::list_trainee_trainings,
        handlers::trainers::register_trainer,
        handlers::trainers::list_trainers,
        handlers::trainers::get_trainer,
        handlers::trainers::update_trainer,
        handlers::trainers::delete_trainer,
        handlers::trainers::set_trainer_active,
        handlers::trainers::list_trainer_trainings,
        handlers::training_types::list_training_types,
        handlers::training_types::get_training_type,
        handlers::training_types::create_training_type,
        handlers::trainings::add_training,
        handlers::trainings::delete_training,
    ),
    components(schemas(
        models::auth::ProfileKind,
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::auth::ChangePasswordRequest,
        models::auth::RegistrationResponse,
        models::auth::ActivationRequest,
        models::auth::AuthSuccessResponse,
        models::trainees::TraineeAttributes,
        models::trainees::TraineeResponse,
        models::trainers::TrainerAttributes,
        models::trainers::TrainerResponse,
        models::training_types::TrainingTypeCreate,
        models::training_types::TrainingTypeResponse,
        models::trainings::TrainingCreate,
        models::trainings::TrainingResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "authentication", description = "Login and password management"),
        (name = "trainees", description = "Trainee profiles"),
        (name = "trainers", description = "Trainer profiles"),
        (name = "training-types", description = "Training type catalogue"),
        (name = "trainings", description = "Training sessions"),
    )
)]
pub struct ApiDoc;
