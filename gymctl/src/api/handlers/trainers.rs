use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::RequestContext;
use crate::{
    AppState,
    api::models::{
        auth::{ActivationRequest, RegistrationResponse},
        pagination::{PaginatedResponse, Pagination},
        trainers::{TrainerAttributes, TrainerResponse},
        trainings::{TrainingListQuery, TrainingResponse},
    },
    auth::credentials::BasicCredentials,
    errors::Result,
    services::blocking,
};

/// Register a trainer
///
/// `specialization` names an existing training type.
#[utoipa::path(
    post,
    path = "/trainers",
    tag = "trainers",
    request_body = TrainerAttributes,
    responses(
        (status = 201, description = "Trainer registered; the password is shown only once", body = RegistrationResponse),
        (status = 400, description = "Missing attributes"),
        (status = 404, description = "Unknown specialization"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register_trainer(
    State(state): State<AppState>,
    Json(attributes): Json<TrainerAttributes>,
) -> Result<(StatusCode, Json<RegistrationResponse>)> {
    let registered = blocking(move || state.trainers.register(&attributes.0)).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            username: registered.profile.username,
            password: registered.password,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/trainers",
    tag = "trainers",
    summary = "List trainers",
    params(Pagination),
    responses(
        (status = 200, description = "A page of trainers", body = PaginatedResponse<TrainerResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_trainers(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TrainerResponse>>> {
    let (skip, limit) = (pagination.skip(), pagination.limit());
    let (trainers, total) = blocking(move || state.trainers.list(skip, limit)).await?;
    Ok(Json(PaginatedResponse::new(trainers, total, skip, limit)))
}

#[utoipa::path(
    get,
    path = "/trainers/{username}",
    tag = "trainers",
    summary = "Get a trainer",
    params(("username" = String, Path, description = "Trainer username")),
    responses(
        (status = 200, description = "Trainer profile", body = TrainerResponse),
        (status = 404, description = "Trainer not found"),
    )
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn get_trainer(State(state): State<AppState>, Path(username): Path<String>) -> Result<Json<TrainerResponse>> {
    let trainer = blocking(move || state.trainers.get_by_username(&username)).await?;
    Ok(Json(trainer))
}

#[utoipa::path(
    patch,
    path = "/trainers/{username}",
    tag = "trainers",
    summary = "Update a trainer profile",
    request_body = TrainerAttributes,
    params(("username" = String, Path, description = "Trainer username")),
    responses(
        (status = 200, description = "Updated profile", body = TrainerResponse),
        (status = 400, description = "No recognized or blank attributes"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainer or specialization not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn update_trainer(
    State(state): State<AppState>,
    Path(username): Path<String>,
    credentials: BasicCredentials,
    Json(attributes): Json<TrainerAttributes>,
) -> Result<Json<TrainerResponse>> {
    credentials.ensure_username(&username)?;
    let trainer = blocking(move || state.trainers.update(&username, &credentials.password, &attributes.0)).await?;
    Ok(Json(trainer))
}

#[utoipa::path(
    delete,
    path = "/trainers/{username}",
    tag = "trainers",
    summary = "Delete a trainer together with its trainings",
    params(
        ("username" = String, Path, description = "Trainer username"),
        ("X-Transaction-Id" = Option<String>, Header, description = "Correlation id forwarded to the workload service"),
    ),
    responses(
        (status = 204, description = "Trainer deleted"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainer not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn delete_trainer(
    State(state): State<AppState>,
    Path(username): Path<String>,
    context: RequestContext,
    credentials: BasicCredentials,
) -> Result<StatusCode> {
    credentials.ensure_username(&username)?;
    state.trainers.delete(&username, &credentials.password, &context.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/trainers/{username}/active",
    tag = "trainers",
    summary = "Activate or deactivate a trainer",
    request_body = ActivationRequest,
    params(("username" = String, Path, description = "Trainer username")),
    responses(
        (status = 200, description = "Updated profile", body = TrainerResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainer not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn set_trainer_active(
    State(state): State<AppState>,
    Path(username): Path<String>,
    credentials: BasicCredentials,
    Json(request): Json<ActivationRequest>,
) -> Result<Json<TrainerResponse>> {
    credentials.ensure_username(&username)?;
    let trainer = blocking(move || state.trainers.set_active(&username, &credentials.password, request.is_active)).await?;
    Ok(Json(trainer))
}

#[utoipa::path(
    get,
    path = "/trainers/{username}/trainings",
    tag = "trainers",
    summary = "List a trainer's trainings",
    params(("username" = String, Path, description = "Trainer username"), TrainingListQuery),
    responses(
        (status = 200, description = "Matching trainings", body = Vec<TrainingResponse>),
        (status = 404, description = "Trainer not found"),
    )
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn list_trainer_trainings(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<TrainingListQuery>,
) -> Result<Json<Vec<TrainingResponse>>> {
    let trainings = blocking(move || state.trainings.list_for_trainer(&username, &query)).await?;
    Ok(Json(trainings))
}
