use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::RequestContext;
use crate::{
    AppState,
    api::models::trainings::{TrainingCreate, TrainingResponse},
    auth::credentials::BasicCredentials,
    errors::Result,
    types::TrainingId,
};

/// Add a training
///
/// The credentials must belong to the training's trainee or trainer. When `trainingType` is
/// omitted the trainer's specialization is used. The workload service is notified afterwards.
#[utoipa::path(
    post,
    path = "/trainings",
    tag = "trainings",
    request_body = TrainingCreate,
    params(("X-Transaction-Id" = Option<String>, Header, description = "Correlation id forwarded to the workload service")),
    responses(
        (status = 201, description = "Training added", body = TrainingResponse),
        (status = 400, description = "Blank name or non-positive duration"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainee, trainer or training type not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(transaction_id = %context.0.transaction_id))]
pub async fn add_training(
    State(state): State<AppState>,
    context: RequestContext,
    credentials: BasicCredentials,
    Json(request): Json<TrainingCreate>,
) -> Result<(StatusCode, Json<TrainingResponse>)> {
    let training = state
        .trainings
        .add(&credentials.username, &credentials.password, request, &context.0)
        .await?;
    Ok((StatusCode::CREATED, Json(training)))
}

/// Delete a training
///
/// Only the training's trainee may delete it.
#[utoipa::path(
    delete,
    path = "/trainings/{id}",
    tag = "trainings",
    params(
        ("id" = i64, Path, description = "Training ID"),
        ("X-Transaction-Id" = Option<String>, Header, description = "Correlation id forwarded to the workload service"),
    ),
    responses(
        (status = 204, description = "Training deleted"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Training not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%id, transaction_id = %context.0.transaction_id))]
pub async fn delete_training(
    State(state): State<AppState>,
    Path(id): Path<TrainingId>,
    context: RequestContext,
    credentials: BasicCredentials,
) -> Result<StatusCode> {
    state
        .trainings
        .delete(&credentials.username, &credentials.password, id, &context.0)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
