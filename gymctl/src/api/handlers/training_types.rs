use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::training_types::{TrainingTypeCreate, TrainingTypeResponse},
    errors::Result,
    services::blocking,
    types::TrainingTypeId,
};

#[utoipa::path(
    get,
    path = "/training-types",
    tag = "training-types",
    summary = "List training types",
    responses(
        (status = 200, description = "All training types", body = Vec<TrainingTypeResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_training_types(State(state): State<AppState>) -> Result<Json<Vec<TrainingTypeResponse>>> {
    let types = blocking(move || state.training_types.list()).await?;
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/training-types/{id}",
    tag = "training-types",
    summary = "Get a training type",
    params(("id" = i64, Path, description = "Training type ID")),
    responses(
        (status = 200, description = "Training type", body = TrainingTypeResponse),
        (status = 404, description = "Training type not found"),
    )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_training_type(State(state): State<AppState>, Path(id): Path<TrainingTypeId>) -> Result<Json<TrainingTypeResponse>> {
    let training_type = blocking(move || state.training_types.get_by_id(id)).await?;
    Ok(Json(training_type))
}

#[utoipa::path(
    post,
    path = "/training-types",
    tag = "training-types",
    summary = "Register a training type",
    request_body = TrainingTypeCreate,
    responses(
        (status = 201, description = "Training type registered", body = TrainingTypeResponse),
        (status = 400, description = "Blank name"),
        (status = 409, description = "Name already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_training_type(
    State(state): State<AppState>,
    Json(request): Json<TrainingTypeCreate>,
) -> Result<(StatusCode, Json<TrainingTypeResponse>)> {
    let created = blocking(move || state.training_types.register(&request.name)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
