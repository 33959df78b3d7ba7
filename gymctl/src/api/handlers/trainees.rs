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
        trainees::{TraineeAttributes, TraineeResponse},
        trainings::{TrainingListQuery, TrainingResponse},
    },
    auth::credentials::BasicCredentials,
    errors::Result,
    services::blocking,
};

/// Register a trainee
#[utoipa::path(
    post,
    path = "/trainees",
    tag = "trainees",
    request_body = TraineeAttributes,
    responses(
        (status = 201, description = "Trainee registered; the password is shown only once", body = RegistrationResponse),
        (status = 400, description = "Missing attributes or invalid date of birth"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register_trainee(
    State(state): State<AppState>,
    Json(attributes): Json<TraineeAttributes>,
) -> Result<(StatusCode, Json<RegistrationResponse>)> {
    let registered = blocking(move || state.trainees.register(&attributes.0)).await?;
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
    path = "/trainees",
    tag = "trainees",
    summary = "List trainees",
    params(Pagination),
    responses(
        (status = 200, description = "A page of trainees", body = PaginatedResponse<TraineeResponse>),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_trainees(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<TraineeResponse>>> {
    let (skip, limit) = (pagination.skip(), pagination.limit());
    let (trainees, total) = blocking(move || state.trainees.list(skip, limit)).await?;
    Ok(Json(PaginatedResponse::new(trainees, total, skip, limit)))
}

#[utoipa::path(
    get,
    path = "/trainees/{username}",
    tag = "trainees",
    summary = "Get a trainee",
    params(("username" = String, Path, description = "Trainee username")),
    responses(
        (status = 200, description = "Trainee profile", body = TraineeResponse),
        (status = 404, description = "Trainee not found"),
    )
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn get_trainee(State(state): State<AppState>, Path(username): Path<String>) -> Result<Json<TraineeResponse>> {
    let trainee = blocking(move || state.trainees.get_by_username(&username)).await?;
    Ok(Json(trainee))
}

/// Update a trainee profile
///
/// Only the supplied keys among `firstName`, `lastName`, `dateOfBirth` and `address` change.
#[utoipa::path(
    patch,
    path = "/trainees/{username}",
    tag = "trainees",
    request_body = TraineeAttributes,
    params(("username" = String, Path, description = "Trainee username")),
    responses(
        (status = 200, description = "Updated profile", body = TraineeResponse),
        (status = 400, description = "No recognized or blank attributes"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainee not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn update_trainee(
    State(state): State<AppState>,
    Path(username): Path<String>,
    credentials: BasicCredentials,
    Json(attributes): Json<TraineeAttributes>,
) -> Result<Json<TraineeResponse>> {
    credentials.ensure_username(&username)?;
    let trainee = blocking(move || state.trainees.update(&username, &credentials.password, &attributes.0)).await?;
    Ok(Json(trainee))
}

/// Delete a trainee together with its trainings
#[utoipa::path(
    delete,
    path = "/trainees/{username}",
    tag = "trainees",
    params(
        ("username" = String, Path, description = "Trainee username"),
        ("X-Transaction-Id" = Option<String>, Header, description = "Correlation id forwarded to the workload service"),
    ),
    responses(
        (status = 204, description = "Trainee deleted"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainee not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn delete_trainee(
    State(state): State<AppState>,
    Path(username): Path<String>,
    context: RequestContext,
    credentials: BasicCredentials,
) -> Result<StatusCode> {
    credentials.ensure_username(&username)?;
    state.trainees.delete(&username, &credentials.password, &context.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/trainees/{username}/active",
    tag = "trainees",
    summary = "Activate or deactivate a trainee",
    request_body = ActivationRequest,
    params(("username" = String, Path, description = "Trainee username")),
    responses(
        (status = 200, description = "Updated profile", body = TraineeResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Trainee not found"),
    ),
    security(("BasicAuth" = []))
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn set_trainee_active(
    State(state): State<AppState>,
    Path(username): Path<String>,
    credentials: BasicCredentials,
    Json(request): Json<ActivationRequest>,
) -> Result<Json<TraineeResponse>> {
    credentials.ensure_username(&username)?;
    let trainee = blocking(move || state.trainees.set_active(&username, &credentials.password, request.is_active)).await?;
    Ok(Json(trainee))
}

#[utoipa::path(
    get,
    path = "/trainees/{username}/trainings",
    tag = "trainees",
    summary = "List a trainee's trainings",
    params(("username" = String, Path, description = "Trainee username"), TrainingListQuery),
    responses(
        (status = 200, description = "Matching trainings", body = Vec<TrainingResponse>),
        (status = 404, description = "Trainee not found"),
    )
)]
#[tracing::instrument(skip_all, fields(%username))]
pub async fn list_trainee_trainings(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<TrainingListQuery>,
) -> Result<Json<Vec<TrainingResponse>>> {
    let trainings = blocking(move || state.trainings.list_for_trainee(&username, &query)).await?;
    Ok(Json(trainings))
}

#[cfg(test)]
mod tests {
    use crate::api::models::{
        auth::RegistrationResponse,
        pagination::PaginatedResponse,
        trainees::TraineeResponse,
    };
    use crate::test_utils::{basic_auth, create_test_server};
    use axum::http::{StatusCode, header};
    use serde_json::json;

    async fn register(server: &axum_test::TestServer, first: &str, last: &str) -> RegistrationResponse {
        let response = server
            .post("/trainees")
            .json(&json!({ "firstName": first, "lastName": last, "dateOfBirth": "17-05-1990" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[test_log::test(tokio::test)]
    async fn test_register_and_get_trainee() {
        let (server, _) = create_test_server();

        let first = register(&server, "John", "Doe").await;
        let second = register(&server, "John", "Doe").await;
        assert_eq!(first.username, "john.doe");
        assert_eq!(second.username, "john.doe0");
        assert_eq!(first.password.len(), 10);

        let response = server.get("/trainees/john.doe").await;
        response.assert_status_ok();
        let trainee: TraineeResponse = response.json();
        assert_eq!(trainee.first_name, "John");
        assert!(trainee.is_active);
        assert_eq!(response.json::<serde_json::Value>()["dateOfBirth"], "17-05-1990");

        server.get("/trainees/nobody").await.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_register_with_missing_attributes() {
        let (server, _) = create_test_server();

        let response = server.post("/trainees").json(&json!({})).await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["missing"], json!(["firstName", "lastName"]));

        server
            .post("/trainees")
            .json(&json!({ "firstName": "John", "lastName": "Doe", "dateOfBirth": "1990-05-17" }))
            .await
            .assert_status_bad_request();
    }

    #[test_log::test(tokio::test)]
    async fn test_update_requires_matching_credentials() {
        let (server, _) = create_test_server();
        let john = register(&server, "John", "Doe").await;
        let jane = register(&server, "Jane", "Roe").await;

        // No credentials
        server
            .patch("/trainees/john.doe")
            .json(&json!({ "address": "2 Side St" }))
            .await
            .assert_status_unauthorized();

        // Someone else's credentials
        let (name, value) = basic_auth(&jane.username, &jane.password);
        server
            .patch("/trainees/john.doe")
            .add_header(name, value)
            .json(&json!({ "address": "2 Side St" }))
            .await
            .assert_status_unauthorized();

        let (name, value) = basic_auth(&john.username, "wrong");
        let response = server
            .patch("/trainees/john.doe")
            .add_header(name, value)
            .json(&json!({ "address": "2 Side St" }))
            .await;
        response.assert_status_unauthorized();
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let (name, value) = basic_auth(&john.username, &john.password);
        let response = server
            .patch("/trainees/john.doe")
            .add_header(name, value)
            .json(&json!({ "address": "2 Side St", "lastName": "Smith" }))
            .await;
        response.assert_status_ok();
        let updated: TraineeResponse = response.json();
        assert_eq!(updated.address.as_deref(), Some("2 Side St"));
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.username, "john.doe");
    }

    #[test_log::test(tokio::test)]
    async fn test_activation_delete_and_listing() {
        let (server, _) = create_test_server();
        let john = register(&server, "John", "Doe").await;
        register(&server, "Jane", "Roe").await;

        let page: PaginatedResponse<TraineeResponse> = server.get("/trainees?limit=1").await.json();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.data.len(), 1);

        let (name, value) = basic_auth(&john.username, &john.password);
        let response = server
            .patch("/trainees/john.doe/active")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "isActive": false }))
            .await;
        response.assert_status_ok();
        assert!(!response.json::<TraineeResponse>().is_active);

        server
            .delete("/trainees/john.doe")
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.get("/trainees/john.doe").await.assert_status_not_found();
    }
}
