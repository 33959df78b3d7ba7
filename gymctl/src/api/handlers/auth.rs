use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::auth::{AuthSuccessResponse, ChangePasswordRequest, LoginRequest, LoginResponse},
    errors::Result,
    services::blocking,
};

/// Log in with username and password
///
/// Succeeds for both trainees and trainers and reports which kind of profile matched.
#[utoipa::path(
    post,
    path = "/authentication/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Credentials are valid", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>> {
    let response = blocking(move || state.auth.login(&request.username, &request.password)).await?;
    Ok(Json(response))
}

/// Change a password
#[utoipa::path(
    put,
    path = "/authentication/password",
    request_body = ChangePasswordRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Password changed", body = AuthSuccessResponse),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Invalid current password"),
        (status = 404, description = "Unknown username"),
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<AuthSuccessResponse>> {
    blocking(move || {
        state
            .auth
            .change_password(&request.username, &request.old_password, &request.new_password)
    })
    .await?;

    Ok(Json(AuthSuccessResponse {
        message: "Password changed successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::models::auth::{LoginResponse, ProfileKind, RegistrationResponse};
    use crate::test_utils::create_test_server;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_login_and_change_password() {
        let (server, _) = create_test_server();
        let john: RegistrationResponse = server
            .post("/trainees")
            .json(&json!({ "firstName": "John", "lastName": "Doe" }))
            .await
            .json();

        let response = server
            .post("/authentication/login")
            .json(&json!({ "username": "john.doe", "password": john.password }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<LoginResponse>().profile, ProfileKind::Trainee);

        server
            .post("/authentication/login")
            .json(&json!({ "username": "john.doe", "password": "nope" }))
            .await
            .assert_status_unauthorized();

        server
            .put("/authentication/password")
            .json(&json!({ "username": "john.doe", "oldPassword": john.password, "newPassword": "abc" }))
            .await
            .assert_status_bad_request();
        server
            .put("/authentication/password")
            .json(&json!({ "username": "ghost", "oldPassword": "x", "newPassword": "abcd" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put("/authentication/password")
            .json(&json!({ "username": "john.doe", "oldPassword": john.password, "newPassword": "abcd" }))
            .await
            .assert_status_ok();

        server
            .post("/authentication/login")
            .json(&json!({ "username": "john.doe", "password": "abcd" }))
            .await
            .assert_status_ok();
    }
}
