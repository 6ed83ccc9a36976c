use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use super::password::{hash_password, verify_password};
use crate::{
    error::{route_not_found, ApiError, ApiResult, AppJson, ErrorBody},
    state::AppState,
    users::dto::{LoginRequest, LoginResponse, RegisteredUser, User, UserPayload},
};

const BAD_CREDENTIALS: &str = "invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register).fallback(route_not_found))
        .route("/users/login", post(login).fallback(route_not_found))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = RegisteredUser),
        (status = 400, description = "Invalid data", body = ErrorBody),
    )
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserPayload>,
) -> ApiResult<(StatusCode, Json<RegisteredUser>)> {
    let mut user = payload.validate_full()?;
    user.password = hash_password(&user.password)?;

    let user_id = state.users.insert(&user).await?;

    info!(user_id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            message: "User created".into(),
            user_id,
        }),
    ))
}

/// Exchange email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Email and password are required", body = ErrorBody),
        (status = 401, description = "Wrong email or password", body = ErrorBody),
    )
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let creds = payload.validate()?;

    let record = state
        .users
        .find_by_email(&creds.email)
        .await?
        .filter(|r| verify_password(&creds.password, &r.password_hash));

    let Some(record) = record else {
        warn!("login rejected");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS));
    };

    let token = state.keys.issue(record.id).map_err(anyhow::Error::from)?;

    info!(user_id = record.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: User::from(record),
        message: "Logged in".into(),
    }))
}
