use axum::{
    extract::State,
    middleware,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument};

use super::dto::{UserEnvelope, UserList, UserPayload};
use crate::{
    auth::{password::hash_password, require_auth, AuthUser},
    error::{route_not_found, ApiError, ApiResult, AppJson, ErrorBody},
    params::{Page, RecordId},
    response::{MessageBody, UpdatedBody},
    state::AppState,
};

pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).fallback(route_not_found))
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(route_not_found),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// List users, 10 per page.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(("page" = Option<i64>, Query, description = "1-based page number")),
    responses(
        (status = 200, description = "One page of users", body = UserList),
        (status = 400, description = "Invalid page", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    page: Page,
) -> ApiResult<Json<UserList>> {
    let users = state.users.find_all(page).await?;
    debug!(page = page.number(), count = users.len(), "users listed");
    Ok(Json(UserList { users }))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserEnvelope),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Json<UserEnvelope>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserEnvelope { user }))
}

/// Change any subset of email, password, gender and role.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UpdatedBody),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
    AppJson(payload): AppJson<UserPayload>,
) -> ApiResult<Json<UpdatedBody>> {
    let mut changes = payload.validate_partial()?;
    if let Some(plain) = changes.password.take() {
        changes.password = Some(hash_password(&plain)?);
    }

    state.users.update(id, &changes).await?;

    info!(user_id = id, "user updated");
    Ok(Json(UpdatedBody {
        message: "User updated".into(),
        location: format!("/users/{id}"),
    }))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Json<MessageBody>> {
    state.users.delete(id).await?;
    info!(user_id = id, "user deleted");
    Ok(Json(MessageBody::new("User deleted")))
}
