use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument};

use super::dto::{CreatedMovie, MovieEnvelope, MovieList, MoviePayload};
use crate::{
    auth::{require_auth, AuthUser},
    error::{route_not_found, ApiError, ApiResult, AppJson, ErrorBody},
    params::{Page, RecordId},
    response::{MessageBody, UpdatedBody},
    state::AppState,
};

pub fn movie_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/movies",
            get(list_movies)
                .post(create_movie)
                .fallback(route_not_found),
        )
        .route(
            "/movies/:id",
            get(get_movie)
                .put(update_movie)
                .delete(delete_movie)
                .fallback(route_not_found),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// List movies, 10 per page.
#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    params(("page" = Option<i64>, Query, description = "1-based page number")),
    responses(
        (status = 200, description = "One page of movies", body = MovieList),
        (status = 400, description = "Invalid page", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    page: Page,
) -> ApiResult<Json<MovieList>> {
    let movies = state.movies.find_all(page).await?;
    debug!(page = page.number(), count = movies.len(), "movies listed");
    Ok(Json(MovieList { movies }))
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "The movie", body = MovieEnvelope),
        (status = 404, description = "Movie not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Json<MovieEnvelope>> {
    let movie = state
        .movies
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Movie not found"))?;
    Ok(Json(MovieEnvelope { movie }))
}

#[utoipa::path(
    post,
    path = "/movies",
    tag = "movies",
    request_body = MoviePayload,
    responses(
        (status = 201, description = "Movie created", body = CreatedMovie),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state, payload))]
pub async fn create_movie(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    AppJson(payload): AppJson<MoviePayload>,
) -> ApiResult<(StatusCode, Json<CreatedMovie>)> {
    let movie = payload.validate_full()?;
    let movie_id = state.movies.insert(&movie).await?;

    info!(movie_id, "movie created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedMovie {
            message: "Movie created".into(),
            movie_id,
        }),
    ))
}

/// Change any subset of title, genres and year.
#[utoipa::path(
    put,
    path = "/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    request_body = MoviePayload,
    responses(
        (status = 200, description = "Movie updated", body = UpdatedBody),
        (status = 400, description = "Invalid data", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state, payload))]
pub async fn update_movie(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
    AppJson(payload): AppJson<MoviePayload>,
) -> ApiResult<Json<UpdatedBody>> {
    let changes = payload.validate_partial()?;
    state.movies.update(id, &changes).await?;

    info!(movie_id = id, "movie updated");
    Ok(Json(UpdatedBody {
        message: "Movie updated".into(),
        location: format!("/movies/{id}"),
    }))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie deleted", body = MessageBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearerAuth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    RecordId(id): RecordId,
) -> ApiResult<Json<MessageBody>> {
    state.movies.delete(id).await?;
    info!(movie_id = id, "movie deleted");
    Ok(Json(MessageBody::new("Movie deleted")))
}
