//! OpenAPI document generated from the handler annotations.

use axum::{response::Html, routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    error::ErrorBody,
    movies::dto::{CreatedMovie, Movie, MovieEnvelope, MovieList, MoviePayload},
    response::{MessageBody, UpdatedBody},
    state::AppState,
    users::dto::{LoginRequest, LoginResponse, RegisteredUser, User, UserEnvelope, UserList, UserPayload},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Movies REST API", version = "1.0.0"),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::users::handlers::list_users,
        crate::users::handlers::get_user,
        crate::users::handlers::update_user,
        crate::users::handlers::delete_user,
        crate::movies::handlers::list_movies,
        crate::movies::handlers::get_movie,
        crate::movies::handlers::create_movie,
        crate::movies::handlers::update_movie,
        crate::movies::handlers::delete_movie,
    ),
    components(schemas(
        User, UserPayload, LoginRequest, LoginResponse, RegisteredUser, UserEnvelope, UserList,
        Movie, MoviePayload, CreatedMovie, MovieEnvelope, MovieList,
        MessageBody, UpdatedBody, ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Accounts and login"),
        (name = "movies", description = "Movie catalogue"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

const SWAGGER_PAGE: &str = r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Movies REST API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>window.ui = SwaggerUIBundle({ url: "/docs.json", dom_id: "#swagger-ui" });</script>
</body>
</html>
"##;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/docs.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}
