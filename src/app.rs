use std::net::SocketAddr;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::route_not_found;
use crate::state::AppState;
use crate::{auth, docs, movies, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(users::router(state.clone()))
        .merge(movies::router(state.clone()))
        .merge(docs::router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    tracing::info!("docs available at http://{}/docs", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::testing::{self, call};

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (app, _) = testing::app();
        let (status, body) = call(&app, Method::GET, "/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "route not found");
        assert_eq!(body["route"], "/nowhere");
    }

    #[tokio::test]
    async fn unsupported_method_on_known_path_is_json_404() {
        let (app, _) = testing::app();
        let token = testing::register_and_login(&app, "verbs@x.com", "pw").await;
        for (method, uri) in [
            (Method::GET, "/users/register"),
            (Method::PUT, "/users/login"),
            (Method::DELETE, "/users/register"),
            (Method::DELETE, "/movies"),
            (Method::PUT, "/users"),
            (Method::POST, "/users/1"),
            (Method::PATCH, "/movies/1"),
        ] {
            let (status, body) = call(&app, method.clone(), uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body["error"], "route not found", "{method} {uri}");
            assert_eq!(body["route"], uri, "{method} {uri}");
        }
    }
}
