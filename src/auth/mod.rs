use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use middleware::{require_auth, AuthUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
