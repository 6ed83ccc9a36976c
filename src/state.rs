use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    movies::repo::{MovieRepo, PgMovieRepo},
    users::repo::{PgUserRepo, UserRepo},
};

/// Shared, read-only handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<JwtKeys>,
    pub users: Arc<dyn UserRepo>,
    pub movies: Arc<dyn MovieRepo>,
}

impl AppState {
    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserRepo>,
        movies: Arc<dyn MovieRepo>,
    ) -> Self {
        Self {
            keys: Arc::new(JwtKeys::new(&config.jwt)),
            users,
            movies,
        }
    }

    pub fn with_pool(config: &AppConfig, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())) as Arc<dyn UserRepo>,
            Arc::new(PgMovieRepo::new(db)) as Arc<dyn MovieRepo>,
        )
    }
}
