use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::dto::{Movie, MovieChanges, NewMovie};
use crate::{db::update_query, params::Page};

#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<Movie>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Movie>>;
    async fn insert(&self, movie: &NewMovie) -> anyhow::Result<i32>;
    async fn update(&self, id: i32, changes: &MovieChanges) -> anyhow::Result<()>;
    async fn delete(&self, id: i32) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgMovieRepo {
    db: PgPool,
}

impl PgMovieRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepo for PgMovieRepo {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, genres, year
            FROM movies
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .context("list movies")?;
        Ok(movies)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, genres, year FROM movies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find movie by id")?;
        Ok(movie)
    }

    async fn insert(&self, movie: &NewMovie) -> anyhow::Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO movies (title, genres, year)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.genres)
        .bind(&movie.year)
        .fetch_one(&self.db)
        .await
        .context("insert movie")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &MovieChanges) -> anyhow::Result<()> {
        let Some(mut qb) = update_query("movies", id, changes.columns()) else {
            return Ok(());
        };
        qb.build()
            .execute(&self.db)
            .await
            .context("update movie")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete movie")?;
        Ok(())
    }
}
