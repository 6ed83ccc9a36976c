use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::dto::{NewUser, User, UserChanges, UserRecord};
use crate::{db::update_query, params::Page};

/// Storage operations for users. Absence on reads is `Ok(None)`, not an error.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<User>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
    /// Returns the id assigned by the store.
    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32>;
    /// Writes only the fields present in `changes`.
    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<()>;
    /// Deleting a missing id is not an error.
    async fn delete(&self, id: i32) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, gender, role
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, gender, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, gender, role
            FROM users
            WHERE email = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (email, password_hash, gender, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.gender)
        .bind(&user.role)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<()> {
        let Some(mut qb) = update_query("users", id, changes.columns()) else {
            return Ok(());
        };
        qb.build()
            .execute(&self.db)
            .await
            .context("update user")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }
}
