use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(()) => info!("migrations applied"),
        Err(e) => warn!(error = %e, "migration failed; continuing"),
    }
}

/// `UPDATE <table> SET col = $n, ... WHERE id = $m` over the supplied columns only.
///
/// Column names must come from the caller's allow-list; values are always bound.
/// Returns `None` when there is nothing to set.
pub fn update_query<'a>(
    table: &'static str,
    id: i32,
    columns: Vec<(&'static str, &'a str)>,
) -> Option<QueryBuilder<'a, Postgres>> {
    if columns.is_empty() {
        return None;
    }
    let mut qb = QueryBuilder::new(format!("UPDATE {table} SET "));
    let mut set = qb.separated(", ");
    for (column, value) in columns {
        set.push(column)
            .push_unseparated(" = ")
            .push_bind_unseparated(value);
    }
    qb.push(" WHERE id = ").push_bind(id);
    Some(qb)
}
