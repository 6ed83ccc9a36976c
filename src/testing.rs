//! In-memory stores and request helpers for router tests.

use std::{collections::BTreeMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::{AppConfig, JwtConfig},
    movies::{
        dto::{Movie, MovieChanges, NewMovie},
        repo::MovieRepo,
    },
    params::Page,
    state::AppState,
    users::{
        dto::{NewUser, User, UserChanges, UserRecord},
        repo::UserRepo,
    },
};

struct Table<T> {
    next_id: i32,
    rows: BTreeMap<i32, T>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, make: impl FnOnce(i32) -> T) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, make(id));
        id
    }

    fn page(&self, page: Page) -> Vec<T> {
        self.rows
            .values()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect()
    }
}

fn apply(field: &mut String, change: &Option<String>) {
    if let Some(v) = change {
        *field = v.clone();
    }
}

pub struct MemoryUsers(Mutex<Table<UserRecord>>);

#[async_trait]
impl UserRepo for MemoryUsers {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<User>> {
        let table = self.0.lock().unwrap();
        Ok(table.page(page).into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let table = self.0.lock().unwrap();
        Ok(table.rows.get(&id).cloned().map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let table = self.0.lock().unwrap();
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32> {
        let mut table = self.0.lock().unwrap();
        Ok(table.insert_with(|id| UserRecord {
            id,
            email: user.email.clone(),
            password_hash: user.password.clone(),
            gender: user.gender.clone(),
            role: user.role.clone(),
        }))
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<()> {
        let mut table = self.0.lock().unwrap();
        if let Some(row) = table.rows.get_mut(&id) {
            apply(&mut row.email, &changes.email);
            apply(&mut row.password_hash, &changes.password);
            apply(&mut row.gender, &changes.gender);
            apply(&mut row.role, &changes.role);
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<()> {
        self.0.lock().unwrap().rows.remove(&id);
        Ok(())
    }
}

pub struct MemoryMovies(Mutex<Table<Movie>>);

#[async_trait]
impl MovieRepo for MemoryMovies {
    async fn find_all(&self, page: Page) -> anyhow::Result<Vec<Movie>> {
        Ok(self.0.lock().unwrap().page(page))
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Movie>> {
        Ok(self.0.lock().unwrap().rows.get(&id).cloned())
    }

    async fn insert(&self, movie: &NewMovie) -> anyhow::Result<i32> {
        let mut table = self.0.lock().unwrap();
        Ok(table.insert_with(|id| Movie {
            id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            year: movie.year.clone(),
        }))
    }

    async fn update(&self, id: i32, changes: &MovieChanges) -> anyhow::Result<()> {
        let mut table = self.0.lock().unwrap();
        if let Some(row) = table.rows.get_mut(&id) {
            apply(&mut row.title, &changes.title);
            apply(&mut row.genres, &changes.genres);
            apply(&mut row.year, &changes.year);
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<()> {
        self.0.lock().unwrap().rows.remove(&id);
        Ok(())
    }
}

pub fn config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: None,
        },
    }
}

pub fn state() -> AppState {
    AppState::from_parts(
        &config(),
        Arc::new(MemoryUsers(Mutex::new(Table::new()))),
        Arc::new(MemoryMovies(Mutex::new(Table::new()))),
    )
}

pub fn app() -> (Router, AppState) {
    let state = state();
    (build_app(state.clone()), state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("infallible");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request");
    send(app, req).await
}

pub async fn call_raw(app: &Router, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_string()))
        .expect("request");
    send(app, req).await
}

/// Registers `email` (gender `f`, role `user`) and returns a login token.
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let (status, _) = call(
        app,
        Method::POST,
        "/users/register",
        None,
        Some(json!({"email": email, "password": password, "gender": "f", "role": "user"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

/// Inserts `n` users straight into the store, bypassing hashing.
pub async fn seed_users(state: &AppState, n: usize) {
    for i in 0..n {
        state
            .users
            .insert(&NewUser {
                email: format!("seed{i}@x.com"),
                password: "unused".into(),
                gender: "m".into(),
                role: "user".into(),
            })
            .await
            .unwrap();
    }
}

/// Inserts `n` movies titled `Movie 1..=n` in the Drama genre.
pub async fn seed_movies(state: &AppState, n: usize) {
    for i in 1..=n {
        state
            .movies
            .insert(&NewMovie {
                title: format!("Movie {i}"),
                genres: "Drama".into(),
                year: "2000".into(),
            })
            .await
            .unwrap();
    }
}
