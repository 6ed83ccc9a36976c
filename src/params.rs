use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::{error::ApiError, validation::ValidationError};

pub const PAGE_SIZE: i64 = 10;

/// 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(number: i64) -> Result<Self, ValidationError> {
        if number < 1 {
            return Err(ValidationError::InvalidPage);
        }
        Ok(Self(number))
    }

    /// Absent means the first page; anything that is not a positive base-10 integer is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        match raw {
            None => Ok(Self(1)),
            Some(raw) => Self::new(raw.parse::<i64>().map_err(|_| ValidationError::InvalidPage)?),
        }
    }

    pub fn number(self) -> i64 {
        self.0
    }

    pub fn limit(self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(self) -> i64 {
        (self.0 - 1).saturating_mul(PAGE_SIZE)
    }
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(q) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::InvalidPage)?;
        Ok(Page::parse(q.page.as_deref())?)
    }
}

lazy_static! {
    static ref ID_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Numeric `{id}` path segment. Anything else is treated as an unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i32);

impl RecordId {
    pub fn parse(raw: &str) -> Option<Self> {
        if !ID_RE.is_match(raw) {
            return None;
        }
        raw.parse().ok().map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let route = parts.uri.path().to_string();
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::RouteNotFound(route.clone()))?;
        RecordId::parse(&raw).ok_or(ApiError::RouteNotFound(route))
    }
}
