use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::validation::{present, require, require_any, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub genres: String,
    pub year: String,
}

/// Body of create and update requests.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MoviePayload {
    pub title: Option<String>,
    pub genres: Option<String>,
    pub year: Option<String>,
}

impl MoviePayload {
    pub fn validate_full(self) -> Result<NewMovie, ValidationError> {
        let [title, genres, year] = require([self.title, self.genres, self.year])?;
        Ok(NewMovie {
            title,
            genres,
            year,
        })
    }

    pub fn validate_partial(self) -> Result<MovieChanges, ValidationError> {
        require_any(&[&self.title, &self.genres, &self.year])?;
        Ok(MovieChanges {
            title: present(self.title),
            genres: present(self.genres),
            year: present(self.year),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub genres: String,
    pub year: String,
}

#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub genres: Option<String>,
    pub year: Option<String>,
}

impl MovieChanges {
    pub fn columns(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", &self.title),
            ("genres", &self.genres),
            ("year", &self.year),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedMovie {
    pub message: String,
    #[serde(rename = "movieId")]
    pub movie_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieEnvelope {
    pub movie: Movie,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieList {
    pub movies: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_validation_needs_title_genres_and_year() {
        let movie = MoviePayload {
            title: Some("Heat".into()),
            genres: Some("Crime".into()),
            year: Some("1995".into()),
        }
        .validate_full()
        .unwrap();
        assert_eq!(movie.year, "1995");

        let incomplete = MoviePayload {
            title: Some("Heat".into()),
            genres: Some("Crime".into()),
            year: None,
        };
        assert_eq!(incomplete.validate_full().unwrap_err(), ValidationError::Incomplete);
    }

    #[test]
    fn partial_validation_accepts_any_single_field() {
        let changes = MoviePayload {
            year: Some("1996".into()),
            ..Default::default()
        }
        .validate_partial()
        .unwrap();
        assert_eq!(changes.columns(), vec![("year", "1996")]);

        assert!(MoviePayload::default().validate_partial().is_err());
    }
}
