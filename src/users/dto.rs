use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::validation::{present, require, require_any, ValidationError};

/// Public view of a user. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub gender: String,
    pub role: String,
}

/// Full row, only read for credential checks.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub gender: String,
    pub role: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            email: r.email,
            gender: r.gender,
            role: r.role,
        }
    }
}

/// Body of register and update requests.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

impl UserPayload {
    pub fn validate_full(self) -> Result<NewUser, ValidationError> {
        let [email, password, gender, role] =
            require([self.email, self.password, self.gender, self.role])?;
        Ok(NewUser {
            email,
            password,
            gender,
            role,
        })
    }

    pub fn validate_partial(self) -> Result<UserChanges, ValidationError> {
        require_any(&[&self.email, &self.password, &self.gender, &self.role])?;
        Ok(UserChanges {
            email: present(self.email),
            password: present(self.password),
            gender: present(self.gender),
            role: present(self.role),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// Stored as given; handlers replace it with the hash before insert.
    pub password: String,
    pub gender: String,
    pub role: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    /// Stored as given; handlers replace it with the hash before update.
    pub password: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

impl UserChanges {
    /// Mutable columns paired with their new values, present fields only.
    pub fn columns(&self) -> Vec<(&'static str, &str)> {
        [
            ("email", &self.email),
            ("password_hash", &self.password),
            ("gender", &self.gender),
            ("role", &self.role),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let [email, password] =
            require([self.email, self.password]).map_err(|_| ValidationError::MissingCredentials)?;
        Ok(Credentials { email, password })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
}
