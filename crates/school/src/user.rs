use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edudesk_auth::{DecodedToken, Role};
use edudesk_core::{DomainError, DomainResult, Entity, SchoolId, UserId};

use crate::validation::Validator;

/// A login identity. The password is only ever held as a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        role: Role,
        school_id: Option<SchoolId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            email,
            password_hash,
            role,
            school_id,
            created_at: now,
        }
    }

    /// Identity carried in this account's long tokens.
    pub fn token_subject(&self) -> DecodedToken {
        DecodedToken::new(self.id, self.role, self.school_id)
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            school_id: self.school_id,
        }
    }
}

impl Entity for UserAccount {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Public projection of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub school_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub school_id: Option<SchoolId>,
}

impl UserInput {
    /// Only administrator accounts are opened here; student accounts come
    /// with a student record.
    pub fn validate(&self) -> DomainResult<NewUserFields> {
        let role = match self.role.as_deref().map(str::parse::<Role>) {
            Some(Ok(role @ (Role::SuperAdmin | Role::SchoolAdmin))) => role,
            _ => return Err(DomainError::validation("Invalid role")),
        };

        let mut v = Validator::new();
        let username = v.username("username", self.username.as_deref());
        let email = v.email("email", self.email.as_deref());
        let password = v.password("password", self.password.as_deref());
        let school_id = v.optional_id::<SchoolId>("schoolId", self.school_id.as_deref());
        if v.is_clean() && role == Role::SchoolAdmin && school_id.is_none() {
            v.fail("School Id is required");
        }

        v.finish(|| {
            Some(NewUserFields {
                username: username?,
                email: email?,
                password: password?,
                role,
                school_id: school_id.filter(|_| role == Role::SchoolAdmin),
            })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(&self) -> DomainResult<Credentials> {
        let mut v = Validator::new();
        let username = v.required("username", self.username.as_deref());
        let password = match self.password.as_deref() {
            Some(p) if !p.is_empty() => Some(p.to_string()),
            _ => {
                v.fail("password is required");
                None
            }
        };
        v.finish(|| {
            Some(Credentials {
                username: username?,
                password: password?,
            })
        })
    }
}
