use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edudesk_auth::TenantScoped;
use edudesk_core::{ClassroomId, DomainResult, Entity, SchoolId, StudentId, UserId};

use crate::validation::Validator;

/// A student enrolment. The login identity lives in the linked user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub classroom_id: ClassroomId,
    pub school_id: SchoolId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(fields: &NewStudentFields, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: StudentId::new(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            classroom_id: fields.classroom_id,
            school_id: fields.school_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: &StudentFields, now: DateTime<Utc>) {
        self.first_name = fields.first_name.clone();
        self.last_name = fields.last_name.clone();
        self.classroom_id = fields.classroom_id;
        self.school_id = fields.school_id;
        self.updated_at = now;
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> StudentId {
        self.id
    }
}

impl TenantScoped for Student {
    fn tenant_id(&self) -> SchoolId {
        self.school_id
    }
}

/// Raw student payload. Account fields are only read on create, except an
/// optional `username` change on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInput {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub classroom_id: Option<String>,
    pub school_id: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated create payload, including the account to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudentFields {
    pub first_name: String,
    pub last_name: String,
    pub classroom_id: ClassroomId,
    pub school_id: SchoolId,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Validated update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub first_name: String,
    pub last_name: String,
    pub classroom_id: ClassroomId,
    pub school_id: SchoolId,
    pub username: Option<String>,
}

impl StudentInput {
    pub fn validate_new(&self) -> DomainResult<NewStudentFields> {
        let mut v = Validator::new();
        let first_name = v.name("firstName", self.first_name.as_deref());
        let last_name = v.name("lastName", self.last_name.as_deref());
        let classroom_id = v.id::<ClassroomId>("classroomId", self.classroom_id.as_deref());
        let school_id = v.id::<SchoolId>("schoolId", self.school_id.as_deref());
        let email = v.email("email", self.email.as_deref());
        let username = v.username("username", self.username.as_deref());
        let password = v.password("password", self.password.as_deref());
        v.finish(|| {
            Some(NewStudentFields {
                first_name: first_name?,
                last_name: last_name?,
                classroom_id: classroom_id?,
                school_id: school_id?,
                email: email?,
                username: username?,
                password: password?,
            })
        })
    }

    pub fn validate_update(&self) -> DomainResult<(StudentId, StudentFields)> {
        let mut v = Validator::new();
        let id = v.id::<StudentId>("id", self.id.as_deref());
        let first_name = v.name("firstName", self.first_name.as_deref());
        let last_name = v.name("lastName", self.last_name.as_deref());
        let classroom_id = v.id::<ClassroomId>("classroomId", self.classroom_id.as_deref());
        let school_id = v.id::<SchoolId>("schoolId", self.school_id.as_deref());
        let username = match self.username.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => Some(v.username("username", Some(u))),
            _ => None,
        };
        v.finish(|| {
            Some((
                id?,
                StudentFields {
                    first_name: first_name?,
                    last_name: last_name?,
                    classroom_id: classroom_id?,
                    school_id: school_id?,
                    username: match username {
                        Some(u) => Some(u?),
                        None => None,
                    },
                },
            ))
        })
    }
}
