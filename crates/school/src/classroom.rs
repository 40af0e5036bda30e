use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edudesk_auth::TenantScoped;
use edudesk_core::{ClassroomId, DomainResult, Entity, SchoolId};

use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    pub capacity: u32,
    pub school_id: SchoolId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Classroom {
    pub fn new(fields: ClassroomFields, now: DateTime<Utc>) -> Self {
        Self {
            id: ClassroomId::new(),
            name: fields.name,
            capacity: fields.capacity,
            school_id: fields.school_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: ClassroomFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.capacity = fields.capacity;
        self.school_id = fields.school_id;
        self.updated_at = now;
    }
}

impl Entity for Classroom {
    type Id = ClassroomId;

    fn id(&self) -> ClassroomId {
        self.id
    }
}

impl TenantScoped for Classroom {
    fn tenant_id(&self) -> SchoolId {
        self.school_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassroomInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub capacity: Option<i64>,
    pub school_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassroomFields {
    pub name: String,
    pub capacity: u32,
    pub school_id: SchoolId,
}

impl ClassroomInput {
    pub fn validate(&self) -> DomainResult<ClassroomFields> {
        let mut v = Validator::new();
        let fields = self.check(&mut v);
        v.finish(|| fields)
    }

    pub fn validate_with_id(&self) -> DomainResult<(ClassroomId, ClassroomFields)> {
        let mut v = Validator::new();
        let id = v.id::<ClassroomId>("id", self.id.as_deref());
        let fields = self.check(&mut v);
        v.finish(|| id.zip(fields))
    }

    fn check(&self, v: &mut Validator) -> Option<ClassroomFields> {
        let name = v.name("name", self.name.as_deref());
        let capacity = v.capacity("capacity", self.capacity);
        let school_id = v.id::<SchoolId>("schoolId", self.school_id.as_deref());
        Some(ClassroomFields {
            name: name?,
            capacity: capacity?,
            school_id: school_id?,
        })
    }
}
