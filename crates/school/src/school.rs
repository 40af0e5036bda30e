use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edudesk_auth::TenantScoped;
use edudesk_core::{DomainResult, Entity, SchoolId};

use crate::validation::Validator;

/// Postal address of a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A school; also the tenant boundary for school admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl School {
    pub fn new(fields: SchoolFields, now: DateTime<Utc>) -> Self {
        Self {
            id: SchoolId::new(),
            name: fields.name,
            address: fields.address,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: SchoolFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.address = fields.address;
        self.updated_at = now;
    }
}

impl Entity for School {
    type Id = SchoolId;

    fn id(&self) -> SchoolId {
        self.id
    }
}

impl TenantScoped for School {
    fn tenant_id(&self) -> SchoolId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Raw school payload for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<AddressInput>,
}

/// Validated school fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolFields {
    pub name: String,
    pub address: Address,
}

impl SchoolInput {
    pub fn validate(&self) -> DomainResult<SchoolFields> {
        let mut v = Validator::new();
        let fields = self.check(&mut v);
        v.finish(|| fields)
    }

    /// Validation for update: the target id is required as well.
    pub fn validate_with_id(&self) -> DomainResult<(SchoolId, SchoolFields)> {
        let mut v = Validator::new();
        let id = v.id::<SchoolId>("id", self.id.as_deref());
        let fields = self.check(&mut v);
        v.finish(|| id.zip(fields))
    }

    fn check(&self, v: &mut Validator) -> Option<SchoolFields> {
        let name = v.name("name", self.name.as_deref());
        let address = match &self.address {
            Some(a) => {
                let street = v.required("address.street", a.street.as_deref());
                let city = v.required("address.city", a.city.as_deref());
                let state = v.required("address.state", a.state.as_deref());
                let zip_code = v.required("address.zipCode", a.zip_code.as_deref());
                match (street, city, state, zip_code) {
                    (Some(street), Some(city), Some(state), Some(zip_code)) => Some(Address {
                        street,
                        city,
                        state,
                        zip_code,
                    }),
                    _ => None,
                }
            }
            None => {
                v.fail("address is required");
                None
            }
        };
        Some(SchoolFields {
            name: name?,
            address: address?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SchoolInput {
        SchoolInput {
            id: None,
            name: Some(" Oak Hill ".to_string()),
            address: Some(AddressInput {
                street: Some("1 Main St".to_string()),
                city: Some("Springfield".to_string()),
                state: Some("IL".to_string()),
                zip_code: Some("62701".to_string()),
            }),
        }
    }

    #[test]
    fn valid_input_yields_trimmed_fields() {
        let fields = input().validate().unwrap();
        assert_eq!(fields.name, "Oak Hill");
        assert_eq!(fields.address.zip_code, "62701");
    }

    #[test]
    fn missing_address_parts_are_listed() {
        let mut i = input();
        i.address = Some(AddressInput {
            street: Some("1 Main St".to_string()),
            ..AddressInput::default()
        });
        let err = i.validate().unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "address.city is required",
                "address.state is required",
                "address.zipCode is required"
            ]
        );
    }

    #[test]
    fn update_requires_id() {
        let err = input().validate_with_id().unwrap_err();
        assert_eq!(err.messages(), vec!["id is required"]);

        let id = SchoolId::new();
        let mut i = input();
        i.id = Some(id.to_string());
        assert_eq!(i.validate_with_id().unwrap().0, id);
    }

    #[test]
    fn school_is_its_own_tenant() {
        let school = School::new(input().validate().unwrap(), Utc::now());
        assert_eq!(school.tenant_id(), school.id);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let school = School::new(input().validate().unwrap(), Utc::now());
        let json = serde_json::to_value(&school).unwrap();
        assert_eq!(json["address"]["zipCode"], "62701");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn payload_deserializes_with_missing_fields() {
        let parsed: SchoolInput = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(parsed.address, None);
        assert_eq!(parsed.name.as_deref(), Some("x"));
    }
}
