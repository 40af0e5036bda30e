use core::str::FromStr;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::Role;

/// Entity type targeted by an operation (the `{module}` path segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    School,
    Classroom,
    Student,
    User,
}

/// Operation name on a resource (the `{operation}` path segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Action {
    #[serde(rename = "create")]
    Create,
    #[serde(rename = "update")]
    Update,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "getByID")]
    GetById,
    #[serde(rename = "getAll")]
    GetAll,
    #[serde(rename = "createUser")]
    CreateUser,
    #[serde(rename = "login")]
    Login,
}

const CRUD: &[Action] = &[
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::GetById,
    Action::GetAll,
];

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::School,
        Resource::Classroom,
        Resource::Student,
        Resource::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::School => "school",
            Resource::Classroom => "classroom",
            Resource::Student => "student",
            Resource::User => "user",
        }
    }

    /// Operations this resource exposes over HTTP.
    pub fn operations(&self) -> &'static [Action] {
        match self {
            Resource::School | Resource::Classroom | Resource::Student => CRUD,
            Resource::User => &[Action::CreateUser, Action::Login],
        }
    }

    pub fn exposes(&self, action: Action) -> bool {
        self.operations().contains(&action)
    }
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::GetById,
        Action::GetAll,
        Action::CreateUser,
        Action::Login,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::GetById => "getByID",
            Action::GetAll => "getAll",
            Action::CreateUser => "createUser",
            Action::Login => "login",
        }
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL.into_iter().find(|r| r.as_str() == s).ok_or(())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL.into_iter().find(|a| a.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("role '{role}' is granted '{resource}:{action}', which is not an exposed operation")]
    UnexposedGrant {
        role: Role,
        resource: Resource,
        action: Action,
    },

    #[error("role '{0}' has an empty grant set")]
    EmptyRole(Role),
}

/// Role → resource → allowed actions.
///
/// Built once at startup and shared by reference; nothing mutates it after
/// [`PermissionTable::validate`] succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
    grants: BTreeMap<Role, BTreeMap<Resource, BTreeSet<Action>>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The school-management policy.
    pub fn standard() -> Self {
        Self::new()
            .grant(Role::SuperAdmin, Resource::School, CRUD)
            .grant(Role::SuperAdmin, Resource::Classroom, CRUD)
            .grant(Role::SuperAdmin, Resource::Student, CRUD)
            .grant(Role::SuperAdmin, Resource::User, &[Action::CreateUser])
            .grant(Role::SchoolAdmin, Resource::School, &[Action::GetById])
            .grant(Role::SchoolAdmin, Resource::Classroom, CRUD)
            .grant(Role::SchoolAdmin, Resource::Student, CRUD)
            .grant(Role::Student, Resource::School, &[Action::GetById])
            .grant(Role::Student, Resource::Classroom, &[Action::GetById])
            .grant(Role::Student, Resource::Student, &[Action::GetById])
    }

    /// Add `actions` on `resource` to the role's grant set.
    pub fn grant(mut self, role: Role, resource: Resource, actions: &[Action]) -> Self {
        self.grants
            .entry(role)
            .or_default()
            .entry(resource)
            .or_default()
            .extend(actions.iter().copied());
        self
    }

    /// Reject grants that name an operation the resource does not expose.
    pub fn validate(&self) -> Result<(), TableError> {
        for (role, resources) in &self.grants {
            if resources.values().all(BTreeSet::is_empty) {
                return Err(TableError::EmptyRole(*role));
            }
            for (resource, actions) in resources {
                if let Some(action) = actions.iter().find(|a| !resource.exposes(**a)) {
                    return Err(TableError::UnexposedGrant {
                        role: *role,
                        resource: *resource,
                        action: *action,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.grants.contains_key(&role)
    }

    /// Actions the role may invoke on the resource, if any are granted.
    pub fn actions(&self, role: Role, resource: Resource) -> Option<&BTreeSet<Action>> {
        self.grants.get(&role)?.get(&resource)
    }

    /// Every (resource, action) pair granted to the role. Unknown role → empty.
    pub fn grants(&self, role: Role) -> Vec<(Resource, Action)> {
        self.grants
            .get(&role)
            .map(|resources| {
                resources
                    .iter()
                    .flat_map(|(res, actions)| actions.iter().map(move |a| (*res, *a)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn permits(&self, role: Role, resource: Resource, action: Action) -> bool {
        self.actions(role, resource)
            .is_some_and(|actions| actions.contains(&action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_valid() {
        PermissionTable::standard().validate().unwrap();
    }

    #[test]
    fn grant_on_unexposed_operation_is_rejected() {
        let table = PermissionTable::new().grant(Role::SuperAdmin, Resource::User, &[Action::Create]);
        assert_eq!(
            table.validate(),
            Err(TableError::UnexposedGrant {
                role: Role::SuperAdmin,
                resource: Resource::User,
                action: Action::Create,
            })
        );
    }

    #[test]
    fn empty_role_is_rejected() {
        let table = PermissionTable::new().grant(Role::Student, Resource::School, &[]);
        assert_eq!(table.validate(), Err(TableError::EmptyRole(Role::Student)));
    }

    #[test]
    fn school_admin_cannot_create_users_or_list_schools() {
        let table = PermissionTable::standard();
        assert!(!table.permits(Role::SchoolAdmin, Resource::User, Action::CreateUser));
        assert!(!table.permits(Role::SchoolAdmin, Resource::School, Action::GetAll));
        assert!(table.permits(Role::SchoolAdmin, Resource::School, Action::GetById));
    }

    #[test]
    fn student_grants_are_read_only() {
        let grants = PermissionTable::standard().grants(Role::Student);
        assert_eq!(grants.len(), 3);
        assert!(grants.iter().all(|(_, a)| *a == Action::GetById));
    }

    #[test]
    fn login_is_never_granted() {
        let table = PermissionTable::standard();
        for role in Role::ALL {
            assert!(!table.permits(role, Resource::User, Action::Login));
        }
    }

    #[test]
    fn names_parse_back_to_variants() {
        for r in Resource::ALL {
            assert_eq!(r.as_str().parse::<Resource>(), Ok(r));
        }
        for a in Action::ALL {
            assert_eq!(a.as_str().parse::<Action>(), Ok(a));
        }
        assert!("getById".parse::<Action>().is_err());
    }
}
