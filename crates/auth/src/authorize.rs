use serde::Serialize;
use thiserror::Error;

use crate::{Action, PermissionTable, Resource, Role};

/// Why a request was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    #[error("missing token")]
    MissingToken,

    #[error("token verification failed")]
    VerificationFailed,

    #[error("unknown role")]
    UnknownRole,

    #[error("action not permitted")]
    ActionNotPermitted,

    #[error("tenant mismatch")]
    TenantMismatch,
}

/// A (role, resource, action) triple as it arrives from the boundary.
///
/// Fields are raw strings: the token carries the role name and the route
/// carries the resource and action names. Anything absent or unrecognized is
/// refused by [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationRequest<'a> {
    pub role: Option<&'a str>,
    pub resource: Option<&'a str>,
    pub action: Option<&'a str>,
}

impl<'a> AuthorizationRequest<'a> {
    pub fn new(role: &'a str, resource: &'a str, action: &'a str) -> Self {
        Self {
            role: Some(role),
            resource: Some(resource),
            action: Some(action),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: Option<DenialReason>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: DenialReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), DenialReason> {
        match self.reason {
            None if self.allowed => Ok(()),
            Some(reason) => Err(reason),
            None => Err(DenialReason::ActionNotPermitted),
        }
    }
}

/// Evaluate a request against the permission table.
///
/// - No IO
/// - No panics
/// - Fails closed: an absent or unrecognized role is `UnknownRole`, an absent
///   or unrecognized resource/action is `ActionNotPermitted`
pub fn evaluate(table: &PermissionTable, request: &AuthorizationRequest<'_>) -> AuthorizationDecision {
    let Some(role) = request.role.and_then(|r| r.parse::<Role>().ok()) else {
        return AuthorizationDecision::deny(DenialReason::UnknownRole);
    };
    if !table.has_role(role) {
        return AuthorizationDecision::deny(DenialReason::UnknownRole);
    }

    let resource = request.resource.and_then(|r| r.parse::<Resource>().ok());
    let action = request.action.and_then(|a| a.parse::<Action>().ok());
    match (resource, action) {
        (Some(resource), Some(action)) if table.permits(role, resource, action) => {
            AuthorizationDecision::allow()
        }
        _ => AuthorizationDecision::deny(DenialReason::ActionNotPermitted),
    }
}
