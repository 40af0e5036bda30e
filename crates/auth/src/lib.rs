//! `edudesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows the
//! roles, the role-permission table, how to evaluate a request against it, how
//! to scope a school admin to its own school, and how long tokens and
//! passwords are checked.

pub mod authorize;
pub mod claims;
pub mod credentials;
pub mod permissions;
pub mod roles;
pub mod tenant;

pub use authorize::{AuthorizationDecision, AuthorizationRequest, DenialReason, evaluate};
pub use claims::{
    DecodedToken, Hs256LongTokens, LongTokenClaims, TokenError, TokenIssuer, TokenVerifier,
};
pub use credentials::{Argon2Hasher, CredentialError, CredentialHasher};
pub use permissions::{Action, PermissionTable, Resource, TableError};
pub use roles::{Role, UnknownRole};
pub use tenant::{TenantFilter, TenantScoped, guard_record, guard_school, scope_for};
