use thiserror::Error;

use edudesk_auth::{CredentialError, DenialReason, TokenError};
use edudesk_core::DomainError;

use crate::store::StoreError;

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Failure of an entity-manager operation.
///
/// Everything except the last four variants is an expected outcome reported
/// to the caller as-is. `Store`, `Token`, `Credential` and `Blocking` are
/// internal and must not leak their details.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("Unauthorized")]
    TenantMismatch,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("token failure: {0}")]
    Token(#[from] TokenError),

    #[error("credential failure: {0}")]
    Credential(#[from] CredentialError),

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

impl From<DenialReason> for ManagerError {
    fn from(_: DenialReason) -> Self {
        ManagerError::TenantMismatch
    }
}

impl ManagerError {
    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        match self {
            ManagerError::Validation(_) => 400,
            ManagerError::TenantMismatch | ManagerError::InvalidPassword => 401,
            ManagerError::NotFound(_) => 404,
            ManagerError::Conflict(_) => 409,
            ManagerError::Store(_)
            | ManagerError::Token(_)
            | ManagerError::Credential(_)
            | ManagerError::Blocking(_) => 500,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}
