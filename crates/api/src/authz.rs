//! API-side authorization gate.
//!
//! Runs once per request before any manager logic: verifies the long token,
//! then asks the evaluator whether the token's role may invoke the requested
//! (resource, action). Pure apart from logging, so it is tested without HTTP.

use std::sync::Arc;

use edudesk_auth::{
    AuthorizationRequest, DecodedToken, DenialReason, PermissionTable, TokenVerifier, evaluate,
};

/// A refused request: the reason plus the message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDenial {
    pub reason: DenialReason,
    pub message: String,
}

impl GateDenial {
    fn unauthorized(reason: DenialReason) -> Self {
        Self {
            reason,
            message: "unauthorized".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RequestGate {
    verifier: Arc<dyn TokenVerifier>,
    table: Arc<PermissionTable>,
}

impl RequestGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, table: Arc<PermissionTable>) -> Self {
        Self { verifier, table }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// Admit or refuse one request.
    ///
    /// `token` is the raw `token` header, `resource` and `action` the route's
    /// module and operation segments.
    pub fn admit(
        &self,
        token: Option<&str>,
        resource: &str,
        action: &str,
    ) -> Result<DecodedToken, GateDenial> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            tracing::warn!(stage = "token", resource, action, "request refused: missing token");
            return Err(GateDenial::unauthorized(DenialReason::MissingToken));
        };

        let decoded = match self.verifier.verify_long_token(token) {
            Ok(Some(decoded)) => decoded,
            Ok(None) => {
                tracing::warn!(stage = "verify", resource, action, "request refused: token carries no identity");
                return Err(GateDenial::unauthorized(DenialReason::VerificationFailed));
            }
            Err(e) => {
                tracing::debug!(error = %e, "long token verification failed");
                tracing::warn!(stage = "verify", resource, action, "request refused: token verification failed");
                return Err(GateDenial::unauthorized(DenialReason::VerificationFailed));
            }
        };

        let request = AuthorizationRequest::new(&decoded.role, resource, action);
        match evaluate(&self.table, &request).into_result() {
            Ok(()) => Ok(decoded),
            Err(reason) => {
                let message = match reason {
                    DenialReason::UnknownRole => {
                        format!("unauthorized to get permissions for {}", decoded.role)
                    }
                    _ => format!("unauthorized to access {resource}:{action} from {}", decoded.role),
                };
                tracing::warn!(
                    stage = "authorize",
                    user_id = %decoded.user_id,
                    role = %decoded.role,
                    resource,
                    action,
                    %reason,
                    "request refused"
                );
                Err(GateDenial { reason, message })
            }
        }
    }
}
