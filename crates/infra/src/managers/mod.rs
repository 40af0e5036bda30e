//! Entity managers: the CRUD operations behind each `/api/{module}` route.
//!
//! Every operation runs in the same order: tenant guard on supplied ids,
//! validation, existence and uniqueness checks, tenant guard on the existing
//! record, then the mutation. Permission checks are not repeated here; the
//! request gate has already admitted the caller.

pub mod classroom;
pub mod error;
pub mod school;
pub mod student;
pub mod user;

use std::sync::Arc;

use edudesk_auth::{
    CredentialHasher, DecodedToken, TenantScoped, TokenIssuer, guard_record, guard_school,
};
use edudesk_core::SchoolId;

use crate::store::{Stores, UserFilter};

pub use classroom::ClassroomManager;
pub use error::{ManagerError, ManagerResult};
pub use school::SchoolManager;
pub use student::StudentManager;
pub use user::{AuthenticatedUser, UserManager};

#[derive(Clone)]
pub struct Managers {
    pub schools: SchoolManager,
    pub classrooms: ClassroomManager,
    pub students: StudentManager,
    pub users: UserManager,
}

impl Managers {
    pub fn new(
        stores: Stores,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            schools: SchoolManager::new(stores.clone()),
            classrooms: ClassroomManager::new(stores.clone()),
            students: StudentManager::new(stores.clone(), hasher.clone()),
            users: UserManager::new(stores, hasher, tokens),
        }
    }
}

/// Best-effort read of a school id the caller supplied, before validation.
/// Anything unparseable counts as absent, which a school admin never passes.
fn supplied_school(raw: Option<&str>) -> Option<SchoolId> {
    raw.and_then(|r| r.trim().parse().ok())
}

fn check_school(caller: &DecodedToken, target: Option<SchoolId>) -> ManagerResult<()> {
    guard_school(caller, target).map_err(|reason| {
        tracing::warn!(
            user_id = %caller.user_id,
            caller_school = ?caller.school_id,
            target_school = ?target,
            %reason,
            "tenant guard refused supplied school"
        );
        ManagerError::from(reason)
    })
}

fn check_record<R: TenantScoped>(caller: &DecodedToken, record: &R) -> ManagerResult<()> {
    guard_record(caller, record).map_err(|reason| {
        tracing::warn!(
            user_id = %caller.user_id,
            caller_school = ?caller.school_id,
            record_school = %record.tenant_id(),
            %reason,
            "tenant guard refused record"
        );
        ManagerError::from(reason)
    })
}

/// Argon2 is CPU-bound; keep it off the async workers.
pub(crate) async fn hash_password(hasher: &Arc<dyn CredentialHasher>, password: &str) -> ManagerResult<String> {
    let hasher = Arc::clone(hasher);
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ManagerError::Blocking(e.to_string()))?
        .map_err(ManagerError::from)
}

pub(crate) async fn verify_password(hasher: &Arc<dyn CredentialHasher>, password: &str, hash: &str) -> ManagerResult<bool> {
    let hasher = Arc::clone(hasher);
    let (password, hash) = (password.to_owned(), hash.to_owned());
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ManagerError::Blocking(e.to_string()))
}

/// Username and email must both be unused before an account is opened.
async fn ensure_account_available(stores: &Stores, username: &str, email: &str) -> ManagerResult<()> {
    if stores.users.find_one(&UserFilter::username(username)).await?.is_some()
        || stores.users.find_one(&UserFilter::email(email)).await?.is_some()
    {
        return Err(ManagerError::Conflict("User already exists"));
    }
    Ok(())
}
