//! Startup seeding.

use std::sync::Arc;

use chrono::Utc;

use edudesk_auth::{CredentialHasher, Role};
use edudesk_school::UserAccount;

use crate::managers::{ManagerResult, hash_password};
use crate::store::{Stores, UserFilter};

/// Credentials of the bootstrap super admin.
#[derive(Clone, PartialEq, Eq)]
pub struct SuperAdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for SuperAdminSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SuperAdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Ensure the bootstrap super admin exists. Safe to run on every start.
pub async fn seed_super_admin(
    stores: &Stores,
    hasher: &Arc<dyn CredentialHasher>,
    seed: &SuperAdminSeed,
) -> ManagerResult<SeedOutcome> {
    if stores
        .users
        .find_one(&UserFilter::username(&seed.username))
        .await?
        .is_some()
    {
        tracing::info!(username = %seed.username, "super admin already present");
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let account = UserAccount::new(
        seed.username.clone(),
        seed.email.clone(),
        hash_password(hasher, &seed.password).await?,
        Role::SuperAdmin,
        None,
        Utc::now(),
    );
    let account = stores.users.create(account).await?;
    tracing::info!(account_id = %account.id, username = %account.username, "super admin seeded");
    Ok(SeedOutcome::Created)
}
