use std::sync::Arc;

use edudesk_auth::{Argon2Hasher, CredentialHasher, Hs256LongTokens, PermissionTable, TableError};
use edudesk_infra::{ManagerResult, Managers, SeedOutcome, Stores, seed_super_admin};

use crate::config::AppConfig;

/// Everything handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub managers: Managers,
}

/// Wiring shared by the router and the gate.
pub struct Wiring {
    pub services: AppServices,
    pub stores: Stores,
    pub tokens: Arc<Hs256LongTokens>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub table: Arc<PermissionTable>,
}

/// Build the in-memory service graph. Fails if the permission table grants an
/// operation no route serves.
pub fn build_services(config: &AppConfig) -> Result<Wiring, TableError> {
    let table = PermissionTable::standard();
    table.validate()?;

    let stores = Stores::in_memory();
    let tokens = Arc::new(Hs256LongTokens::new(config.jwt_secret.as_bytes(), config.long_token_ttl));
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);
    let managers = Managers::new(stores.clone(), hasher.clone(), tokens.clone());

    Ok(Wiring {
        services: AppServices { managers },
        stores,
        tokens,
        hasher,
        table: Arc::new(table),
    })
}

/// Seed the bootstrap super admin when configured.
pub async fn seed(config: &AppConfig, wiring: &Wiring) -> ManagerResult<Option<SeedOutcome>> {
    match &config.super_admin {
        Some(seed) => Ok(Some(
            seed_super_admin(&wiring.stores, &wiring.hasher, seed).await?,
        )),
        None => Ok(None),
    }
}
