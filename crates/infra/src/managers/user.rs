use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use edudesk_auth::{CredentialHasher, DecodedToken, TokenIssuer};
use edudesk_school::{LoginInput, UserAccount, UserInput, UserView};

use super::{ManagerError, ManagerResult, ensure_account_available, hash_password, verify_password};
use crate::store::{Stores, UserFilter};

/// An account view plus a freshly issued long token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user: UserView,
    pub long_token: String,
}

#[derive(Clone)]
pub struct UserManager {
    stores: Stores,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl UserManager {
    pub fn new(stores: Stores, hasher: Arc<dyn CredentialHasher>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            stores,
            hasher,
            tokens,
        }
    }

    fn authenticated(&self, account: &UserAccount) -> ManagerResult<AuthenticatedUser> {
        let long_token = self.tokens.issue_long_token(&account.token_subject())?;
        Ok(AuthenticatedUser {
            user: account.view(),
            long_token,
        })
    }

    /// Opens an administrator account.
    pub async fn create_user(&self, caller: &DecodedToken, input: &UserInput) -> ManagerResult<AuthenticatedUser> {
        let fields = input.validate()?;

        if let Some(school_id) = fields.school_id {
            if self.stores.schools.find_by_id(school_id).await?.is_none() {
                return Err(ManagerError::NotFound("School not found"));
            }
        }
        ensure_account_available(&self.stores, &fields.username, &fields.email).await?;

        let password_hash = hash_password(&self.hasher, &fields.password).await?;
        let account = self
            .stores
            .users
            .create(UserAccount::new(
                fields.username,
                fields.email,
                password_hash,
                fields.role,
                fields.school_id,
                Utc::now(),
            ))
            .await?;
        tracing::info!(
            account_id = %account.id,
            role = %account.role,
            user_id = %caller.user_id,
            "user created"
        );
        self.authenticated(&account)
    }

    pub async fn login(&self, input: &LoginInput) -> ManagerResult<AuthenticatedUser> {
        let credentials = input.validate()?;

        let account = self
            .stores
            .users
            .find_one(&UserFilter::username(&credentials.username))
            .await?
            .ok_or(ManagerError::NotFound("User not found"))?;

        if !verify_password(&self.hasher, &credentials.password, &account.password_hash).await? {
            tracing::warn!(account_id = %account.id, "login refused: invalid password");
            return Err(ManagerError::InvalidPassword);
        }

        tracing::info!(account_id = %account.id, role = %account.role, "login succeeded");
        self.authenticated(&account)
    }
}
