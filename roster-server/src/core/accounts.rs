//! Account registration, login and profile

use std::sync::Arc;

use shared::models::{AuthView, ProfileUpdate, ProfileView};
use shared::util::now_millis;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::AuthTokenIssuer;
use crate::store::{AccountRecord, NewAccount, RecordStore, StoreError};

use super::error::{LifecycleError, LifecycleResult};
use super::uniqueness::{UniqueField, UniquenessGuard};

/// Emails are compared trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl From<&AccountRecord> for ProfileView {
    fn from(account: &AccountRecord) -> Self {
        ProfileView {
            email: account.email.clone(),
            name: account.name.clone(),
            user_image_uri: account.user_image_uri.clone(),
            company_name: account.company_name.clone(),
            company_image_uri: account.company_image_uri.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
    tokens: Arc<dyn AuthTokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>, tokens: Arc<dyn AuthTokenIssuer>) -> Self {
        Self { store, tokens }
    }

    pub async fn register(&self, email: &str, password: &str) -> LifecycleResult<AuthView> {
        let email = normalize_email(email);
        let password_hash =
            hash_password(password).map_err(|e| LifecycleError::PasswordHash(e.to_string()))?;

        let mut tx = self.store.begin().await?;
        UniquenessGuard::ensure_unique(tx.as_mut(), UniqueField::AccountEmail, &email, None)
            .await?;
        let account = tx
            .insert_account(&NewAccount {
                email: email.clone(),
                password_hash,
                now: now_millis(),
            })
            .await
            .map_err(|e| UniquenessGuard::translate(e, &email))?;
        tx.commit()
            .await
            .map_err(|e| UniquenessGuard::translate(e, &email))?;

        tracing::info!(account_id = account.id, email = %account.email, "Account registered");
        self.auth_view(&account)
    }

    pub async fn login(&self, email: &str, password: &str) -> LifecycleResult<AuthView> {
        let email = normalize_email(email);

        let mut tx = self.store.begin().await?;
        let account = tx
            .find_account_by_email(&email)
            .await?
            .ok_or_else(|| LifecycleError::AccountNotFound(email.clone()))?;
        tx.commit().await?;

        if !verify_password(password, &account.password_hash) {
            tracing::warn!(email = %email, "Login failed: wrong password");
            return Err(LifecycleError::InvalidCredentials);
        }

        tracing::info!(account_id = account.id, "Account logged in");
        self.auth_view(&account)
    }

    pub async fn profile(&self, account_id: i64) -> LifecycleResult<ProfileView> {
        let mut tx = self.store.begin().await?;
        let account = tx
            .find_account(account_id)
            .await?
            .ok_or_else(|| LifecycleError::AccountNotFound(account_id.to_string()))?;
        tx.commit().await?;
        Ok(ProfileView::from(&account))
    }

    /// Replace the profile fields; a changed email must still be unique
    pub async fn update_profile(
        &self,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> LifecycleResult<ProfileView> {
        let email = normalize_email(&update.email);
        let not_found = || LifecycleError::AccountNotFound(account_id.to_string());

        let mut tx = self.store.begin().await?;
        let mut account = tx.find_account(account_id).await?.ok_or_else(not_found)?;
        UniquenessGuard::ensure_unique_on_change(
            tx.as_mut(),
            UniqueField::AccountEmail,
            &account.email,
            &email,
            account.id,
        )
        .await?;

        account.email = email.clone();
        account.name = Some(update.name.clone());
        account.user_image_uri = update.user_image_uri.clone();
        account.company_name = Some(update.company_name.clone());
        account.company_image_uri = update.company_image_uri.clone();
        account.updated_at = now_millis();

        let write_error = |err: StoreError| match err {
            StoreError::StaleRow { .. } => not_found(),
            other => UniquenessGuard::translate(other, &email),
        };
        tx.update_account(&account).await.map_err(write_error)?;
        tx.commit().await.map_err(write_error)?;

        tracing::info!(account_id, "Profile updated");
        Ok(ProfileView::from(&account))
    }

    fn auth_view(&self, account: &AccountRecord) -> LifecycleResult<AuthView> {
        let token = self.tokens.issue(account.id, &account.email)?;
        Ok(AuthView {
            email: account.email.clone(),
            token,
        })
    }
}
