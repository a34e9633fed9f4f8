//! Account registration and credential verification.
//!
//! # Responsibility
//! - Validate registration input before touching storage.
//! - Hash passwords and persist accounts.
//! - Establish actor identity from username + password.
//!
//! # Invariants
//! - Username uniqueness is decided by the store's UNIQUE index alone; its
//!   conflict signal is the only source of `CoreError::Conflict`.
//! - Unknown usernames and wrong passwords yield the same
//!   `CoreError::Authentication` after comparable work.
//! - Plaintext passwords and hashes are never logged.

use crate::error::{CoreError, CoreResult, EntityRef};
use crate::model::account::{Account, Registration};
use crate::model::ids::AccountId;
use crate::repo::account_repo::{AccountRepository, NewAccountRecord};
use crate::service::password::CredentialHasher;
use log::{error, info};

/// Credential lifecycle service over an account repository.
pub struct CredentialStore<R: AccountRepository> {
    repo: R,
    hasher: CredentialHasher,
}

impl<R: AccountRepository> CredentialStore<R> {
    pub fn new(repo: R, hasher: CredentialHasher) -> Self {
        Self { repo, hasher }
    }

    /// Registers a new account and returns its id.
    ///
    /// # Errors
    /// - `Validation` when any field violates its limits.
    /// - `Conflict("username")` when the username is taken.
    /// - `StorageInvariant` when the store does not echo the inserted id.
    pub fn register(&self, username: &str, password: &str, fullname: &str) -> CoreResult<AccountId> {
        let registration = Registration {
            username,
            password,
            fullname,
        };
        if let Err(err) = registration.validate() {
            info!(
                "event=account_register module=credentials status=rejected error_code=validation field={}",
                err.field()
            );
            return Err(err.into());
        }

        let password_hash = self.hasher.hash(password)?;
        let id = AccountId::generate();
        let inserted = self
            .repo
            .insert_account(NewAccountRecord {
                id: &id,
                username,
                password_hash: &password_hash,
                fullname,
            })
            .map_err(|err| {
                let err = CoreError::from(err);
                info!(
                    "event=account_register module=credentials status=rejected error={}",
                    err
                );
                err
            })?;

        if inserted.as_ref() != Some(&id) {
            error!(
                "event=account_register module=credentials status=error error_code=insert_unconfirmed account_id={}",
                id
            );
            return Err(CoreError::StorageInvariant(
                "account insert was not confirmed by the store",
            ));
        }

        info!(
            "event=account_register module=credentials status=ok account_id={}",
            id
        );
        Ok(id)
    }

    /// Verifies a username/password pair and returns the account id.
    pub fn verify_credential(&self, username: &str, password: &str) -> CoreResult<AccountId> {
        let Some(credential) = self.repo.find_credential(username)? else {
            self.hasher.verify_decoy(password);
            info!("event=credential_verify module=credentials status=rejected");
            return Err(CoreError::Authentication);
        };

        if !self.hasher.verify(password, &credential.password_hash) {
            info!("event=credential_verify module=credentials status=rejected");
            return Err(CoreError::Authentication);
        }

        Ok(credential.id)
    }

    /// Gets the public view of one account.
    pub fn get_account(&self, id: &AccountId) -> CoreResult<Account> {
        self.repo
            .get_account(id)?
            .ok_or_else(|| CoreError::NotFound(EntityRef::Account(id.clone())))
    }

    /// Case-sensitive substring search over usernames.
    pub fn find_accounts_by_username_substring(&self, fragment: &str) -> CoreResult<Vec<Account>> {
        Ok(self.repo.search_by_username(fragment)?)
    }
}
