//! Application service for accounts.
//!
//! [`Storefront`] owns the storage backend and is the only code path that creates or
//! saves accounts. Every save runs the profile lifecycle
//! ([`crate::account::lifecycle`]) immediately after the account row is written, so an
//! account cannot be created without its profile.

use std::sync::Arc;

use crate::{
    Clock, Result, SystemClock,
    account::{
        Account, AccountError, AccountId, AccountInfo, AccountStatus, NewAccount, SaveEvent,
        crypto, lifecycle,
    },
    backend::BackendImpl,
};

/// Maximum username length, in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Account service over a storage backend.
///
/// Cheap to clone; clones share the backend and clock.
#[derive(Clone)]
pub struct Storefront {
    backend: Arc<dyn BackendImpl>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("backend", &self.backend.backend_name())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Storefront {
    /// Open a Storefront over `backend` using the system clock.
    pub fn open(backend: Box<dyn BackendImpl>) -> Self {
        Self::open_with_clock(backend, Arc::new(SystemClock))
    }

    /// Open with an explicit clock.
    ///
    /// Tests pass a [`crate::FixedClock`] here to control timestamps.
    pub fn open_with_clock(backend: Box<dyn BackendImpl>, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(backend = backend.backend_name(), "Opening storefront");
        Self {
            backend: Arc::from(backend),
            clock,
        }
    }

    pub fn backend(&self) -> &dyn BackendImpl {
        self.backend.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // === Account lifecycle ===

    /// Create an account and its profile.
    ///
    /// The returned handle has its profile attached. Fails with
    /// [`AccountError::UsernameAlreadyExists`] if the username is taken.
    pub async fn create_account(&self, new: NewAccount) -> Result<Account> {
        validate_username(&new.username)?;
        validate_email(&new.email)?;

        if self.backend.find_account(&new.username).await?.is_some() {
            return Err(AccountError::UsernameAlreadyExists {
                username: new.username,
            }
            .into());
        }

        let password_hash = new.password.as_deref().map(crypto::hash_password).transpose()?;

        let now = self.clock.now_secs();
        let info = AccountInfo {
            id: AccountId::generate(),
            username: new.username,
            email: new.email,
            password_hash,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.backend.insert_account(&info).await?;
        tracing::info!(username = %info.username, account = %info.id, "Created account");

        let mut account = Account::from_parts(info, None);
        lifecycle::after_save(self.backend.as_ref(), &mut account, SaveEvent::Created, now)
            .await?;

        Ok(account)
    }

    /// Save an existing account, then its attached profile.
    ///
    /// Never creates a profile. A handle with no profile attached saves the account
    /// row alone. A handle carrying another account's profile is rejected before
    /// anything is written.
    pub async fn save_account(&self, account: &mut Account) -> Result<()> {
        validate_username(account.username())?;
        validate_email(account.email())?;
        lifecycle::check_attached_profile(account)?;

        let now = self.clock.now_secs();
        account.info_mut().updated_at = now;
        self.backend.update_account(account.info()).await?;
        tracing::debug!(account = %account.id(), "Saved account");

        lifecycle::after_save(self.backend.as_ref(), account, SaveEvent::Updated, now).await
    }

    /// Replace an account's password.
    ///
    /// `None` makes the account passwordless. Takes effect on the next
    /// [`Storefront::save_account`].
    pub fn set_password(&self, account: &mut Account, password: Option<&str>) -> Result<()> {
        account.info_mut().password_hash = password.map(crypto::hash_password).transpose()?;
        Ok(())
    }

    // === Lookup ===

    /// Load an account by id, with its profile attached if one exists.
    pub async fn load_account(&self, id: &AccountId) -> Result<Account> {
        let info = match self.backend.get_account(id).await {
            Ok(info) => info,
            Err(e) if e.is_not_found() => {
                return Err(AccountError::AccountNotFound {
                    account: id.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };
        let profile = self.backend.get_profile(id).await?;
        Ok(Account::from_parts(info, profile))
    }

    /// Load an account by username, with its profile attached if one exists.
    pub async fn find_account(&self, username: &str) -> Result<Option<Account>> {
        let Some(info) = self.backend.find_account(username).await? else {
            return Ok(None);
        };
        let profile = self.backend.get_profile(&info.id).await?;
        Ok(Some(Account::from_parts(info, profile)))
    }

    /// All account records, ordered by username.
    pub async fn list_accounts(&self) -> Result<Vec<AccountInfo>> {
        self.backend.list_accounts().await
    }

    /// Number of stored profiles.
    pub async fn profile_count(&self) -> Result<usize> {
        Ok(self.backend.list_profiles().await?.len())
    }

    // === Authentication ===

    /// Check credentials and return the account.
    ///
    /// Password-protected accounts require the matching password. Passwordless
    /// accounts log in with `None` and reject any password.
    pub async fn login(&self, username: &str, password: Option<&str>) -> Result<Account> {
        let account =
            self.find_account(username)
                .await?
                .ok_or_else(|| AccountError::AccountNotFound {
                    account: username.to_string(),
                })?;

        match (&account.info().password_hash, password) {
            (Some(hash), Some(password)) => crypto::verify_password(password, hash)?,
            (Some(_), None) => {
                return Err(AccountError::PasswordRequired {
                    username: username.to_string(),
                }
                .into());
            }
            (None, Some(_)) => return Err(AccountError::InvalidPassword.into()),
            (None, None) => {}
        }

        if account.status() == AccountStatus::Disabled {
            return Err(AccountError::AccountDisabled {
                username: username.to_string(),
            }
            .into());
        }

        tracing::info!(username, "Account logged in");
        Ok(account)
    }
}

fn validate_username(username: &str) -> Result<()> {
    let invalid = |reason: &str| -> crate::Error {
        AccountError::InvalidUsername {
            username: username.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if username.is_empty() {
        return Err(invalid("username cannot be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(invalid("username is longer than 150 characters"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(invalid(
            "only letters, digits and @/./+/-/_ characters are allowed",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AccountError::InvalidEmail {
            email: email.to_string(),
        }
        .into())
    }
}
