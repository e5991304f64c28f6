//! Core data types for the account system

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AccountError;

/// Unique account identifier (UUID v4).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its hyphenated string form.
    pub fn parse(value: &str) -> Result<Self, AccountError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AccountError::InvalidAccountId {
                value: value.to_string(),
            })
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account status
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Disabled,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Disabled => "disabled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AccountStatus::Active),
            "disabled" => Some(AccountStatus::Disabled),
            _ => None,
        }
    }
}

/// Account record as stored by a backend.
///
/// Passwordless accounts have `None` for `password_hash`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: AccountId,

    /// Unique username (login identifier)
    pub username: String,

    pub email: String,

    /// Argon2id hash in PHC format
    pub password_hash: Option<String>,

    pub status: AccountStatus,

    /// Creation timestamp (Unix seconds)
    pub created_at: i64,

    /// Last save timestamp (Unix seconds)
    pub updated_at: i64,
}

/// One-to-one auxiliary record extending an account.
///
/// Profiles are keyed by their account's id and are only ever created by the
/// account service when the account itself is created. The key and timestamps are
/// read-only outside this crate; the remaining fields are free to edit through
/// [`Account::profile_mut`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub(crate) account_id: AccountId,

    pub display_name: Option<String>,

    pub phone: Option<String>,

    pub bio: Option<String>,

    /// Whether the account holder wants marketing email
    pub newsletter_opt_in: bool,

    /// Creation timestamp (Unix seconds)
    pub(crate) created_at: i64,

    /// Last save timestamp (Unix seconds)
    pub(crate) updated_at: i64,
}

impl Profile {
    /// A blank profile for `account_id`.
    ///
    /// Storage-level constructor. Accounts get their profile from
    /// [`crate::Storefront::create_account`]; a profile built here is only written by
    /// calling a backend directly.
    pub fn new(account_id: AccountId, now: i64) -> Self {
        Self {
            account_id,
            display_name: None,
            phone: None,
            bio: None,
            newsletter_opt_in: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The account this profile belongs to.
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

/// Input for [`crate::Storefront::create_account`].
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    /// `None` creates a passwordless account
    pub password: Option<String>,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// An account together with its attached profile reference.
///
/// The handle returned by account creation always has its profile attached. Handles
/// loaded for accounts that predate profile creation may have none; saving such a
/// handle persists the account alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    info: AccountInfo,
    profile: Option<Profile>,
}

impl Account {
    pub(crate) fn from_parts(info: AccountInfo, profile: Option<Profile>) -> Self {
        Self { info, profile }
    }

    pub fn id(&self) -> &AccountId {
        &self.info.id
    }

    pub fn username(&self) -> &str {
        &self.info.username
    }

    pub fn email(&self) -> &str {
        &self.info.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.info.email = email.into();
    }

    pub fn status(&self) -> AccountStatus {
        self.info.status
    }

    pub fn set_status(&mut self, status: AccountStatus) {
        self.info.status = status;
    }

    pub fn is_active(&self) -> bool {
        self.info.status == AccountStatus::Active
    }

    pub fn has_password(&self) -> bool {
        self.info.password_hash.is_some()
    }

    pub fn created_at(&self) -> i64 {
        self.info.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.info.updated_at
    }

    /// The stored account record.
    pub fn info(&self) -> &AccountInfo {
        &self.info
    }

    pub(crate) fn info_mut(&mut self) -> &mut AccountInfo {
        &mut self.info
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Mutable access to the attached profile. Changes are persisted on the next
    /// [`crate::Storefront::save_account`].
    pub fn profile_mut(&mut self) -> Option<&mut Profile> {
        self.profile.as_mut()
    }

    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Detach the profile reference from this handle.
    pub fn take_profile(&mut self) -> Option<Profile> {
        self.profile.take()
    }

    pub(crate) fn attach_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }
}
