//! In-memory database backend implementation
//!
//! Suitable for testing, development, or single-process deployments where the state
//! is saved to a JSON file on shutdown.

mod persistence;

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Result;
use crate::account::{AccountId, AccountInfo, Profile};
use crate::backend::{BackendError, BackendImpl};

/// A simple in-memory backend using `HashMap`s for storage.
///
/// Persistence is available via `save_to_file` and `load_from_file`, which
/// serialize the whole state to JSON.
#[derive(Debug, Default)]
pub struct InMemory {
    pub(crate) accounts: RwLock<HashMap<AccountId, AccountInfo>>,
    /// Keyed by account id, which makes the one-to-one relation structural
    pub(crate) profiles: RwLock<HashMap<AccountId, Profile>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the entire state to a file as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads state from a JSON file.
    ///
    /// A missing file yields a new, empty backend.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

#[async_trait]
impl BackendImpl for InMemory {
    async fn insert_account(&self, info: &AccountInfo) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&info.id)
            || accounts.values().any(|a| a.username == info.username)
        {
            return Err(BackendError::AccountAlreadyExists {
                username: info.username.clone(),
            }
            .into());
        }
        accounts.insert(info.id.clone(), info.clone());
        Ok(())
    }

    async fn update_account(&self, info: &AccountInfo) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|a| a.username == info.username && a.id != info.id)
        {
            return Err(BackendError::AccountAlreadyExists {
                username: info.username.clone(),
            }
            .into());
        }
        match accounts.get_mut(&info.id) {
            Some(stored) => {
                *stored = info.clone();
                Ok(())
            }
            None => Err(BackendError::AccountNotFound {
                id: info.id.clone(),
            }
            .into()),
        }
    }

    async fn get_account(&self, id: &AccountId) -> Result<AccountInfo> {
        let accounts = self.accounts.read().await;
        accounts
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::AccountNotFound { id: id.clone() }.into())
    }

    async fn find_account(&self, username: &str) -> Result<Option<AccountInfo>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<AccountInfo>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<AccountInfo> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.account_id) {
            return Err(BackendError::ProfileAlreadyExists {
                account_id: profile.account_id.clone(),
            }
            .into());
        }
        profiles.insert(profile.account_id.clone(), profile.clone());
        Ok(())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let Some(stored) = profiles.get_mut(&profile.account_id) else {
            return Err(BackendError::ProfileNotFound {
                account_id: profile.account_id.clone(),
            }
            .into());
        };
        *stored = Profile {
            created_at: stored.created_at,
            ..profile.clone()
        };
        Ok(())
    }

    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(account_id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "inmemory"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
