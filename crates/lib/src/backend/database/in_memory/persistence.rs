//! Persistence operations for the InMemory backend
//!
//! Serializes the account and profile maps to a versioned JSON document.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;

use super::InMemory;
use crate::{
    Error, Result,
    account::{AccountId, AccountInfo, Profile},
    backend::BackendError,
};

/// The current persistence file format version.
const PERSISTENCE_VERSION: u8 = 1;

fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// On-disk form of the InMemory backend
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    #[serde(rename = "_v", deserialize_with = "validate_persistence_version")]
    version: u8,
    accounts: HashMap<AccountId, AccountInfo>,
    #[serde(default)]
    profiles: HashMap<AccountId, Profile>,
}

/// Saves the backend state to `path` as pretty-printed JSON.
pub(crate) async fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let serializable = SerializableStore {
        version: PERSISTENCE_VERSION,
        accounts: backend.accounts.read().await.clone(),
        profiles: backend.profiles.read().await.clone(),
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads backend state from `path`.
///
/// If the file does not exist, a new, empty `InMemory` backend is returned.
pub(crate) async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<InMemory> {
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let store: SerializableStore = serde_json::from_str(&json).map_err(|e| -> Error {
                BackendError::DeserializationFailed { source: e }.into()
            })?;
            Ok(InMemory {
                accounts: RwLock::new(store.accounts),
                profiles: RwLock::new(store.profiles),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(InMemory::new()),
        Err(e) => Err(BackendError::FileIo { source: e }.into()),
    }
}
