use std::fs;

use tempfile::TempDir;

use storefront::{
    Storefront,
    account::NewAccount,
    backend::{BackendImpl, database::InMemory},
};

#[tokio::test]
async fn test_in_memory_backend_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.json");

    let backend = InMemory::new();
    let storefront = Storefront::open(Box::new(backend));
    let mut account = storefront
        .create_account(NewAccount::new("alice", "alice@example.com").with_password("pw"))
        .await
        .unwrap();
    account.profile_mut().unwrap().bio = Some("persisted".to_string());
    storefront.save_account(&mut account).await.unwrap();

    let in_memory = storefront
        .backend()
        .as_any()
        .downcast_ref::<InMemory>()
        .expect("backend should be InMemory");
    in_memory.save_to_file(&path).await.unwrap();
    assert!(path.exists());

    let loaded = InMemory::load_from_file(&path).await.unwrap();
    let reopened = Storefront::open(Box::new(loaded));

    let restored = reopened.load_account(account.id()).await.unwrap();
    assert_eq!(restored, account);
    assert_eq!(reopened.profile_count().await.unwrap(), 1);
    assert!(reopened.login("alice", Some("pw")).await.is_ok());
}

#[tokio::test]
async fn test_load_non_existent_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    let backend = InMemory::load_from_file(&path).await.unwrap();
    assert!(backend.list_accounts().await.unwrap().is_empty());
    assert!(backend.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = InMemory::load_from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        storefront::Error::Backend(ref e) if e.is_integrity_error()
    ));
}

#[tokio::test]
async fn test_load_unsupported_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    fs::write(&path, r#"{"_v": 2, "accounts": {}, "profiles": {}}"#).unwrap();

    assert!(InMemory::load_from_file(&path).await.is_err());
}
