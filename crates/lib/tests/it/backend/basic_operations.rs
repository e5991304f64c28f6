use storefront::{
    account::{AccountId, AccountInfo, AccountStatus, Profile},
    backend::BackendImpl,
};

use crate::helpers::test_backend;

fn account(username: &str) -> AccountInfo {
    AccountInfo {
        id: AccountId::generate(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: None,
        status: AccountStatus::Active,
        created_at: 100,
        updated_at: 100,
    }
}

fn profile(account_id: &AccountId) -> Profile {
    Profile::new(account_id.clone(), 100)
}

#[tokio::test]
async fn test_account_roundtrip() {
    let backend = test_backend().await;
    let mut info = account("alice");
    info.password_hash = Some("$argon2id$stub".to_string());
    backend.insert_account(&info).await.unwrap();

    assert_eq!(backend.get_account(&info.id).await.unwrap(), info);
    assert_eq!(backend.find_account("alice").await.unwrap(), Some(info.clone()));
    assert_eq!(backend.find_account("bob").await.unwrap(), None);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let backend = test_backend().await;
    backend.insert_account(&account("alice")).await.unwrap();

    let err = backend.insert_account(&account("alice")).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(backend.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_account() {
    let backend = test_backend().await;
    let mut info = account("alice");
    backend.insert_account(&info).await.unwrap();

    info.email = "new@example.com".to_string();
    info.status = AccountStatus::Disabled;
    info.updated_at = 200;
    backend.update_account(&info).await.unwrap();

    let stored = backend.get_account(&info.id).await.unwrap();
    assert_eq!(stored.email, "new@example.com");
    assert_eq!(stored.status, AccountStatus::Disabled);
    assert_eq!(stored.updated_at, 200);
    assert_eq!(stored.created_at, 100);
}

#[tokio::test]
async fn test_update_to_taken_username_rejected() {
    let backend = test_backend().await;
    backend.insert_account(&account("alice")).await.unwrap();
    let mut bob = account("bob");
    backend.insert_account(&bob).await.unwrap();

    bob.username = "alice".to_string();
    let err = backend.update_account(&bob).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_missing_account() {
    let backend = test_backend().await;
    let info = account("ghost");

    assert!(backend.get_account(&info.id).await.unwrap_err().is_not_found());
    assert!(backend.update_account(&info).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_profile_is_one_to_one() {
    let backend = test_backend().await;
    let info = account("alice");
    backend.insert_account(&info).await.unwrap();

    backend.insert_profile(&profile(&info.id)).await.unwrap();
    let err = backend.insert_profile(&profile(&info.id)).await.unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(backend.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_profile_overwrites() {
    let backend = test_backend().await;
    let info = account("alice");
    backend.insert_account(&info).await.unwrap();
    backend.insert_profile(&profile(&info.id)).await.unwrap();

    let mut edited = Profile::new(info.id.clone(), 300);
    edited.bio = Some("hi".to_string());
    edited.newsletter_opt_in = true;
    backend.save_profile(&edited).await.unwrap();

    let stored = backend.get_profile(&info.id).await.unwrap().unwrap();
    assert_eq!(stored.bio.as_deref(), Some("hi"));
    assert!(stored.newsletter_opt_in);
    assert_eq!(stored.updated_at(), 300);
    assert_eq!(stored.created_at(), 100);
    assert_eq!(backend.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_profile_never_inserts() {
    let backend = test_backend().await;
    let info = account("alice");
    backend.insert_account(&info).await.unwrap();

    let err = backend.save_profile(&profile(&info.id)).await.unwrap_err();
    assert!(err.is_not_found());

    let stray = Profile::new(AccountId::generate(), 100);
    let err = backend.save_profile(&stray).await.unwrap_err();
    assert!(err.is_not_found());

    assert!(backend.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_profile_absent() {
    let backend = test_backend().await;
    assert_eq!(backend.get_profile(&AccountId::generate()).await.unwrap(), None);
}

#[tokio::test]
async fn test_backend_name() {
    let backend: Box<dyn BackendImpl> = test_backend().await;
    assert!(["inmemory", "sqlite", "postgres"].contains(&backend.backend_name()));
}
