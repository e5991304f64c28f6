use std::sync::Arc;

use storefront::{
    Clock, FixedClock, Storefront,
    account::{Account, AccountId, AccountInfo, AccountStatus, NewAccount},
    backend::{BackendImpl, database::InMemory},
};

// ==========================
// CORE TEST FACTORIES
// ==========================
// Single point of change for backend matrix testing via the TEST_BACKEND env var.

/// Creates a test backend based on TEST_BACKEND env var.
///
/// Supported values:
/// - "inmemory" or unset: InMemory backend (default)
/// - "sqlite": SQLite in-memory backend (requires `sqlite` feature)
/// - "postgres": PostgreSQL backend (requires `postgres` feature and TEST_POSTGRES_URL)
///
/// ```bash
/// TEST_BACKEND=sqlite cargo test
/// TEST_BACKEND=postgres TEST_POSTGRES_URL="postgres://localhost/storefront_test" cargo test
/// ```
pub async fn test_backend() -> Box<dyn BackendImpl> {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("sqlite") => {
            #[cfg(feature = "sqlite")]
            {
                use storefront::backend::database::SqlxBackend;
                Box::new(
                    SqlxBackend::sqlite_in_memory()
                        .await
                        .expect("Failed to create SQLite backend"),
                )
            }
            #[cfg(not(feature = "sqlite"))]
            {
                panic!("TEST_BACKEND=sqlite requires the 'sqlite' feature to be enabled")
            }
        }
        Ok("postgres") => {
            #[cfg(feature = "postgres")]
            {
                use storefront::backend::database::SqlxBackend;
                let url = std::env::var("TEST_POSTGRES_URL")
                    .unwrap_or_else(|_| "postgres://localhost/storefront_test".to_string());
                Box::new(
                    SqlxBackend::connect_postgres_isolated(&url)
                        .await
                        .expect("Failed to connect to PostgreSQL"),
                )
            }
            #[cfg(not(feature = "postgres"))]
            {
                panic!("TEST_BACKEND=postgres requires the 'postgres' feature to be enabled")
            }
        }
        Ok("inmemory") | Ok("") | Err(_) => Box::new(InMemory::new()),
        Ok(other) => {
            panic!("Unknown TEST_BACKEND value: {other}. Supported: inmemory, sqlite, postgres")
        }
    }
}

/// Creates a Storefront over the test backend.
///
/// Returns the [`FixedClock`] too so tests can move time forward.
pub async fn test_storefront() -> (Storefront, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::default());
    let storefront = Storefront::open_with_clock(test_backend().await, clock.clone());
    (storefront, clock)
}

/// Creates a passwordless account with a derived email address.
pub async fn create_account(storefront: &Storefront, username: &str) -> Account {
    storefront
        .create_account(NewAccount::new(username, format!("{username}@example.com")))
        .await
        .expect("Failed to create account")
}

/// Writes an account row directly to the backend, bypassing the account service.
///
/// Models accounts stored before profiles existed: no profile row is created.
pub async fn insert_legacy_account(storefront: &Storefront, username: &str) -> AccountId {
    let now = storefront.clock().now_secs();
    let info = AccountInfo {
        id: AccountId::generate(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: None,
        status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
    };
    storefront
        .backend()
        .insert_account(&info)
        .await
        .expect("Failed to insert legacy account");
    info.id
}

/// Number of stored profiles belonging to `id`.
pub async fn profiles_for(storefront: &Storefront, id: &AccountId) -> usize {
    storefront
        .backend()
        .list_profiles()
        .await
        .expect("Failed to list profiles")
        .iter()
        .filter(|p| p.account_id() == id)
        .count()
}
