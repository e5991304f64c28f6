//! SQL-based backend implementations for Storefront storage.
//!
//! ## Available Backends
//!
//! - **SQLite** (feature: `sqlite`): Embedded database
//! - **PostgreSQL** (feature: `postgres`): PostgreSQL database
//!
//! ## Architecture
//!
//! The SQL backend uses sqlx with `AnyPool` for multi-database support. The
//! one-to-one account/profile relation is enforced by the `profiles` table's
//! primary key on `account_id`.
//!
//! See [`schema`] module documentation for details on adding migrations.

mod storage;

/// Schema definition and migration system.
pub mod schema;

use std::any::Any;
#[cfg(feature = "postgres")]
use std::time::Duration;

use async_trait::async_trait;
use sqlx::AnyPool;
#[cfg(feature = "postgres")]
use sqlx::Executor;
use sqlx::any::AnyPoolOptions;

use crate::Result;
use crate::account::{AccountId, AccountInfo, Profile};
use crate::backend::{BackendError, BackendImpl};

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Converts sqlx errors to `BackendError::SqlxError` with a context message.
pub(crate) trait SqlxResultExt<T> {
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            BackendError::SqlxError {
                reason: format!("{context}: {e}"),
                source: Some(e),
            }
            .into()
        })
    }
}

/// Database backend kind for SQL dialect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Sqlite,
    Postgres,
}

/// SQL-based backend implementing `BackendImpl` using sqlx.
///
/// Supports both SQLite and PostgreSQL through sqlx's `AnyPool`. The pool handles
/// connection reuse and thread safety.
pub struct SqlxBackend {
    pool: AnyPool,
    kind: DbKind,
}

impl SqlxBackend {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get the database kind.
    pub fn kind(&self) -> DbKind {
        self.kind
    }

    pub fn is_sqlite(&self) -> bool {
        self.kind == DbKind::Sqlite
    }

    pub fn is_postgres(&self) -> bool {
        self.kind == DbKind::Postgres
    }
}

#[cfg(feature = "sqlite")]
impl SqlxBackend {
    /// Open a SQLite database at the given path, creating the file and schema if needed.
    pub async fn open_sqlite<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        // mode=rwc: read-write-create
        let url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        Self::connect_sqlite(&url).await
    }

    /// Connect to a SQLite database using a connection URL.
    pub async fn connect_sqlite(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let is_in_memory = url.contains("mode=memory");

        // An in-memory database is destroyed when its last connection closes, so the
        // pool must keep one open.
        let pool = if is_in_memory {
            AnyPoolOptions::new()
                .max_connections(5)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await
                .sql_context("Failed to connect to SQLite")?
        } else {
            AnyPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .sql_context("Failed to connect to SQLite")?
        };

        if is_in_memory {
            sqlx::query("PRAGMA busy_timeout = 5000;")
                .execute(&pool)
                .await
                .sql_context("Failed to configure SQLite")?;
        } else {
            sqlx::query(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )
            .execute(&pool)
            .await
            .sql_context("Failed to configure SQLite")?;
        }

        let backend = Self {
            pool,
            kind: DbKind::Sqlite,
        };

        schema::initialize(&backend).await?;

        Ok(backend)
    }

    /// Create an in-memory SQLite database that lives as long as this backend.
    pub async fn sqlite_in_memory() -> Result<Self> {
        // Shared cache so every pooled connection sees the same database; the unique
        // name keeps separate backends apart.
        let unique_id = uuid::Uuid::new_v4();
        let url = format!("sqlite:file:mem_{unique_id}?mode=memory&cache=shared");
        Self::connect_sqlite(&url).await
    }
}

#[cfg(feature = "postgres")]
impl SqlxBackend {
    /// Connect to a PostgreSQL database in the default (public) schema.
    pub async fn connect_postgres(url: &str) -> Result<Self> {
        Self::connect_postgres_with_schema(url, None).await
    }

    /// Connect to PostgreSQL in a freshly created schema of its own.
    ///
    /// Used by tests so parallel runs do not see each other's rows.
    pub async fn connect_postgres_isolated(url: &str) -> Result<Self> {
        // Schema names must start with a letter
        let unique_id = uuid::Uuid::new_v4().simple().to_string();
        Self::connect_postgres_with_schema(url, Some(format!("test_{unique_id}"))).await
    }

    async fn connect_postgres_with_schema(url: &str, schema_name: Option<String>) -> Result<Self> {
        sqlx::any::install_default_drivers();

        if let Some(ref schema) = schema_name {
            let temp_pool = AnyPoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
                .sql_context("Failed to connect to PostgreSQL")?;

            sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                .execute(&temp_pool)
                .await
                .sql_context(&format!("Failed to create schema {schema}"))?;

            temp_pool.close().await;
        }

        let is_isolated = schema_name.is_some();
        let mut pool_options = AnyPoolOptions::new();
        if is_isolated {
            pool_options = pool_options
                .max_connections(2)
                .acquire_timeout(Duration::from_secs(30));
        } else {
            pool_options = pool_options.max_connections(5);
        }

        let pool = pool_options
            .after_connect(move |conn, _meta| {
                let schema = schema_name.clone();
                Box::pin(async move {
                    if let Some(ref s) = schema {
                        let set_path = format!("SET search_path TO {s}");
                        conn.execute(set_path.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await
            .sql_context("Failed to connect to PostgreSQL")?;

        let backend = Self {
            pool,
            kind: DbKind::Postgres,
        };

        schema::initialize(&backend).await?;

        Ok(backend)
    }
}

#[async_trait]
impl BackendImpl for SqlxBackend {
    async fn insert_account(&self, info: &AccountInfo) -> Result<()> {
        storage::insert_account(self, info).await
    }

    async fn update_account(&self, info: &AccountInfo) -> Result<()> {
        storage::update_account(self, info).await
    }

    async fn get_account(&self, id: &AccountId) -> Result<AccountInfo> {
        storage::get_account(self, id).await
    }

    async fn find_account(&self, username: &str) -> Result<Option<AccountInfo>> {
        storage::find_account(self, username).await
    }

    async fn list_accounts(&self) -> Result<Vec<AccountInfo>> {
        storage::list_accounts(self).await
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        storage::insert_profile(self, profile).await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<()> {
        storage::save_profile(self, profile).await
    }

    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<Profile>> {
        storage::get_profile(self, account_id).await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        storage::list_profiles(self).await
    }

    fn backend_name(&self) -> &'static str {
        match self.kind {
            DbKind::Sqlite => "sqlite",
            DbKind::Postgres => "postgres",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
