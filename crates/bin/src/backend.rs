//! Backend creation and utility functions.

use std::path::PathBuf;

use storefront::backend::{
    BackendImpl,
    database::{InMemory, SqlxBackend},
};

use crate::cli::{Backend, BackendConfig};

/// File name of the SQLite database inside the data directory
pub const SQLITE_FILE: &str = "storefront.db";

/// File name of the in-memory backend's JSON snapshot inside the data directory
pub const IN_MEMORY_FILE: &str = "storefront.json";

/// Redact credentials from a PostgreSQL connection URL for safe logging
pub fn redact_postgres_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        "postgres://***@<unparsable-url>".to_string()
    }
}

/// Data directory from configuration, defaulting to the working directory
pub fn data_dir(config: &BackendConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Human-readable description of the configured backend
pub fn backend_label(config: &BackendConfig) -> String {
    let dir = data_dir(config);
    match config.backend {
        Backend::Sqlite => format!("sqlite ({})", dir.join(SQLITE_FILE).display()),
        Backend::Postgres => match &config.postgres_url {
            Some(url) => format!("postgres ({})", redact_postgres_url(url)),
            None => "postgres".to_string(),
        },
        Backend::Inmemory => format!("inmemory ({})", dir.join(IN_MEMORY_FILE).display()),
    }
}

/// Create the appropriate backend based on configuration
pub async fn create_backend(
    config: &BackendConfig,
) -> Result<Box<dyn BackendImpl>, Box<dyn std::error::Error>> {
    let data_dir = data_dir(config);

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    match config.backend {
        Backend::Sqlite => {
            let db_path = data_dir.join(SQLITE_FILE);
            tracing::info!("Using SQLite backend at {}", db_path.display());
            Ok(Box::new(SqlxBackend::open_sqlite(&db_path).await?))
        }
        Backend::Postgres => {
            let url = config
                .postgres_url
                .as_ref()
                .ok_or("PostgreSQL backend requires --postgres-url or STOREFRONT_POSTGRES_URL")?;

            let display_url = redact_postgres_url(url);
            tracing::info!("Connecting to PostgreSQL backend at {}", display_url);

            match SqlxBackend::connect_postgres(url).await {
                Ok(backend) => {
                    tracing::info!("Connected to PostgreSQL successfully");
                    Ok(Box::new(backend))
                }
                Err(e) => {
                    Err(format!("Failed to connect to PostgreSQL at {display_url}: {e}").into())
                }
            }
        }
        Backend::Inmemory => {
            let json_path = data_dir.join(IN_MEMORY_FILE);
            tracing::info!(
                "Using in-memory backend with persistence at {}",
                json_path.display()
            );
            // A missing file starts empty; an unreadable one is an error so the
            // shutdown save cannot overwrite it
            let backend = InMemory::load_from_file(&json_path).await?;
            Ok(Box::new(backend))
        }
    }
}
