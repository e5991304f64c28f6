//! Account and profile storage operations for SQL backends.

use crate::Result;
use crate::account::{AccountId, AccountInfo, AccountStatus, Profile};
use crate::backend::BackendError;

use super::{SqlxBackend, SqlxResultExt};

type AccountRow = (String, String, String, Option<String>, String, i64, i64);

type ProfileRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    i64,
    i64,
    i64,
);

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, status, created_at, updated_at";

const PROFILE_COLUMNS: &str =
    "account_id, display_name, phone, bio, newsletter_opt_in, created_at, updated_at";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn parse_account_id(value: &str) -> Result<AccountId> {
    AccountId::parse(value).map_err(|_| {
        BackendError::CorruptRecord {
            reason: format!("invalid account id '{value}'"),
        }
        .into()
    })
}

fn account_from_row(row: AccountRow) -> Result<AccountInfo> {
    let (id, username, email, password_hash, status, created_at, updated_at) = row;
    let status = AccountStatus::parse(&status).ok_or_else(|| BackendError::CorruptRecord {
        reason: format!("unknown account status '{status}' for {username}"),
    })?;

    Ok(AccountInfo {
        id: parse_account_id(&id)?,
        username,
        email,
        password_hash,
        status,
        created_at,
        updated_at,
    })
}

fn profile_from_row(row: ProfileRow) -> Result<Profile> {
    let (account_id, display_name, phone, bio, newsletter_opt_in, created_at, updated_at) = row;

    Ok(Profile {
        account_id: parse_account_id(&account_id)?,
        display_name,
        phone,
        bio,
        newsletter_opt_in: newsletter_opt_in != 0,
        created_at,
        updated_at,
    })
}

/// Insert a new account row.
pub async fn insert_account(backend: &SqlxBackend, info: &AccountInfo) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO accounts (id, username, email, password_hash, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(info.id.to_string())
    .bind(info.username.clone())
    .bind(info.email.clone())
    .bind(info.password_hash.clone())
    .bind(info.status.as_str())
    .bind(info.created_at)
    .bind(info.updated_at)
    .execute(backend.pool())
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(BackendError::AccountAlreadyExists {
            username: info.username.clone(),
        }
        .into()),
        Err(e) => Err(e).sql_context("Failed to insert account"),
    }
}

/// Overwrite an existing account row.
pub async fn update_account(backend: &SqlxBackend, info: &AccountInfo) -> Result<()> {
    let result = sqlx::query(
        "UPDATE accounts
         SET username = $1, email = $2, password_hash = $3, status = $4, updated_at = $5
         WHERE id = $6",
    )
    .bind(info.username.clone())
    .bind(info.email.clone())
    .bind(info.password_hash.clone())
    .bind(info.status.as_str())
    .bind(info.updated_at)
    .bind(info.id.to_string())
    .execute(backend.pool())
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(BackendError::AccountNotFound {
            id: info.id.clone(),
        }
        .into()),
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(BackendError::AccountAlreadyExists {
            username: info.username.clone(),
        }
        .into()),
        Err(e) => Err(e).sql_context("Failed to update account"),
    }
}

/// Get an account by id.
pub async fn get_account(backend: &SqlxBackend, id: &AccountId) -> Result<AccountInfo> {
    let row: Option<AccountRow> = sqlx::query_as(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(id.to_string())
    .fetch_optional(backend.pool())
    .await
    .sql_context("Failed to get account")?;

    match row {
        Some(row) => account_from_row(row),
        None => Err(BackendError::AccountNotFound { id: id.clone() }.into()),
    }
}

/// Get an account by username.
pub async fn find_account(backend: &SqlxBackend, username: &str) -> Result<Option<AccountInfo>> {
    let row: Option<AccountRow> = sqlx::query_as(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
    ))
    .bind(username.to_string())
    .fetch_optional(backend.pool())
    .await
    .sql_context("Failed to find account")?;

    row.map(account_from_row).transpose()
}

/// List all accounts ordered by username.
pub async fn list_accounts(backend: &SqlxBackend) -> Result<Vec<AccountInfo>> {
    let rows: Vec<AccountRow> = sqlx::query_as(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY username"
    ))
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to list accounts")?;

    rows.into_iter().map(account_from_row).collect()
}

/// Insert a new profile row. A second profile for the same account violates the
/// primary key.
pub async fn insert_profile(backend: &SqlxBackend, profile: &Profile) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO profiles
            (account_id, display_name, phone, bio, newsletter_opt_in, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(profile.account_id.to_string())
    .bind(profile.display_name.clone())
    .bind(profile.phone.clone())
    .bind(profile.bio.clone())
    .bind(i64::from(profile.newsletter_opt_in))
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(backend.pool())
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(BackendError::ProfileAlreadyExists {
            account_id: profile.account_id.clone(),
        }
        .into()),
        Err(e) => Err(e).sql_context("Failed to insert profile"),
    }
}

/// Overwrite an existing profile row. Never inserts.
pub async fn save_profile(backend: &SqlxBackend, profile: &Profile) -> Result<()> {
    let done = sqlx::query(
        "UPDATE profiles
         SET display_name = $1, phone = $2, bio = $3, newsletter_opt_in = $4, updated_at = $5
         WHERE account_id = $6",
    )
    .bind(profile.display_name.clone())
    .bind(profile.phone.clone())
    .bind(profile.bio.clone())
    .bind(i64::from(profile.newsletter_opt_in))
    .bind(profile.updated_at)
    .bind(profile.account_id.to_string())
    .execute(backend.pool())
    .await
    .sql_context("Failed to save profile")?;

    if done.rows_affected() == 0 {
        return Err(BackendError::ProfileNotFound {
            account_id: profile.account_id.clone(),
        }
        .into());
    }
    Ok(())
}

/// Get the profile for an account.
pub async fn get_profile(backend: &SqlxBackend, account_id: &AccountId) -> Result<Option<Profile>> {
    let row: Option<ProfileRow> = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE account_id = $1"
    ))
    .bind(account_id.to_string())
    .fetch_optional(backend.pool())
    .await
    .sql_context("Failed to get profile")?;

    row.map(profile_from_row).transpose()
}

/// List all profiles.
pub async fn list_profiles(backend: &SqlxBackend) -> Result<Vec<Profile>> {
    let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY account_id"
    ))
    .fetch_all(backend.pool())
    .await
    .sql_context("Failed to list profiles")?;

    rows.into_iter().map(profile_from_row).collect()
}
