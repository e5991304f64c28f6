//! Account/profile lifecycle
//!
//! Runs after every account save and keeps the one-to-one account/profile relation
//! intact. It is called explicitly by [`crate::Storefront`] rather than subscribed to
//! a persistence event, so every path that saves an account goes through it.
//!
//! Two steps run in a fixed order:
//!
//! 1. [`ensure_profile`]: on [`SaveEvent::Created`] only, insert the account's profile
//!    and attach it to the handle.
//! 2. [`sync_profile`]: on every save, persist the attached profile if there is one.
//!
//! Because step 1 attaches the profile it creates, step 2 saves it in the same cycle.
//! A handle without a profile is not an error; step 2 is then a no-op. Step 2 only
//! ever overwrites the handle's own profile row. Storage failures propagate unchanged.

use crate::Result;
use crate::backend::BackendImpl;

use super::errors::AccountError;
use super::types::{Account, AccountId, Profile};

/// Which kind of account save just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    /// The account row was just inserted
    Created,
    /// An existing account row was overwritten
    Updated,
}

/// Insert the profile for a newly created account and attach it.
///
/// Does nothing for [`SaveEvent::Updated`], so repeated saves never create a second
/// profile. A duplicate insert surfaces the backend's uniqueness error.
pub async fn ensure_profile(
    backend: &dyn BackendImpl,
    account: &mut Account,
    event: SaveEvent,
    now: i64,
) -> Result<()> {
    if event != SaveEvent::Created {
        return Ok(());
    }

    let profile = Profile::new(account.id().clone(), now);
    backend.insert_profile(&profile).await?;
    tracing::debug!(account = %account.id(), "Created profile");

    account.attach_profile(profile);
    Ok(())
}

/// Persist the attached profile's current state, if a profile is attached.
///
/// The write always lands on the handle's own account: a profile keyed to any other
/// account is rejected with [`AccountError::ProfileMismatch`] before anything is
/// stored, and the backend only overwrites an existing profile row.
pub async fn sync_profile(backend: &dyn BackendImpl, account: &mut Account, now: i64) -> Result<()> {
    let account_id = account.id().clone();
    let Some(profile) = account.profile_mut() else {
        tracing::trace!(account = %account_id, "No profile attached, skipping sync");
        return Ok(());
    };

    check_owner(&account_id, profile)?;

    profile.updated_at = now;
    backend.save_profile(profile).await?;
    tracing::debug!(account = %account_id, "Saved profile");
    Ok(())
}

/// Reject an attached profile that belongs to another account.
pub(crate) fn check_attached_profile(account: &Account) -> Result<()> {
    match account.profile() {
        Some(profile) => check_owner(account.id(), profile),
        None => Ok(()),
    }
}

fn check_owner(account_id: &AccountId, profile: &Profile) -> Result<()> {
    if profile.account_id() == account_id {
        return Ok(());
    }
    Err(AccountError::ProfileMismatch {
        account: account_id.to_string(),
        profile_account: profile.account_id().to_string(),
    }
    .into())
}

/// Run the full lifecycle for one account save.
pub async fn after_save(
    backend: &dyn BackendImpl,
    account: &mut Account,
    event: SaveEvent,
    now: i64,
) -> Result<()> {
    ensure_profile(backend, account, event, now).await?;
    sync_profile(backend, account, now).await
}
