//! Info command - shows backend, account and profile counts.

use storefront::Storefront;

use crate::backend::{backend_label, create_backend};
use crate::cli::InfoArgs;
use crate::output::OutputFormat;

/// Run the info command
pub async fn run(args: &InfoArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let backend = create_backend(&args.backend_config).await?;
    let storefront = Storefront::open(backend);

    let accounts = storefront.list_accounts().await?;
    let profiles = storefront.profile_count().await?;
    let without_profile = accounts.len().saturating_sub(profiles);

    let backend_str = backend_label(&args.backend_config);

    match format {
        OutputFormat::Human => {
            println!("Backend:     {backend_str}");
            println!("Accounts:    {}", accounts.len());
            println!("Profiles:    {profiles}");
            if without_profile > 0 {
                println!("Without profile: {without_profile}");
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "backend": backend_str,
                "accounts": accounts.len(),
                "profiles": profiles,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
