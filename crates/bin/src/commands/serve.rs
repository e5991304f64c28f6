//! Serve command - runs the Storefront HTTP server.

use storefront::{Storefront, backend::database::InMemory, routes::RouteTable};

use crate::backend::{IN_MEMORY_FILE, backend_label, create_backend, data_dir};
use crate::cli::ServeArgs;
use crate::server::{AppState, build_router};

/// Run the Storefront server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Create the storage backend
    let backend = create_backend(&args.backend_config).await?;
    let storefront = Storefront::open(backend);
    let routes = RouteTable::store_api()?;

    let state = AppState::new(storefront.clone(), routes);
    let app = build_router(state);

    // Bind server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, backend = %backend_label(&args.backend_config), "Server listening");

    // Print startup message
    println!(
        "Storefront server starting on http://localhost:{}",
        local_addr.port()
    );
    println!();
    println!("Available endpoints:");
    println!("  GET   /health            - Health check");
    println!("  POST  /accounts/register - Create an account and start a session");
    println!("  POST  /accounts/login    - Start a session");
    println!("  POST  /accounts/logout   - End the current session");
    println!("  GET   /accounts/me       - Current account and profile");
    println!("  PATCH /accounts/me       - Update current account and profile");
    println!("  *     /api/...           - Store API (see `storefront routes`)");
    println!();
    println!("Press Ctrl+C to shutdown");

    let json_path = data_dir(&args.backend_config).join(IN_MEMORY_FILE);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;

            // Save state on shutdown (only needed for InMemory backend)
            if let Some(in_memory_backend) =
                storefront.backend().as_any().downcast_ref::<InMemory>()
            {
                match in_memory_backend.save_to_file(&json_path).await {
                    Ok(()) => {
                        tracing::info!("Accounts saved to {}", json_path.display());
                        println!("\nAccounts saved successfully");
                    }
                    Err(e) => {
                        tracing::error!("Failed to save accounts: {e:?}");
                        eprintln!("Failed to save accounts: {e:?}");
                    }
                }
            }
        })
        .await?;

    println!("Server shut down");
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to set up SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating graceful shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
