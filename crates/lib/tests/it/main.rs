/*! Integration tests for Storefront.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - access: Tests for the access gate against the store API routes
 * - account: Tests for account creation, saving, login and the profile lifecycle
 * - backend: Tests for the BackendImpl implementations and persistence
 * - routes: Tests for route resolution and reverse lookup
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("storefront=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod access;
mod account;
mod backend;
mod helpers;
mod routes;
