//! Account service tests
//!
//! - lifecycle: profile creation and sync on account saves
//! - login: credential checks
//! - management: creation rules, lookup and listing
