//! Access gate tests
//!
//! - policy: decision table over operation kind and requester
//! - store_api: the gate applied to resolved store API routes, including the account
//!   walkthrough from creation to gated writes

mod policy;
mod store_api;
