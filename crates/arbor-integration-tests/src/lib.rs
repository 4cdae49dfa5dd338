//! Integration test crate for the Arbor economic core.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end vault flows across multiple workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p arbor-integration-tests
//! ```
