//! Shared test fixtures for TeamForge crates.
//!
//! This crate provides participant builders, scenario pools and counter-store
//! doubles. It depends only on `teamforge-core` so every crate can use it as
//! a dev-dependency.
//!
//! - [`participant`] - Participant builders and team invariant checks
//! - [`scenario`] - Ready-made candidate pools
//! - [`store`] - Counter stores that can be observed or made to fail
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! teamforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use teamforge_test::scenario::{scenario_a, uniform_pool};
//! use teamforge_test::participant::assert_team_invariants;
//! ```

pub mod participant;
pub mod scenario;
pub mod store;

// Re-export commonly used fixtures at crate root for convenience
pub use participant::{assert_team_invariants, balanced, leader, thinker};
pub use scenario::{broad_pool, scenario_a, scenario_b, uniform_pool};
pub use store::FlakyCounterStore;
