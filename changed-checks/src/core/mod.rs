//! Deterministic, pure logic for selecting and planning checks.
//!
//! Core modules must be free of I/O side effects. Filesystem lookups are passed
//! in as predicates so every function here is testable in isolation.

pub mod change_set;
pub mod classifier;
pub mod counterpart;
pub mod plan;
pub mod profile;
pub mod types;
