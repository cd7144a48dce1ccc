//! # orgtract-core
//!
//! Core types for the orgtract workspace: shared data structures used across all crates.
//!
//! This crate provides:
//! - **Records**: `Record`, `RecordId`, `ResolutionState`, `Outcome`
//! - **Organizations**: `OrganizationEntry` (canonical label, members, aliases)
//! - **Errors**: `Error`, `Result`
//!
//! All other crates in the workspace depend on `orgtract-core` so that the
//! resolver, the merger and the CLI agree on one record model.

pub mod entry;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use entry::OrganizationEntry;
pub use error::{Error, Result};
pub use record::{trim_label, Outcome, Record, RecordId, ResolutionState, MAX_LABEL_WRITES};
