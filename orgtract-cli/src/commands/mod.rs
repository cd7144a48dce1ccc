//! Command implementations for the orgtract CLI
//!
//! Each command has its own module with its clap arguments and a `run`.

pub mod canonicalize;
pub mod predict;

// Re-export argument types for parser
pub use canonicalize::CanonicalizeArgs;
pub use predict::PredictArgs;
