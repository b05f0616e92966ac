//! Foundational data structures, error types, and decoder options.

pub mod error;
pub mod models;
pub mod options;
