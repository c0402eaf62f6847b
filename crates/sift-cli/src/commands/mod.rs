//! CLI command implementations for sift.

pub mod search;
