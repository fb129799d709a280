//! CLI command implementations.

pub mod common;
pub mod decompose;
pub mod gadgets;
pub mod tag;
