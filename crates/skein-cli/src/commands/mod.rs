//! CLI command implementations.

pub mod common;
pub mod layout;
pub mod route;
pub mod version;
