//! CLI subcommand implementations.

pub mod account;
pub mod catalog;
pub mod permissions;
pub mod policies;
