//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI.

pub mod fetch;
pub mod filter;
pub mod jsonl;
