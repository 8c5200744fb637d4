//! # token-inspect
//!
//! Looks up a token collection and one of its tokens on an Aptos network
//! and prints what it finds.
//!
//! The default `lookup` command always attempts both lookups and always
//! exits successfully once they have run; a failed lookup is printed under
//! an error marker instead of aborting. The other subcommands (`token-balance`,
//! `coin-balance`, `fund`, `ledger`) fail normally.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod lookup;

pub use cli::{Cli, Commands};
pub use commands::execute;
pub use error::InspectError;
pub use lookup::{LookupReport, LookupTarget, run_lookups};
