//! Folio CLI library.
//!
//! Argument parsing, settings, output formatting and the extraction
//! command behind the `folio` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use config::{Config, Settings};
pub use error::{CliError, Result};
pub use output::Formatter;
