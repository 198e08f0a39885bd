//! Command implementations.

pub mod extract;

pub use extract::execute_extract;
