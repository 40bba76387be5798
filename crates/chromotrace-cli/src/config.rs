//! Layered configuration: command-line flags override the TOML file, `-S key=value`
//! entries are applied on top of the file, and built-in defaults fill whatever is left.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
