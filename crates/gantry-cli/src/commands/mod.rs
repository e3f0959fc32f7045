//! Subcommand handlers. Each returns the process exit code on success.

pub mod completions;
pub mod config;
pub mod request;
pub mod routes;
pub mod run;
pub mod serve;
