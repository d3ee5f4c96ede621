//! ZIVPN API - HTTP control-plane for the ZIVPN account CLI
//!
//! This crate exposes the account operations of the `zivpn` command-line
//! tool (add, trial, renew, delete) over a small local HTTP API. Each request
//! runs the CLI once and turns its colored console output into JSON.
//!
//! # Architecture
//!
//! - `config`: Configuration file handling (TOML)
//! - `settings`: Auth key and domain, re-read on every request
//! - `invoker`: Runs the external CLI
//! - `parse`: ANSI stripping and account field extraction
//! - `api`: HTTP routes, auth and the JSON envelope
//!
//! # Usage
//!
//! ```bash
//! zivpn-api serve
//! curl 'http://localhost:9999/add?user=alice&days=30&auth=KEY'
//! ```

pub mod api;
pub mod config;
pub mod invoker;
pub mod parse;
pub mod settings;

pub use api::{router, serve, ApiError, ApiResponse};
pub use config::Config;
pub use invoker::{AccountCommand, CommandRunner, ZivpnCli};
pub use parse::{parse_output, ParsedAccount};
pub use settings::{FileSettings, SettingsProvider};
