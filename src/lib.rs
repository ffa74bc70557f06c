//! Patchbay is the capability-wiring layer of a server application.
//!
//! From a declarative list of enabled features it decides which
//! concrete implementation of each pluggable infrastructure capability
//! (object storage backend, SQL migration driver, SMS provider, search
//! index) the running process will use, then exposes a uniform query
//! interface — `cfg_if` / `cfg` on the active suite — so the rest of
//! the application can ask "is capability X enabled, and with which
//! implementation?" without knowing how the decision was made.
//!
//! Initialization is strictly ordered: settings decode, suite
//! activation, and backend construction all happen once, synchronously,
//! on the startup path, before any capability handle reaches concurrent
//! callers. Backend handles are `Send + Sync` and safe to share after
//! that point.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`client`] -- Shared outbound hyper client for REST-backed servants.
//! - [`cmd`] -- Subcommand dispatch and execution (init, validate,
//!   features, check, migrate).
//! - [`config`] -- Settings resolution: typed section decoding, feature
//!   declarations, suite activation, and conditional validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty output.
//! - [`migrate`] -- Schema migration runner with suite-driven SQL driver
//!   selection.
//! - [`select`] -- The backend selection protocol: ordered candidate
//!   lists, first-match semantics, servant identity.
//! - [`search`] -- Search index capability family (Zinc, Meili).
//! - [`sms`] -- SMS gateway capability family (Juhe).
//! - [`storage`] -- Object storage capability family (local disk,
//!   S3-compatible, MinIO).
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `mysql` | MySQL migration driver _(enabled by default)_ |
//! | `postgres` | PostgreSQL migration driver |
//! | `sqlite` | SQLite migration driver |
//! | `s3` | S3-compatible object storage (also the MinIO candidate) |
//! | `file-formats` | All config file formats |
//! | `db-drivers` | All migration drivers |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod migrate;
pub mod select;
pub mod search;
pub mod sms;
pub mod storage;
