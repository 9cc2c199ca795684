//! # z2folio-client - FOLIO back-end access
//!
//! This crate holds the two leaf concerns of the gateway:
//!
//! - [`config`] - The read-only configuration snapshot loaded per session
//!   init: Okapi URLs, tenant, default credentials, the BIB-1 index map,
//!   the query filter, and chunking parameters. String values support
//!   `${NAME}` / `${NAME-DEFAULT}` environment substitution.
//! - [`okapi`] - The authenticated JSON HTTP client for the inventory back
//!   end: login (token acquisition) and paged CQL search.
//!
//! The session layer talks to the back end through the [`InventoryBackend`]
//! trait so it can be exercised against an in-memory fake; [`OkapiClient`]
//! is the `reqwest` implementation.

#![warn(missing_docs)]

pub mod config;
pub mod core;
pub mod error;
pub mod okapi;

pub use self::core::{InventoryBackend, SearchPage};
pub use config::{Config, LoginConfig, OkapiConfig, SortModifier};
pub use error::{BackendError, ConfigError};
pub use okapi::OkapiClient;
