//! # z2folio-gateway - session core of the Z39.50-to-FOLIO gateway
//!
//! This crate is the core the wire-level Z39.50 frontend calls into. The
//! frontend owns ASN.1/BER, association state, and APDU dispatch; this crate
//! owns everything behind the four operation hooks:
//!
//! | Hook | Entry point | Outcome |
//! |------|-------------|---------|
//! | init | [`SessionHandler::init`] | implementation identification, or diagnostic 1014 |
//! | search | [`SessionHandler::search`] | hit count |
//! | fetch | [`SessionHandler::fetch`] | one XML record |
//! | delete | [`SessionHandler::delete`] | ok |
//!
//! Each association gets its own [`SessionHandler`], holding a fresh
//! configuration snapshot, the back-end client, the token, and the named
//! result sets. Associations share nothing; the frontend serializes calls
//! within an association.
//!
//! ## Modules
//!
//! - [`ops`] - The operation hooks and the uniform failure trap.
//! - [`session`] - Per-association credentials, token, and result-set map.
//! - [`resultset`] - Sparse, chunk-filled record containers.
//! - [`xml`] - Instance-document rendering.
//! - [`error`] - [`GatewayError`] and its mapping to BIB-1 diagnostics.

#![warn(missing_docs)]

pub mod error;
pub mod ops;
pub mod resultset;
pub mod session;
pub mod xml;

pub use error::{Diagnostic, GatewayError};
pub use ops::{FetchedRecord, InitResponse, SearchRequest, SessionHandler};
pub use resultset::ResultSet;
pub use session::Session;

/// Initializes the tracing subscriber for logging.
///
/// Call once at frontend startup. The filter honors `RUST_LOG` when set and
/// falls back to the given level for this crate's targets.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "z2folio_gateway={level},z2folio_client={level},z2folio_query={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
