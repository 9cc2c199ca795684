//! Error types for gateway operations.
//!
//! Inner operations return [`GatewayError`]; the dispatch hooks convert it
//! to a [`Diagnostic`] through a uniform trap. The mapping:
//!
//! | Error | Code | Addinfo |
//! |-------|------|---------|
//! | Translate(..) | the translator's BIB-1 code | the translator's addinfo |
//! | Login(..) / MissingCredentials | 1014 | decoded back-end message |
//! | Search(..) | 3 | decoded back-end message |
//! | ResultSetNotFound | 30 | the set name |
//! | OrdinalOutOfRange | 13 | the ordinal |
//! | MissingRecord / TotalConflict | 1 | message |
//! | Config(..) / Render(..) | 100 | message |
//!
//! Programming bugs are not represented here; they abort the association as
//! panics.

use thiserror::Error;
use z2folio_client::{BackendError, ConfigError};
use z2folio_query::TranslateError;

/// The primary error type for gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Query translation failed.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// The back end rejected or failed the login call.
    #[error("login failed: {0}")]
    Login(#[source] BackendError),

    /// The back end rejected or failed a search call.
    #[error("search failed: {0}")]
    Search(#[source] BackendError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neither the init request nor the configuration supplied credentials.
    #[error("no credentials supplied and none configured")]
    MissingCredentials,

    /// An operation named a result set the session does not hold.
    #[error("result set does not exist: {name}")]
    ResultSetNotFound {
        /// The unknown set name.
        name: String,
    },

    /// A fetch asked for an ordinal outside `1..=total`.
    #[error("record {ordinal} out of range 1..={total}")]
    OrdinalOutOfRange {
        /// The requested ordinal.
        ordinal: u64,
        /// The result set's total.
        total: u64,
    },

    /// A record was still absent after its chunk was fetched.
    #[error("missing record {ordinal}")]
    MissingRecord {
        /// The requested ordinal.
        ordinal: u64,
    },

    /// The back end reported a total that contradicts an earlier page.
    #[error("result set total changed from {previous} to {reported}")]
    TotalConflict {
        /// The total recorded from the first page.
        previous: u64,
        /// The conflicting total.
        reported: u64,
    },

    /// XML rendering of an instance document failed.
    #[error("record rendering failed: {0}")]
    Render(String),
}

/// A protocol diagnostic reported to the client: BIB-1 code plus addinfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The BIB-1 diagnostic code.
    pub code: u32,
    /// The additional-information string.
    pub addinfo: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(code: u32, addinfo: impl Into<String>) -> Self {
        Self {
            code,
            addinfo: addinfo.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BIB-1 diagnostic {}: {}", self.code, self.addinfo)
    }
}

impl GatewayError {
    /// Maps this error to the BIB-1 diagnostic reported to the client.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GatewayError::Translate(err) => {
                let (code, addinfo) = err.diagnostic();
                Diagnostic::new(code, addinfo)
            }
            GatewayError::Login(err) => Diagnostic::new(1014, err.message()),
            GatewayError::Search(err) => Diagnostic::new(3, err.message()),
            GatewayError::MissingCredentials => Diagnostic::new(1014, self.to_string()),
            GatewayError::ResultSetNotFound { name } => Diagnostic::new(30, name.clone()),
            GatewayError::OrdinalOutOfRange { ordinal, .. } => {
                Diagnostic::new(13, ordinal.to_string())
            }
            GatewayError::MissingRecord { .. } => Diagnostic::new(1, "missing record"),
            GatewayError::TotalConflict { .. } => Diagnostic::new(1, self.to_string()),
            GatewayError::Config(err) => Diagnostic::new(100, err.to_string()),
            GatewayError::Render(message) => Diagnostic::new(100, message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use z2folio_query::TranslateError;

    #[test]
    fn test_translate_error_keeps_its_code() {
        let err = GatewayError::Translate(TranslateError::UnsupportedUseAttribute {
            value: "999".to_string(),
        });
        assert_eq!(err.to_diagnostic(), Diagnostic::new(114, "999"));
    }

    #[test]
    fn test_login_failure_maps_to_1014() {
        let err = GatewayError::Login(BackendError::Http {
            status: 422,
            message: "Password does not match".to_string(),
        });
        assert_eq!(
            err.to_diagnostic(),
            Diagnostic::new(1014, "Password does not match")
        );
    }

    #[test]
    fn test_search_failure_maps_to_3() {
        let err = GatewayError::Search(BackendError::Http {
            status: 500,
            message: "index exploded".to_string(),
        });
        assert_eq!(err.to_diagnostic(), Diagnostic::new(3, "index exploded"));
    }

    #[test]
    fn test_missing_set_maps_to_30_with_name() {
        let err = GatewayError::ResultSetNotFound {
            name: "default".to_string(),
        };
        assert_eq!(err.to_diagnostic(), Diagnostic::new(30, "default"));
    }

    #[test]
    fn test_out_of_range_maps_to_13() {
        let err = GatewayError::OrdinalOutOfRange {
            ordinal: 21,
            total: 20,
        };
        assert_eq!(err.to_diagnostic(), Diagnostic::new(13, "21"));
    }

    #[test]
    fn test_other_failures_map_to_100() {
        let err = GatewayError::Render("unpaired surrogate".to_string());
        assert_eq!(err.to_diagnostic().code, 100);
    }
}
