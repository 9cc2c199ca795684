//! Translation error types.
//!
//! Each variant corresponds to one BIB-1 diagnostic; the code and the
//! additional information string are recovered with
//! [`TranslateError::diagnostic_code`] and [`TranslateError::addinfo`].

use thiserror::Error;

/// An error produced while translating an RPN tree to CQL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// An attribute declared (or defaulted to) a set other than BIB-1.
    #[error("unsupported attribute set: {oid}")]
    UnsupportedAttributeSet {
        /// The offending attribute-set OID.
        oid: String,
    },

    /// An attribute carried a type outside the BIB-1 range 1-6.
    #[error("unsupported attribute type: {attribute_type}")]
    UnsupportedAttributeType {
        /// The unrecognized type number.
        attribute_type: u32,
    },

    /// A use attribute (type 1) had no entry in the configured index map.
    #[error("unsupported use attribute: {value}")]
    UnsupportedUseAttribute {
        /// The unmapped attribute value.
        value: String,
    },

    /// A relation attribute (type 2) carried an unrecognized value.
    #[error("unsupported relation: {value}")]
    UnsupportedRelation {
        /// The unrecognized attribute value.
        value: String,
    },

    /// A position attribute (type 3) carried an unrecognized value.
    #[error("unsupported position: {value}")]
    UnsupportedPosition {
        /// The unrecognized attribute value.
        value: String,
    },

    /// A truncation attribute (type 5) carried an unrecognized value.
    #[error("unsupported truncation: {value}")]
    UnsupportedTruncation {
        /// The unrecognized attribute value.
        value: String,
    },

    /// A completeness attribute (type 6) carried an unrecognized value.
    #[error("unsupported completeness: {value}")]
    UnsupportedCompleteness {
        /// The unrecognized attribute value.
        value: String,
    },

    /// A result-set reference named a set the session does not hold.
    #[error("illegal result-set name: {name}")]
    IllegalResultSetName {
        /// The unknown result-set name.
        name: String,
    },
}

impl TranslateError {
    /// Returns the BIB-1 diagnostic code for this error.
    pub fn diagnostic_code(&self) -> u32 {
        match self {
            TranslateError::UnsupportedAttributeSet { .. } => 121,
            TranslateError::UnsupportedAttributeType { .. } => 113,
            TranslateError::UnsupportedUseAttribute { .. } => 114,
            TranslateError::UnsupportedRelation { .. } => 117,
            TranslateError::UnsupportedPosition { .. } => 119,
            TranslateError::UnsupportedTruncation { .. } => 120,
            TranslateError::UnsupportedCompleteness { .. } => 122,
            TranslateError::IllegalResultSetName { .. } => 128,
        }
    }

    /// Returns the `(code, addinfo)` pair for protocol reporting.
    pub fn diagnostic(&self) -> (u32, String) {
        let addinfo = match self {
            TranslateError::UnsupportedAttributeSet { oid } => oid.clone(),
            TranslateError::UnsupportedAttributeType { attribute_type } => {
                attribute_type.to_string()
            }
            TranslateError::UnsupportedUseAttribute { value } => value.clone(),
            TranslateError::UnsupportedRelation { value } => value.clone(),
            TranslateError::UnsupportedPosition { value } => value.clone(),
            TranslateError::UnsupportedTruncation { value } => value.clone(),
            TranslateError::UnsupportedCompleteness { value } => value.clone(),
            TranslateError::IllegalResultSetName { name } => name.clone(),
        };
        (self.diagnostic_code(), addinfo)
    }
}
