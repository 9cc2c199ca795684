//! # z2folio-query - Type-1 (RPN) to CQL translation
//!
//! This crate converts Z39.50 Type-1 queries, delivered as RPN trees with
//! BIB-1 attributes, into CQL strings suitable for the FOLIO inventory
//! search endpoint.
//!
//! ## Model
//!
//! - [`rpn`] - The RPN tree: a closed sum type over terms, result-set
//!   references, and the three boolean combinators.
//! - [`attr`] - BIB-1 attribute interpretation. Each attribute is classified
//!   into a typed category ([`attr::Bib1Attribute`]) so that unsupported
//!   types and values surface as typed errors rather than fall-throughs.
//! - [`translate`] - The translator itself, parameterized by the configured
//!   index map, the optional query filter, and the default attribute set of
//!   the enclosing search request.
//!
//! ## Diagnostics
//!
//! Every failure maps to a BIB-1 diagnostic code:
//!
//! | Error | Code | Addinfo |
//! |-------|------|---------|
//! | Unsupported attribute set | 121 | the offending OID |
//! | Unsupported attribute type | 113 | the type number |
//! | Unsupported use attribute | 114 | the attribute value |
//! | Unsupported relation | 117 | the attribute value |
//! | Unsupported position | 119 | the attribute value |
//! | Unsupported truncation | 120 | the attribute value |
//! | Unsupported completeness | 122 | the attribute value |
//! | Illegal result-set name | 128 | the name |
//!
//! ## Example
//!
//! ```
//! use std::collections::{HashMap, HashSet};
//! use z2folio_query::attr::Attribute;
//! use z2folio_query::rpn::{RpnNode, Term};
//! use z2folio_query::translate::Translator;
//!
//! let index_map = HashMap::from([("4".to_string(), "title".to_string())]);
//! let node = RpnNode::Term(Term::new("cat").with_attribute(Attribute::new(1, 4)));
//!
//! let translator = Translator::new().with_index_map(&index_map);
//! let cql = translator.translate(&node, &HashSet::<String>::new()).unwrap();
//! assert_eq!(cql, "title=cat");
//! ```

#![warn(missing_docs)]

pub mod attr;
pub mod error;
pub mod rpn;
pub mod translate;

pub use attr::{Attribute, AttributeValue, BIB1_ATTRIBUTE_SET};
pub use error::TranslateError;
pub use rpn::{RpnNode, Term};
pub use translate::{ResultSetLookup, Translator};
