//! BIB-1 attribute model and interpretation.
//!
//! A Type-1 term carries a list of attributes, each a `(set, type, value)`
//! triple. This module classifies raw attributes into typed categories
//! ([`Bib1Attribute`]) so that the translator can match exhaustively and
//! unsupported types or values surface as the correct diagnostics.

use std::fmt;

use crate::error::TranslateError;

/// OID of the BIB-1 attribute set, the only set this gateway recognizes.
pub const BIB1_ATTRIBUTE_SET: &str = "1.2.840.10003.3.1";

/// The value of an attribute.
///
/// BIB-1 attribute values are usually small integers, but the protocol also
/// permits string values; string-valued use attributes name a CQL index
/// directly when no index map is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A numeric attribute value.
    Numeric(u32),
    /// A string attribute value.
    Text(String),
}

impl AttributeValue {
    /// Returns the numeric value, if this value is numeric.
    pub fn numeric(&self) -> Option<u32> {
        match self {
            AttributeValue::Numeric(n) => Some(*n),
            AttributeValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Numeric(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

/// One attribute of a Type-1 term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute-set OID, if the query declared one for this attribute.
    pub set: Option<String>,
    /// The attribute type (1 = use, 2 = relation, ...).
    pub attribute_type: u32,
    /// The attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Creates a numeric attribute with no explicit set.
    pub fn new(attribute_type: u32, value: u32) -> Self {
        Self {
            set: None,
            attribute_type,
            value: AttributeValue::Numeric(value),
        }
    }

    /// Creates a string-valued attribute with no explicit set.
    pub fn text(attribute_type: u32, value: impl Into<String>) -> Self {
        Self {
            set: None,
            attribute_type,
            value: AttributeValue::Text(value.into()),
        }
    }

    /// Sets the attribute-set OID.
    pub fn with_set(mut self, oid: impl Into<String>) -> Self {
        self.set = Some(oid.into());
        self
    }
}

/// A relation attribute (type 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Value 1: `<`.
    Less,
    /// Value 2: `<=`.
    LessOrEqual,
    /// Value 3: `=`.
    Equal,
    /// Value 4: `>=`.
    GreaterOrEqual,
    /// Value 5: `>`.
    Greater,
    /// Value 6: `<>`.
    NotEqual,
    /// Value 100: phonetic match.
    Phonetic,
    /// Value 101: stemmed match.
    Stem,
    /// Value 102: relevance match.
    Relevant,
}

impl Relation {
    fn from_value(value: &AttributeValue) -> Result<Self, TranslateError> {
        match value.numeric() {
            Some(1) => Ok(Relation::Less),
            Some(2) => Ok(Relation::LessOrEqual),
            Some(3) => Ok(Relation::Equal),
            Some(4) => Ok(Relation::GreaterOrEqual),
            Some(5) => Ok(Relation::Greater),
            Some(6) => Ok(Relation::NotEqual),
            Some(100) => Ok(Relation::Phonetic),
            Some(101) => Ok(Relation::Stem),
            Some(102) => Ok(Relation::Relevant),
            _ => Err(TranslateError::UnsupportedRelation {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the CQL rendering of this relation.
    pub fn as_cql(&self) -> &'static str {
        match self {
            Relation::Less => "<",
            Relation::LessOrEqual => "<=",
            Relation::Equal => "=",
            Relation::GreaterOrEqual => ">=",
            Relation::Greater => ">",
            Relation::NotEqual => "<>",
            Relation::Phonetic => "=/phonetic",
            Relation::Stem => "=/stem",
            Relation::Relevant => "=/relevant",
        }
    }
}

/// A position attribute (type 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Value 1: first in field.
    FirstInField,
    /// Value 2: first in subfield.
    FirstInSubfield,
    /// Value 3: any position in field.
    AnyPosition,
}

impl Position {
    fn from_value(value: &AttributeValue) -> Result<Self, TranslateError> {
        match value.numeric() {
            Some(1) => Ok(Position::FirstInField),
            Some(2) => Ok(Position::FirstInSubfield),
            Some(3) => Ok(Position::AnyPosition),
            _ => Err(TranslateError::UnsupportedPosition {
                value: value.to_string(),
            }),
        }
    }
}

/// A truncation attribute (type 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    /// Value 1: right truncation.
    Right,
    /// Value 2: left truncation.
    Left,
    /// Value 3: truncation on both sides.
    LeftAndRight,
    /// Value 100: no truncation.
    DoNotTruncate,
    /// Value 101: `#` in the term masks a single character.
    ProcessHash,
    /// Value 104: Z39.58 masking (`#` single character, `?n` wildcards).
    Z3958,
}

impl Truncation {
    fn from_value(value: &AttributeValue) -> Result<Self, TranslateError> {
        match value.numeric() {
            Some(1) => Ok(Truncation::Right),
            Some(2) => Ok(Truncation::Left),
            Some(3) => Ok(Truncation::LeftAndRight),
            Some(100) => Ok(Truncation::DoNotTruncate),
            Some(101) => Ok(Truncation::ProcessHash),
            Some(104) => Ok(Truncation::Z3958),
            _ => Err(TranslateError::UnsupportedTruncation {
                value: value.to_string(),
            }),
        }
    }
}

/// A completeness attribute (type 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Value 1: incomplete subfield.
    IncompleteSubfield,
    /// Value 2: complete subfield.
    CompleteSubfield,
    /// Value 3: complete field.
    CompleteField,
}

impl Completeness {
    fn from_value(value: &AttributeValue) -> Result<Self, TranslateError> {
        match value.numeric() {
            Some(1) => Ok(Completeness::IncompleteSubfield),
            Some(2) => Ok(Completeness::CompleteSubfield),
            Some(3) => Ok(Completeness::CompleteField),
            _ => Err(TranslateError::UnsupportedCompleteness {
                value: value.to_string(),
            }),
        }
    }
}

/// An attribute classified into its BIB-1 category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bib1Attribute {
    /// Type 1: names the index being searched.
    Use(AttributeValue),
    /// Type 2: the comparison relation.
    Relation(Relation),
    /// Type 3: position within the field.
    Position(Position),
    /// Type 4: structure. Carried but never interpreted.
    Structure,
    /// Type 5: truncation.
    Truncation(Truncation),
    /// Type 6: completeness.
    Completeness(Completeness),
}

impl Bib1Attribute {
    /// Classifies a raw attribute, validating its value within the category.
    pub fn interpret(attribute: &Attribute) -> Result<Self, TranslateError> {
        match attribute.attribute_type {
            1 => Ok(Bib1Attribute::Use(attribute.value.clone())),
            2 => Relation::from_value(&attribute.value).map(Bib1Attribute::Relation),
            3 => Position::from_value(&attribute.value).map(Bib1Attribute::Position),
            4 => Ok(Bib1Attribute::Structure),
            5 => Truncation::from_value(&attribute.value).map(Bib1Attribute::Truncation),
            6 => Completeness::from_value(&attribute.value).map(Bib1Attribute::Completeness),
            other => Err(TranslateError::UnsupportedAttributeType {
                attribute_type: other,
            }),
        }
    }
}
