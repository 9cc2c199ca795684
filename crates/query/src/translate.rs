//! RPN-to-CQL translation.
//!
//! The translator recurses structurally over the tree. Terms are handled in
//! two passes: the first resolves the use attribute into a CQL index (the
//! index must be known before any other modifier can attach to it), the
//! second interprets the remaining attributes, which commute.

use std::collections::{HashMap, HashSet};

use crate::attr::{
    Attribute, AttributeValue, Bib1Attribute, Completeness, Position, Relation, Truncation,
    BIB1_ATTRIBUTE_SET,
};
use crate::error::TranslateError;
use crate::rpn::{RpnNode, Term};

/// Lookup of the result-set names a session currently holds.
///
/// The session type of the gateway implements this; tests can use a plain
/// `HashSet<String>`.
pub trait ResultSetLookup {
    /// Returns true if a result set with the given name exists.
    fn contains_result_set(&self, name: &str) -> bool;
}

impl ResultSetLookup for HashSet<String> {
    fn contains_result_set(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Translates RPN trees into CQL under a configured index map.
///
/// A translator borrows its configuration; construct one per search request
/// with the request's default attribute set.
#[derive(Debug, Clone, Default)]
pub struct Translator<'a> {
    index_map: Option<&'a HashMap<String, String>>,
    query_filter: Option<&'a str>,
    default_set: Option<&'a str>,
}

impl<'a> Translator<'a> {
    /// Creates a translator with no index map, no filter, and the BIB-1
    /// default attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the use-attribute index map.
    ///
    /// Keys are attribute values rendered as decimal strings; values are CQL
    /// index expressions. Without a map, attribute values are used as index
    /// names directly.
    pub fn with_index_map(mut self, map: &'a HashMap<String, String>) -> Self {
        self.index_map = Some(map);
        self
    }

    /// Sets the CQL fragment `and`-joined around every translated query.
    /// Empty or whitespace-only filters are ignored.
    pub fn with_query_filter(mut self, filter: &'a str) -> Self {
        self.query_filter = Some(filter);
        self
    }

    /// Sets the default attribute-set OID of the enclosing search request,
    /// applied to attributes that do not declare a set of their own.
    pub fn with_default_attribute_set(mut self, oid: &'a str) -> Self {
        self.default_set = Some(oid);
        self
    }

    /// Translates a whole query tree, applying the query filter at the
    /// outermost level.
    pub fn translate(
        &self,
        node: &RpnNode,
        result_sets: &dyn ResultSetLookup,
    ) -> Result<String, TranslateError> {
        let cql = self.translate_node(node, result_sets)?;
        match self.query_filter.map(str::trim) {
            Some(filter) if !filter.is_empty() => Ok(format!("({}) and ({})", cql, filter)),
            _ => Ok(cql),
        }
    }

    fn translate_node(
        &self,
        node: &RpnNode,
        result_sets: &dyn ResultSetLookup,
    ) -> Result<String, TranslateError> {
        match node {
            RpnNode::Term(term) => self.translate_term(term),
            RpnNode::ResultSet(name) => {
                if !result_sets.contains_result_set(name) {
                    return Err(TranslateError::IllegalResultSetName { name: name.clone() });
                }
                Ok(format!("cql.resultSetId=\"{}\"", name))
            }
            RpnNode::And(left, right) => self.translate_boolean(left, right, "and", result_sets),
            RpnNode::Or(left, right) => self.translate_boolean(left, right, "or", result_sets),
            RpnNode::AndNot(left, right) => self.translate_boolean(left, right, "not", result_sets),
        }
    }

    fn translate_boolean(
        &self,
        left: &RpnNode,
        right: &RpnNode,
        op: &str,
        result_sets: &dyn ResultSetLookup,
    ) -> Result<String, TranslateError> {
        Ok(format!(
            "({} {} {})",
            self.translate_node(left, result_sets)?,
            op,
            self.translate_node(right, result_sets)?
        ))
    }

    fn translate_term(&self, term: &Term) -> Result<String, TranslateError> {
        // First pass: validate attribute sets and resolve the index. The use
        // attribute must be known before other modifiers can attach to it.
        let mut field: Option<String> = None;
        for attribute in &term.attributes {
            self.check_attribute_set(attribute)?;
            if attribute.attribute_type == 1 {
                field = Some(self.resolve_index(&attribute.value)?);
            }
        }

        // Second pass: the remaining attribute categories commute.
        let mut relation: Option<Relation> = None;
        let mut left_anchor = false;
        let mut right_anchor = false;
        let mut left_truncate = false;
        let mut right_truncate = false;
        let mut text = term.term.clone();

        for attribute in &term.attributes {
            match Bib1Attribute::interpret(attribute)? {
                Bib1Attribute::Use(_) => {}
                Bib1Attribute::Relation(r) => relation = Some(r),
                Bib1Attribute::Position(Position::FirstInField)
                | Bib1Attribute::Position(Position::FirstInSubfield) => left_anchor = true,
                Bib1Attribute::Position(Position::AnyPosition) => {}
                Bib1Attribute::Structure => {}
                Bib1Attribute::Truncation(Truncation::Right) => right_truncate = true,
                Bib1Attribute::Truncation(Truncation::Left) => left_truncate = true,
                Bib1Attribute::Truncation(Truncation::LeftAndRight) => {
                    left_truncate = true;
                    right_truncate = true;
                }
                Bib1Attribute::Truncation(Truncation::DoNotTruncate) => {}
                Bib1Attribute::Truncation(Truncation::ProcessHash) => {
                    text = text.replace('#', "?");
                }
                Bib1Attribute::Truncation(Truncation::Z3958) => {
                    text = expand_z3958_masking(&text.replace('#', "?"));
                }
                Bib1Attribute::Completeness(Completeness::IncompleteSubfield) => {}
                Bib1Attribute::Completeness(Completeness::CompleteSubfield)
                | Bib1Attribute::Completeness(Completeness::CompleteField) => {
                    left_anchor = true;
                    right_anchor = true;
                }
            }
        }

        Ok(assemble_term(
            field,
            relation,
            text,
            left_anchor,
            right_anchor,
            left_truncate,
            right_truncate,
        ))
    }

    fn check_attribute_set(&self, attribute: &Attribute) -> Result<(), TranslateError> {
        let set = attribute
            .set
            .as_deref()
            .or(self.default_set)
            .unwrap_or(BIB1_ATTRIBUTE_SET);
        if set != BIB1_ATTRIBUTE_SET {
            return Err(TranslateError::UnsupportedAttributeSet {
                oid: set.to_string(),
            });
        }
        Ok(())
    }

    fn resolve_index(&self, value: &AttributeValue) -> Result<String, TranslateError> {
        match self.index_map {
            Some(map) => map
                .get(&value.to_string())
                .cloned()
                .ok_or_else(|| TranslateError::UnsupportedUseAttribute {
                    value: value.to_string(),
                }),
            // No map configured: the raw value names the index, which also
            // admits string-valued use attributes.
            None => Ok(value.to_string()),
        }
    }
}

/// Z39.58 masking: each `?`, optionally followed by one digit, becomes `*`.
fn expand_z3958_masking(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '?' {
            if chars.peek().is_some_and(char::is_ascii_digit) {
                chars.next();
            }
            out.push('*');
        } else {
            out.push(c);
        }
    }
    out
}

fn assemble_term(
    field: Option<String>,
    relation: Option<Relation>,
    text: String,
    left_anchor: bool,
    right_anchor: bool,
    left_truncate: bool,
    right_truncate: bool,
) -> String {
    let mut term = text;
    if left_truncate {
        term.insert(0, '*');
    }
    if right_truncate {
        term.push('*');
    }
    if left_anchor {
        term.insert(0, '^');
    }
    if right_anchor {
        term.push('^');
    }
    if term.is_empty() || needs_quoting(&term) {
        term = format!("\"{}\"", term);
    }
    match (field, relation) {
        (Some(field), Some(relation)) => format!("{} {} {}", field, relation.as_cql(), term),
        (Some(field), None) => format!("{}={}", field, term),
        (None, Some(relation)) => format!("cql.serverChoice {} {}", relation.as_cql(), term),
        (None, None) => term,
    }
}

fn needs_quoting(term: &str) -> bool {
    term.chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '/' | '='))
}
