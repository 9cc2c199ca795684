//! The RPN tree delivered by the protocol frontend.
//!
//! A Type-1 query decodes into a tree of boolean combinators over terms and
//! result-set references. The tree is a closed sum type so the translator
//! can match every node kind exhaustively.

use crate::attr::Attribute;

/// One node of an RPN query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnNode {
    /// A search term with its attributes.
    Term(Term),
    /// A reference to a named result set held by the session.
    ResultSet(String),
    /// Boolean AND of two subtrees.
    And(Box<RpnNode>, Box<RpnNode>),
    /// Boolean OR of two subtrees.
    Or(Box<RpnNode>, Box<RpnNode>),
    /// Boolean AND-NOT of two subtrees (CQL `not`).
    AndNot(Box<RpnNode>, Box<RpnNode>),
}

impl RpnNode {
    /// Creates an AND node.
    pub fn and(left: RpnNode, right: RpnNode) -> Self {
        RpnNode::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR node.
    pub fn or(left: RpnNode, right: RpnNode) -> Self {
        RpnNode::Or(Box::new(left), Box::new(right))
    }

    /// Creates an AND-NOT node.
    pub fn and_not(left: RpnNode, right: RpnNode) -> Self {
        RpnNode::AndNot(Box::new(left), Box::new(right))
    }

    /// Creates a result-set reference node.
    pub fn result_set(id: impl Into<String>) -> Self {
        RpnNode::ResultSet(id.into())
    }
}

impl From<Term> for RpnNode {
    fn from(term: Term) -> Self {
        RpnNode::Term(term)
    }
}

/// A search term with its BIB-1 attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The attributes qualifying this term.
    pub attributes: Vec<Attribute>,
    /// The term text.
    pub term: String,
}

impl Term {
    /// Creates a term with no attributes.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            term: term.into(),
        }
    }

    /// Appends an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}
