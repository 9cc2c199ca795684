//! Per-association session state.
//!
//! A session owns the effective credentials, the back-end token, and the
//! named result sets of one protocol association. Sessions are independent
//! values owned by the dispatch layer; nothing is shared between them.

use std::collections::HashMap;
use std::fmt;

use z2folio_query::ResultSetLookup;

use crate::resultset::ResultSet;

/// The mutable state of one association.
pub struct Session {
    username: String,
    password: String,
    token: Option<String>,
    result_sets: HashMap<String, ResultSet>,
}

impl Session {
    /// Creates a session with resolved credentials and no token.
    pub(crate) fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            token: None,
            result_sets: HashMap::new(),
        }
    }

    /// The effective username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// The back-end token, once login has succeeded.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Returns the named result set.
    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.get(name)
    }

    pub(crate) fn result_set_mut(&mut self, name: &str) -> Option<&mut ResultSet> {
        self.result_sets.get_mut(name)
    }

    /// Stores a result set, replacing any prior set of the same name.
    pub(crate) fn put_result_set(&mut self, result_set: ResultSet) {
        self.result_sets
            .insert(result_set.name().to_string(), result_set);
    }

    /// Discards the named result set, returning it if it existed.
    pub(crate) fn remove_result_set(&mut self, name: &str) -> Option<ResultSet> {
        self.result_sets.remove(name)
    }
}

impl ResultSetLookup for Session {
    fn contains_result_set(&self, name: &str) -> bool {
        self.result_sets.contains_key(name)
    }
}

// The password and token must never leak into logs, so Debug redacts them.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("result_sets", &self.result_sets.keys())
            .finish()
    }
}
