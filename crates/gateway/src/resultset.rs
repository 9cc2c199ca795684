//! Named result sets.
//!
//! A result set is the server-side handle to one search: its CQL text, the
//! total hit count once known, and a sparse map of 1-based ordinals to
//! instance documents filled chunk by chunk.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::GatewayError;

/// One search's named result container.
#[derive(Debug, Clone)]
pub struct ResultSet {
    name: String,
    cql: String,
    total: Option<u64>,
    records: BTreeMap<u64, Value>,
}

impl ResultSet {
    /// Allocates an empty result set for a query.
    pub fn new(name: impl Into<String>, cql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cql: cql.into(),
            total: None,
            records: BTreeMap::new(),
        }
    }

    /// The set's name, unique within its session.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The CQL this set was created from.
    pub fn cql(&self) -> &str {
        &self.cql
    }

    /// The total hit count, once a page has reported it.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Records the total hit count.
    ///
    /// Setting the same value again is a no-op; a conflicting value is an
    /// internal error surfaced to the client as diagnostic 1.
    pub fn set_total(&mut self, total: u64) -> Result<(), GatewayError> {
        match self.total {
            None => {
                self.total = Some(total);
                Ok(())
            }
            Some(previous) if previous == total => Ok(()),
            Some(previous) => Err(GatewayError::TotalConflict {
                previous,
                reported: total,
            }),
        }
    }

    /// Stores a page of instances fetched at the given 0-based offset.
    ///
    /// Ordinals past a known total are dropped, keeping every stored ordinal
    /// within `1..=total`.
    pub fn insert_chunk(&mut self, offset: u64, instances: Vec<Value>) {
        for (i, instance) in instances.into_iter().enumerate() {
            let ordinal = offset + i as u64 + 1;
            if self.total.is_some_and(|total| ordinal > total) {
                break;
            }
            self.records.insert(ordinal, instance);
        }
    }

    /// Returns the record at a 1-based ordinal, if materialized.
    pub fn record(&self, ordinal: u64) -> Option<&Value> {
        self.records.get(&ordinal)
    }

    /// Returns true if the ordinal is materialized.
    pub fn contains(&self, ordinal: u64) -> bool {
        self.records.contains_key(&ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_chunk_maps_offsets_to_ordinals() {
        let mut rs = ResultSet::new("default", "title=cat");
        rs.insert_chunk(5, vec![json!({"id": "a"}), json!({"id": "b"})]);
        assert!(rs.record(5).is_none());
        assert_eq!(rs.record(6).unwrap()["id"], "a");
        assert_eq!(rs.record(7).unwrap()["id"], "b");
    }

    #[test]
    fn test_set_total_is_idempotent() {
        let mut rs = ResultSet::new("default", "title=cat");
        rs.set_total(20).unwrap();
        rs.set_total(20).unwrap();
        assert_eq!(rs.total(), Some(20));
    }

    #[test]
    fn test_set_total_conflict_is_an_error() {
        let mut rs = ResultSet::new("default", "title=cat");
        rs.set_total(20).unwrap();
        let err = rs.set_total(21).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::TotalConflict {
                previous: 20,
                reported: 21
            }
        ));
    }

    #[test]
    fn test_ordinals_stay_within_total() {
        let mut rs = ResultSet::new("default", "title=cat");
        rs.set_total(3).unwrap();
        rs.insert_chunk(2, vec![json!(1), json!(2), json!(3)]);
        assert!(rs.contains(3));
        assert!(!rs.contains(4));
        assert!(!rs.contains(5));
    }
}
