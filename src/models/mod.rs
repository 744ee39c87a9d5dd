//! Shared data models for bug records, query results, and aggregates.

pub mod status;

use serde::Deserialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
/// One bug as returned by the tracker's search API.
///
/// Release status fields (`cf_status_*`) are not known statically, so every
/// field outside the fixed trio lands in `extra` and is read back through
/// `status_flag`.
pub struct BugRecord {
    pub id: u64,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub is_open: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Json>,
}

impl BugRecord {
    /// Value of a per-release status field, if the record carries it.
    pub fn status_flag(&self, field: &str) -> Option<&str> {
        self.extra.get(field).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Default, Clone)]
/// One query's result set, keyed by bug identifier.
///
/// Every search produces a fresh `BugSet`; ingesting a record with an
/// identifier already present overwrites the prior value, never merges.
pub struct BugSet {
    bugs: BTreeMap<u64, BugRecord>,
}

impl BugSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all records.
    pub fn clear(&mut self) {
        self.bugs.clear();
    }

    /// Add records, overwriting entries with the same identifier.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = BugRecord>) {
        for rec in records {
            self.bugs.insert(rec.id, rec);
        }
    }

    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }

    /// Records in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &BugRecord> {
        self.bugs.values()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-release aggregate counts for one (severity, component) pair.
///
/// `open_total` is scoped to severity+component only and repeats across the
/// releases of a pair. `affected`/`not_affected` are `None` when a tracked
/// record lacked the release's status field — an upstream inconsistency,
/// rendered as `-1` in serialized output. Immutable once computed.
pub struct ReleaseAggregate {
    pub severity: String,
    pub component: String,
    pub release: String,
    pub open_total: usize,
    pub tracked: usize,
    pub affected: Option<usize>,
    pub not_affected: Option<usize>,
    pub open: usize,
    pub closed: usize,
}
