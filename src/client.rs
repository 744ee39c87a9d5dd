//! Bug tracker search client.
//!
//! Queries a Bugzilla-compatible REST endpoint (`GET {server}/rest/bug`) and
//! decodes the result into a [`BugSet`]. The `BugSearch` trait is the seam
//! used by the aggregator so metrics can be computed against canned data in
//! tests. All I/O is blocking; one search is one request, no retries, no
//! pagination — a failure is returned to the caller and ends the run.

use crate::models::{status, BugRecord, BugSet};
use serde::Deserialize;
use thiserror::Error;

/// Fields requested for every search; everything the aggregator reads.
const BASE_FIELDS: [&str; 3] = ["id", "keywords", "is_open"];

/// Match operator for "field is any of these values".
const OP_ANY_EXACT: &str = "anyexact";

/// The tracker's "unresolved" resolution value.
pub const RESOLUTION_OPEN: &str = "---";

#[derive(Debug, Error)]
/// Failures raised by the search client. Both variants are hard errors.
pub enum ClientError {
    #[error("bug search request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    #[error("bug search response could not be decoded: {0}")]
    Decode(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// An "any of these values" filter on a named bug field.
pub struct FlagFilter {
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One logical search: keyword/resolution/component filters plus numbered
/// field filters.
pub struct SearchFilter {
    pub keywords: String,
    pub resolutions: Vec<String>,
    pub component: String,
    pub flags: Vec<FlagFilter>,
}

impl SearchFilter {
    /// All open (unresolved) bugs carrying the severity keyword, optionally
    /// narrowed to a component.
    pub fn open(severity: &str, component: &str) -> Self {
        SearchFilter {
            keywords: severity.to_string(),
            resolutions: vec![RESOLUTION_OPEN.to_string()],
            component: component.to_string(),
            flags: Vec::new(),
        }
    }

    /// Bugs tracked for a release: severity/component match, resolution
    /// unresolved or FIXED, and the release's status field set to one of the
    /// recognized tracking values.
    pub fn tracked(severity: &str, component: &str, status_field: &str) -> Self {
        SearchFilter {
            keywords: severity.to_string(),
            resolutions: vec![RESOLUTION_OPEN.to_string(), "FIXED".to_string()],
            component: component.to_string(),
            flags: vec![FlagFilter {
                field: status_field.to_string(),
                values: status::tracked_statuses()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            }],
        }
    }

    /// Query-string pairs for the tracker's search endpoint. Field filters
    /// are numbered `f1`/`o1`/`v1`, `f2`/... as the API expects; values of
    /// one filter are joined with commas.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        if !self.keywords.is_empty() {
            params.push(("keywords".into(), self.keywords.clone()));
        }
        for res in &self.resolutions {
            params.push(("resolution".into(), res.clone()));
        }
        if !self.component.is_empty() {
            params.push(("component".into(), self.component.clone()));
        }
        for (i, flag) in self.flags.iter().enumerate() {
            let n = i + 1;
            params.push((format!("f{}", n), flag.field.clone()));
            params.push((format!("o{}", n), OP_ANY_EXACT.into()));
            params.push((format!("v{}", n), flag.values.join(",")));
        }
        params.push(("include_fields".into(), self.include_fields()));
        params
    }

    /// Trim the response to the fields the aggregator reads, plus any
    /// status fields this filter touches.
    fn include_fields(&self) -> String {
        let mut fields: Vec<&str> = BASE_FIELDS.to_vec();
        for flag in &self.flags {
            fields.push(flag.field.as_str());
        }
        fields.join(",")
    }
}

/// Search capability consumed by the aggregator.
pub trait BugSearch {
    /// Run one search, returning a fresh result set.
    fn search(&self, filter: &SearchFilter) -> Result<BugSet, ClientError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    bugs: Vec<BugRecord>,
}

/// Blocking REST client for a Bugzilla-compatible tracker.
pub struct BugzillaClient {
    agent: ureq::Agent,
    server: String,
}

impl BugzillaClient {
    pub fn new(server: &str) -> Self {
        BugzillaClient {
            agent: ureq::AgentBuilder::new().build(),
            server: server.trim_end_matches('/').to_string(),
        }
    }
}

impl BugSearch for BugzillaClient {
    fn search(&self, filter: &SearchFilter) -> Result<BugSet, ClientError> {
        let url = format!("{}/rest/bug", self.server);
        let mut req = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .set("User-Agent", concat!("secmetrics/", env!("CARGO_PKG_VERSION")));
        for (key, value) in filter.query_params() {
            req = req.query(&key, &value);
        }
        let resp = req.call().map_err(Box::new)?;
        let decoded: SearchResponse = resp.into_json()?;
        let mut set = BugSet::new();
        set.ingest(decoded.bugs);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_filter_params() {
        let filter = SearchFilter::open("sec-high", "DOM");
        let params = filter.query_params();
        assert_eq!(
            params,
            vec![
                ("keywords".to_string(), "sec-high".to_string()),
                ("resolution".to_string(), "---".to_string()),
                ("component".to_string(), "DOM".to_string()),
                ("include_fields".to_string(), "id,keywords,is_open".to_string()),
            ]
        );
    }

    #[test]
    fn test_open_filter_omits_empty_component() {
        let filter = SearchFilter::open("sec-critical", "");
        let params = filter.query_params();
        assert!(params.iter().all(|(k, _)| k != "component"));
    }

    #[test]
    fn test_tracked_filter_params() {
        let filter = SearchFilter::tracked("sec-high", "", "cf_status_firefox57");
        let params = filter.query_params();
        // Two resolution values: unresolved or already fixed.
        let resolutions: Vec<&str> = params
            .iter()
            .filter(|(k, _)| k == "resolution")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(resolutions, vec!["---", "FIXED"]);
        // One numbered anyexact filter over all nine tracking values.
        assert!(params.contains(&("f1".to_string(), "cf_status_firefox57".to_string())));
        assert!(params.contains(&("o1".to_string(), "anyexact".to_string())));
        let v1 = params.iter().find(|(k, _)| k == "v1").map(|(_, v)| v.clone()).unwrap();
        assert_eq!(
            v1,
            "?,wontfix,affected,verified,fix-optional,fixed,disabled,unaffected,verified disabled"
        );
        // The status field must come back in the response.
        let include = params.last().unwrap();
        assert_eq!(include.0, "include_fields");
        assert_eq!(include.1, "id,keywords,is_open,cf_status_firefox57");
    }
}
