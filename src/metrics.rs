//! Aggregation of per-release tracking metrics.
//!
//! For one (severity, component) pair this issues the open-bugs query, then
//! one tracked-set query per release, and folds each result into a
//! [`ReleaseAggregate`]. Queries run strictly one at a time and every query
//! yields its own [`BugSet`], so no result is mutated after it is returned.
//! Any query failure propagates immediately; there is no partial-failure
//! recovery. The per-pair computations are independent of each other, which
//! would allow running pairs in parallel later without extra coordination.

use crate::client::{BugSearch, ClientError, SearchFilter};
use crate::models::status::{classify, StatusClass};
use crate::models::{BugSet, ReleaseAggregate};

/// Compute aggregates for one (severity, component) pair, one per release,
/// in release-list order. `component` empty means all components.
pub fn collect(
    client: &impl BugSearch,
    severity: &str,
    component: &str,
    releases: &[String],
    flag_prefix: &str,
) -> Result<Vec<ReleaseAggregate>, ClientError> {
    let open_bugs = client.search(&SearchFilter::open(severity, component))?;
    let open_total = open_bugs.len();

    let mut aggregates = Vec::with_capacity(releases.len());
    for release in releases {
        let status_field = format!("{}{}", flag_prefix, release);
        let tracked_set = client.search(&SearchFilter::tracked(severity, component, &status_field))?;
        aggregates.push(aggregate_release(
            severity,
            component,
            release,
            open_total,
            &tracked_set,
            &status_field,
        ));
    }
    Ok(aggregates)
}

/// Fold one tracked result set into an aggregate. With nothing tracked the
/// release-scoped counts are all zero and the set is not scanned.
fn aggregate_release(
    severity: &str,
    component: &str,
    release: &str,
    open_total: usize,
    tracked_set: &BugSet,
    status_field: &str,
) -> ReleaseAggregate {
    let tracked = tracked_set.len();
    let (affected, not_affected, open, closed) = if tracked == 0 {
        (Some(0), Some(0), 0, 0)
    } else {
        let (open, closed) = open_closed_counts(tracked_set);
        match status_counts(tracked_set, status_field) {
            Some((affected, not_affected)) => (Some(affected), Some(not_affected), open, closed),
            None => (None, None, open, closed),
        }
    };
    ReleaseAggregate {
        severity: severity.to_string(),
        component: component.to_string(),
        release: release.to_string(),
        open_total,
        tracked,
        affected,
        not_affected,
        open,
        closed,
    }
}

/// Classify every record's status for the release. Returns `None` as soon as
/// any record lacks the status field: the set was selected on that very
/// field, so its absence means the data changed between queries and a
/// partial count would be misleading.
fn status_counts(bugs: &BugSet, status_field: &str) -> Option<(usize, usize)> {
    let mut affected = 0;
    let mut not_affected = 0;
    for bug in bugs.iter() {
        let status = bug.status_flag(status_field)?;
        match classify(status) {
            StatusClass::Affected => affected += 1,
            StatusClass::NotAffected => not_affected += 1,
            StatusClass::Other => {}
        }
    }
    Some((affected, not_affected))
}

/// Open/closed split of a result set. Always sums to the set size.
fn open_closed_counts(bugs: &BugSet) -> (usize, usize) {
    let open = bugs.iter().filter(|b| b.is_open).count();
    (open, bugs.len() - open)
}
