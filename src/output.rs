//! Output rendering for collected metrics.
//!
//! Supports `human` (default) and `json` outputs, plus the append-only JSON
//! artifact. The artifact receives one pretty-printed object per aggregate
//! followed by a comma — it is not a valid JSON document on its own and
//! consumers are expected to wrap it in `[...]` (dropping the trailing
//! comma) before parsing.

use crate::models::ReleaseAggregate;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print one (severity, component) pair: a header with the open-bug total,
/// then one line per release. No-op for `json` output (the run is dumped as
/// a single document at the end instead).
pub fn print_pair(aggregates: &[ReleaseAggregate], output: &str) {
    if output == "json" {
        return;
    }
    let Some(first) = aggregates.first() else {
        return;
    };
    let color = use_colors(output);
    let scope = if first.component.is_empty() {
        "ALL components".to_string()
    } else {
        first.component.clone()
    };
    let header = format!(
        "{} — {} {} open bugs",
        scope,
        first.open_total,
        first.severity.to_uppercase()
    );
    if color {
        println!("{} {}", "◆".blue(), header.bold());
    } else {
        println!("◆ {}", header);
    }
    for agg in aggregates {
        print_release_line(agg, color);
    }
}

fn print_release_line(agg: &ReleaseAggregate, color: bool) {
    if agg.tracked == 0 {
        println!("= {}: tracked 0", agg.release);
        return;
    }
    let line = format!(
        "= {}: tracked {} | affected {} | not affected {} | open {} | closed {}",
        agg.release,
        agg.tracked,
        fmt_count(agg.affected),
        fmt_count(agg.not_affected),
        agg.open,
        agg.closed
    );
    if color && (agg.affected.is_none() || agg.not_affected.is_none()) {
        // Make the inconsistent-data case stand out.
        println!("{}", line.yellow().to_string());
    } else {
        println!("{}", line);
    }
}

/// Render an unavailable count with the artifact's sentinel.
fn fmt_count(count: Option<usize>) -> String {
    match count {
        Some(n) => n.to_string(),
        None => "-1".to_string(),
    }
}

/// Print the whole run as one pretty JSON document (`--output json`).
pub fn print_collect(aggregates: &[ReleaseAggregate], output: &str) {
    if output == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&compose_collect_json(aggregates)).unwrap()
        );
    }
}

/// Compose the full-run JSON object (pure) for testing/snapshot purposes.
pub fn compose_collect_json(aggregates: &[ReleaseAggregate]) -> JsonVal {
    let items: Vec<_> = aggregates.iter().map(compose_aggregate_json).collect();
    let pairs = {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for a in aggregates {
            let key = (a.severity.as_str(), a.component.as_str());
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen.len()
    };
    let summary = json!({
        "pairs": pairs,
        "aggregates": aggregates.len(),
        "unavailable": aggregates
            .iter()
            .filter(|a| a.affected.is_none() || a.not_affected.is_none())
            .count(),
    });
    json!({"results": items, "summary": summary})
}

/// Compose one aggregate as a JSON object (pure). Unavailable counts are
/// serialized as `-1`.
pub fn compose_aggregate_json(agg: &ReleaseAggregate) -> JsonVal {
    json!({
        "severity": agg.severity,
        "component": agg.component,
        "release": agg.release,
        "open_total": agg.open_total,
        "tracked": agg.tracked,
        "affected": count_json(agg.affected),
        "not_affected": count_json(agg.not_affected),
        "open": agg.open,
        "closed": agg.closed,
    })
}

fn count_json(count: Option<usize>) -> JsonVal {
    match count {
        Some(n) => json!(n),
        None => json!(-1),
    }
}

/// Append one aggregate to the artifact file: pretty JSON object plus a
/// trailing comma, creating the file on first write.
pub fn append_artifact(path: &Path, agg: &ReleaseAggregate) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let doc = serde_json::to_string_pretty(&compose_aggregate_json(agg)).unwrap();
    file.write_all(doc.as_bytes())?;
    file.write_all(b",")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn aggregate(release: &str, affected: Option<usize>) -> ReleaseAggregate {
        ReleaseAggregate {
            severity: "sec-high".into(),
            component: String::new(),
            release: release.into(),
            open_total: 10,
            tracked: 4,
            affected,
            not_affected: affected.map(|_| 2),
            open: 2,
            closed: 2,
        }
    }

    #[test]
    fn test_compose_aggregate_json_shape() {
        let out = compose_aggregate_json(&aggregate("57", Some(2)));
        assert_eq!(out["severity"], "sec-high");
        assert_eq!(out["component"], "");
        assert_eq!(out["release"], "57");
        assert_eq!(out["open_total"], 10);
        assert_eq!(out["tracked"], 4);
        assert_eq!(out["affected"], 2);
        assert_eq!(out["not_affected"], 2);
        assert_eq!(out["open"], 2);
        assert_eq!(out["closed"], 2);
    }

    #[test]
    fn test_unavailable_counts_serialize_as_sentinel() {
        let out = compose_aggregate_json(&aggregate("56", None));
        assert_eq!(out["affected"], -1);
        assert_eq!(out["not_affected"], -1);
        // The rest of the record is unaffected by the sentinel.
        assert_eq!(out["tracked"], 4);
    }

    #[test]
    fn test_compose_collect_json_summary() {
        let aggs = vec![aggregate("57", Some(2)), aggregate("56", None)];
        let out = compose_collect_json(&aggs);
        assert_eq!(out["summary"]["pairs"], 1);
        assert_eq!(out["summary"]["aggregates"], 2);
        assert_eq!(out["summary"]["unavailable"], 1);
        assert_eq!(out["results"][1]["affected"], -1);
    }

    #[test]
    fn test_artifact_appends_comma_separated_objects() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("output.json");
        append_artifact(&path, &aggregate("57", Some(2))).unwrap();
        append_artifact(&path, &aggregate("58", Some(1))).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        // Not a valid document as-is; becomes one once wrapped.
        assert!(raw.ends_with(','));
        assert!(serde_json::from_str::<JsonVal>(&raw).is_err());
        let wrapped = format!("[{}]", raw.trim_end_matches(','));
        let parsed: JsonVal = serde_json::from_str(&wrapped).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["release"], "57");
        assert_eq!(parsed[1]["release"], "58");
    }
}
