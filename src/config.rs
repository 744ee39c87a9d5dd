//! Configuration discovery and effective settings resolution.
//!
//! secmetrics reads `secmetrics.toml|yaml|yml` from the start directory (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `server`: `https://bugzilla.mozilla.org`
//! - `severities`: `sec-critical`, `sec-high`
//! - `components`: the Audio/Video and DOM sub-component lists
//! - `releases`: `_esr52`, `56`, `57`, `58`
//! - `flag_prefix`: `cf_status_firefox`
//! - `output`: `human`
//! - `artifact`: `output.json` (empty string disables the artifact)
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default tracker endpoint.
pub const DEFAULT_SERVER: &str = "https://bugzilla.mozilla.org";

/// Default per-release status field prefix.
pub const DEFAULT_FLAG_PREFIX: &str = "cf_status_firefox";

fn default_severities() -> Vec<String> {
    ["sec-critical", "sec-high"].map(String::from).to_vec()
}

fn default_releases() -> Vec<String> {
    ["_esr52", "56", "57", "58"].map(String::from).to_vec()
}

// TODO: fetch the component list from the tracker's product API instead of
// hardcoding this subset.
fn default_components() -> Vec<String> {
    [
        "Audio/Video",
        "Audio/Video: cubeb",
        "Audio/Video: GMP",
        "Audio/Video: MediaStreamGraph",
        "Audio/Video: Playback",
        "Audio/Video: Recording",
        "DOM",
        "DOM: Animation",
        "DOM: Content Processes",
        "DOM: Core & HTML",
        "DOM: CSS Object Model",
        "DOM: Device Interfaces",
        "DOM: Events",
        "DOM: File",
        "DOM: Flyweb",
        "DOM: IndexedDB",
    ]
    .map(String::from)
    .to_vec()
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `secmetrics.toml|yaml`.
pub struct FileConfig {
    pub server: Option<String>,
    pub severities: Option<Vec<String>>,
    pub components: Option<Vec<String>>,
    pub releases: Option<Vec<String>>,
    #[serde(rename = "flagPrefix")]
    pub flag_prefix: Option<String>,
    pub output: Option<String>,
    pub artifact: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the collect run.
pub struct Effective {
    pub root: PathBuf,
    pub server: String,
    pub severities: Vec<String>,
    pub components: Vec<String>,
    pub releases: Vec<String>,
    pub flag_prefix: String,
    pub output: String,
    /// `None` when the artifact is disabled.
    pub artifact: Option<PathBuf>,
}

/// Walk upward from `start` to find the directory holding a config file.
///
/// Stops when a `secmetrics.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("secmetrics.toml").exists()
            || cur.join("secmetrics.yaml").exists()
            || cur.join("secmetrics.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `FileConfig` from `secmetrics.toml` or `secmetrics.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<FileConfig> {
    let toml_path = root.join("secmetrics.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: FileConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["secmetrics.yaml", "secmetrics.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: FileConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_server: Option<&str>,
    cli_severities: Option<&str>,
    cli_releases: Option<&str>,
    cli_output: Option<&str>,
    cli_artifact: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let server = cli_server
        .map(|s| s.to_string())
        .or(cfg.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let severities = cli_severities
        .map(split_list)
        .or(cfg.severities)
        .unwrap_or_else(default_severities);

    let releases = cli_releases
        .map(split_list)
        .or(cfg.releases)
        .unwrap_or_else(default_releases);

    let components = cfg.components.unwrap_or_else(default_components);

    let flag_prefix = cfg
        .flag_prefix
        .unwrap_or_else(|| DEFAULT_FLAG_PREFIX.to_string());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let artifact = cli_artifact
        .map(|s| s.to_string())
        .or(cfg.artifact)
        .unwrap_or_else(|| "output.json".to_string());
    let artifact = if artifact.is_empty() {
        None
    } else {
        Some(root.join(artifact))
    };

    Effective {
        root,
        server,
        severities,
        components,
        releases,
        flag_prefix,
        output,
        artifact,
    }
}

/// Split a comma-separated CLI list, dropping empty tokens.
fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
