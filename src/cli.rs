//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "secmetrics",
    version,
    about = "Security bug tracking metrics",
    long_about = "secmetrics — collect per-release security bug tracking metrics from a Bugzilla-compatible tracker.\n\nConfiguration precedence: CLI > secmetrics.toml > defaults.",
    after_help = "Examples:\n  secmetrics collect\n  secmetrics collect --output json\n  secmetrics collect --severities sec-critical,sec-high --releases 57,58\n  secmetrics collect --server https://bugzilla.mozilla.org --artifact metrics.json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current secmetrics version.")]
    Version,
    /// Collect metrics for the configured severities and components
    #[command(
        about = "Collect tracking metrics",
        long_about = "Query the tracker for each configured severity — first across all components, then per component — and report per-release tracked/affected/open counts. A query failure ends the run.",
        after_help = "Examples:\n  secmetrics collect\n  secmetrics collect --releases 57,58 --output json\n  secmetrics collect --artifact \"\"   (disable the JSON artifact)"
    )]
    Collect {
        #[arg(long, help = "Directory to search for secmetrics.toml (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Tracker base URL (default: https://bugzilla.mozilla.org)")]
        server: Option<String>,
        #[arg(long, help = "Comma-separated severity keywords (default: sec-critical,sec-high)")]
        severities: Option<String>,
        #[arg(long, help = "Comma-separated release identifiers (default: _esr52,56,57,58)")]
        releases: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "JSON artifact path, empty to disable (default: output.json)")]
        artifact: Option<String>,
    },
}
