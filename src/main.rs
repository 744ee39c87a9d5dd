//! secmetrics CLI binary entry point.
//! Resolves configuration, runs the collection passes, and prints results.

mod cli;
mod client;
mod config;
mod metrics;
mod models;
mod output;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use client::BugzillaClient;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Collect {
            root,
            server,
            severities,
            releases,
            output,
            artifact,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                server.as_deref(),
                severities.as_deref(),
                releases.as_deref(),
                output.as_deref(),
                artifact.as_deref(),
            );
            if eff.output != "human" && eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!("Unknown output mode '{}'. Use human or json.", eff.output)
                );
                std::process::exit(2);
            }
            if eff.severities.is_empty() || eff.releases.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "Nothing to collect: severities and releases must not be empty."
                );
                std::process::exit(2);
            }
            // Friendly note if no config file was found
            if config::load_config(&eff.root).is_none() && eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No secmetrics.toml found; using defaults."
                );
            }

            let client = BugzillaClient::new(&eff.server);
            let mut all = Vec::new();

            // All-components pass first, then every configured component,
            // each over every severity in order.
            let mut scopes = vec![String::new()];
            scopes.extend(eff.components.iter().cloned());
            for component in &scopes {
                for severity in &eff.severities {
                    let aggs = match metrics::collect(
                        &client,
                        severity,
                        component,
                        &eff.releases,
                        &eff.flag_prefix,
                    ) {
                        Ok(a) => a,
                        Err(e) => {
                            let scope = if component.is_empty() {
                                "ALL components"
                            } else {
                                component.as_str()
                            };
                            eprintln!(
                                "{} {}",
                                utils::error_prefix(),
                                format!("query failed ({} / {}): {}", scope, severity, e)
                            );
                            std::process::exit(1);
                        }
                    };
                    if let Some(path) = &eff.artifact {
                        for agg in &aggs {
                            if let Err(e) = output::append_artifact(path, agg) {
                                eprintln!(
                                    "{} {}",
                                    utils::error_prefix(),
                                    format!(
                                        "failed to append artifact {}: {}",
                                        path.to_string_lossy(),
                                        e
                                    )
                                );
                                std::process::exit(1);
                            }
                        }
                    }
                    output::print_pair(&aggs, &eff.output);
                    all.extend(aggs);
                }
            }
            output::print_collect(&all, &eff.output);
        }
    }
}
