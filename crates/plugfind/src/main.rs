use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, error, info};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use plugfind_core::plugin_system::dupe::group_by_id_and_version;
use plugfind_core::plugin_system::finder::ScanReport;
use plugfind_core::plugin_system::version::VersionKey;
use plugfind_core::{
    DuplicateSelector, FinderConfig, PluginCandidate, PluginClass, PluginFinder, Result,
};

/// plugfind: locate plugin installations and pick one per identifier
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (.json, .toml, .yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select one plugin per identifier
    Select {
        /// Plugin class the roots are loaded as
        #[arg(long)]
        class: Option<PluginClass>,
        /// Enable a feature toggle (repeatable)
        #[arg(long = "enable-feature", value_name = "FLAG")]
        enable_feature: Vec<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Plugin roots, searched in order
        roots: Vec<PathBuf>,
    },
    /// List every plugin found, grouped by identifier and version
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Plugin roots, searched in order
        roots: Vec<PathBuf>,
    },
}

#[derive(Serialize)]
struct SelectedPlugin<'a> {
    id: &'a str,
    version: &'a str,
    path: String,
}

#[derive(Serialize)]
struct ListedGroup<'a> {
    id: &'a str,
    buckets: Vec<ListedBucket>,
}

#[derive(Serialize)]
struct ListedBucket {
    version: String,
    paths: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    // Both calls fail only if a logger is already installed.
    tracing_log::LogTracer::init().ok();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            FinderConfig::load(path)?
        }
        None => FinderConfig::default(),
    };

    match args.command {
        Commands::Select {
            class,
            enable_feature,
            json,
            roots,
        } => {
            let report = scan(&config, roots).await?;
            let class = class.or(config.class).unwrap_or_default();
            let mut toggles = config.feature_toggles();
            toggles.extend(enable_feature);
            debug!("Selecting {} candidates as class {}", report.candidates.len(), class);

            let selector = DuplicateSelector::new(Arc::new(toggles));
            let selected = selector.filter(class, report.candidates);
            print_selected(&selected, json)
        }
        Commands::List { json, roots } => {
            let report = scan(&config, roots).await?;
            print_listing(&report.candidates, json)
        }
    }
}

async fn scan(config: &FinderConfig, roots: Vec<PathBuf>) -> Result<ScanReport> {
    let finder = PluginFinder::new(config.finder_options(roots));
    let report = finder.find().await?;
    for skipped in &report.skipped {
        eprintln!("Warning: skipped {}: {}", skipped.path.display(), skipped.error);
    }
    Ok(report)
}

fn print_selected(selected: &[PluginCandidate], json: bool) -> Result<()> {
    if json {
        let rows: Vec<SelectedPlugin<'_>> = selected
            .iter()
            .map(|candidate| SelectedPlugin {
                id: candidate.id(),
                version: candidate.version(),
                path: candidate.base().display().to_string(),
            })
            .collect();
        print_json(&rows)
    } else {
        for candidate in selected {
            println!(
                "{} {} {}",
                candidate.id(),
                VersionKey::from_declared(candidate.version()),
                candidate.base().display()
            );
        }
        Ok(())
    }
}

fn print_listing(candidates: &[PluginCandidate], json: bool) -> Result<()> {
    let groups = group_by_id_and_version(candidates);

    if json {
        let listed: Vec<ListedGroup<'_>> = groups
            .iter()
            .map(|group| ListedGroup {
                id: &group.id,
                buckets: group
                    .buckets
                    .iter()
                    .map(|bucket| ListedBucket {
                        version: bucket.key.to_string(),
                        paths: bucket
                            .members
                            .iter()
                            .map(|&index| candidates[index].base().display().to_string())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        return print_json(&listed);
    }

    for group in &groups {
        println!("{}", group.id);
        for bucket in &group.buckets {
            println!("  {} ({})", bucket.key, bucket.members.len());
            for &index in &bucket.members {
                println!("    {}", candidates[index].base().display());
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| plugfind_core::Error::Other(format!("Failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
