//! Contest Tracker CLI
//!
//! Lists upcoming contests from every configured platform.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use contest_tracker::{
    error::{AppError, Result},
    models::{Config, Platform},
    pipeline::{Aggregator, Dashboard, DashboardView, PlatformFilter, RefreshOutcome},
};

/// contest-tracker - upcoming programming contests
#[derive(Parser, Debug)]
#[command(
    name = "contest-tracker",
    version,
    about = "Upcoming contests from Codeforces, CodeChef, LeetCode and AtCoder"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List contests starting within the look-ahead window
    List {
        /// Only show these platforms (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show how many contests each platform has
    Counts,

    /// List registered sources in registration order
    Sources,

    /// Validate the configuration file
    Validate,

    /// Refresh periodically until interrupted
    Watch {
        /// Seconds between refreshes
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
    },
}

/// Initialize logging at the given level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_counts(view: &DashboardView) {
    let summary: Vec<String> = view
        .counts
        .iter()
        .map(|(platform, count)| format!("{platform}: {count}"))
        .collect();
    println!(
        "Upcoming contests ({}) | {}",
        view.counts.total(),
        summary.join(" | ")
    );
}

fn print_contests(view: &DashboardView, template: &str) {
    if let Some(message) = view.empty_message() {
        println!("{message}");
        return;
    }

    let now = Utc::now();
    for contest in &view.contests {
        println!("{}", contest.format(template, now));
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    match cli.command {
        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sources)", config.id_prefixes().len());
        }
        command => run(command, &config).await?,
    }

    Ok(())
}

/// Run a command that needs the contest sources.
async fn run(command: Command, config: &Config) -> Result<()> {
    config.validate()?;
    let aggregator = Aggregator::from_config(config)?;

    match command {
        Command::Sources => {
            for (position, source) in aggregator.sources().iter().enumerate() {
                println!("{}. {} [{}]", position + 1, source.name(), source.platform());
            }
        }

        Command::Counts => {
            let dashboard = Dashboard::new(aggregator).with_window_days(config.fetch.window_days);
            dashboard.refresh().await;
            print_counts(&dashboard.view());
        }

        Command::List { platforms, json } => {
            let dashboard = Dashboard::new(aggregator).with_window_days(config.fetch.window_days);
            if let RefreshOutcome::Failed = dashboard.refresh().await {
                return Err(AppError::aggregation("could not load contests"));
            }

            let selection: PlatformFilter = platforms.into_iter().collect();
            for platform in selection.iter() {
                dashboard.toggle_platform(platform);
            }

            let view = dashboard.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view.contests)?);
            } else {
                print_counts(&view);
                print_contests(&view, &config.output.template);
            }
        }

        Command::Watch { interval_secs } => {
            let dashboard = Dashboard::new(aggregator).with_window_days(config.fetch.window_days);
            let interval = Duration::from_secs(interval_secs.max(1));

            loop {
                match dashboard.refresh().await {
                    RefreshOutcome::Skipped => log::debug!("Refresh skipped"),
                    _ => print_counts(&dashboard.view()),
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        log::info!("Interrupted, stopping");
                        break;
                    }
                }
            }
        }

        Command::Validate => {}
    }

    Ok(())
}
