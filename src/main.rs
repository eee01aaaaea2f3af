use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use packagist_checker::{
    checker::{CheckOptions, PackagistChecker},
    config::Config,
    model::{AuditReport, Filter},
    output::{format_report_to_string, print_report, OutputFormat},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const BUGS_FOUND: u8 = 1;
    pub const ERROR: u8 = 2;
}

#[derive(Parser)]
#[command(name = "packagist-checker")]
#[command(
    author,
    version,
    about = "Check composer.lock dependencies for missed patch releases on Packagist"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the dependencies of a composer.lock file
    #[command(visible_aliases = ["security-check", "sc"])]
    Check {
        /// Path to your composer.lock file
        lock_file: PathBuf,

        /// URL of your company's Packagist instance
        #[arg(long, env = "PACKAGIST_URL")]
        packagist_url: Option<String>,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Only report packages with a newer patch release
        #[arg(long)]
        only_bugs: bool,

        /// Report every package, even if the config file sets only_bugs
        #[arg(long, conflicts_with = "only_bugs")]
        all: bool,

        /// Also check packages-dev
        #[arg(long)]
        dev: bool,

        /// Write output to file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let config = Config::load().unwrap_or_default();

    match cli.command {
        Commands::Check {
            lock_file,
            packagist_url,
            format,
            only_bugs,
            all,
            dev,
            output,
        } => {
            let format = format.unwrap_or_else(|| config.default_format.clone());
            let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
            let packagist_url = packagist_url.unwrap_or_else(|| config.packagist_url.clone());

            let options = CheckOptions {
                filter: resolve_filter(only_bugs, all, config.only_bugs),
                include_dev: dev || config.include_dev,
                ignore: config.ignore.clone(),
            };

            run_check(lock_file, &packagist_url, format, &options, output).await
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_check(
    lock_file: PathBuf,
    packagist_url: &str,
    format: OutputFormat,
    options: &CheckOptions,
    output_file: Option<PathBuf>,
) -> Result<u8> {
    let is_interactive = format == OutputFormat::Text && output_file.is_none();

    let mut checker = PackagistChecker::new();
    checker.set_packagist_url(packagist_url);
    info!(lock_file = %lock_file.display(), packagist = %checker.packagist_url(), "Checking dependencies");

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Querying Packagist...");
        Some(pb)
    } else {
        None
    };

    let result = checker.check(&lock_file, options).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;
    debug!(
        packages = report.packages.len(),
        bugs = report.bug_count(),
        "Check finished"
    );

    if let Some(path) = output_file {
        std::fs::write(&path, format_report_to_string(&report, format)?)?;
        println!("Results written to: {}", path.display());
    } else {
        print_report(&report, format)?;
    }

    Ok(determine_exit_code(&report))
}

/// Command-line flags win over the config file
fn resolve_filter(only_bugs: bool, all: bool, config_only_bugs: bool) -> Filter {
    if all {
        Filter::All
    } else if only_bugs || config_only_bugs {
        Filter::BugsOnly
    } else {
        Filter::All
    }
}

/// Nonzero as soon as any package is behind a patch release
fn determine_exit_code(report: &AuditReport) -> u8 {
    if report.has_bugs() {
        exit_codes::BUGS_FOUND
    } else {
        exit_codes::SUCCESS
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'packagist-checker config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
