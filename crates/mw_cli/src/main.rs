use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use mw_collectors::logging::init_logging;
use mw_collectors::{check_sources_health, collect_all, http_client, SourceKind};
use mw_core::Config;
use mw_report::{print_terminal, render_digest, send_digest, write_preview};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Media monitoring digest for the performing arts labour market", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Write the HTML preview but do not send any email
    #[arg(long)]
    preview: bool,
    /// Print the categorized articles to the terminal instead of building a digest
    #[arg(long)]
    test: bool,
    /// Force debug logging
    #[arg(long)]
    debug: bool,
    /// Limit collection to one kind of source
    #[arg(long, value_enum, default_value_t = SourceKind::All)]
    source: SourceKind,
}

impl Cli {
    fn mode(&self) -> &'static str {
        if self.preview {
            "Preview"
        } else if self.test {
            "Test"
        } else {
            "Production"
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let client = http_client().context("failed to build HTTP client")?;

    info!("Checking source health...");
    let health = check_sources_health(&client, &config.sources).await;
    info!(
        healthy = health.healthy(),
        total = health.total(),
        "Source health checked"
    );

    let collected = collect_all(config, cli.source, &client).await;
    info!("Collected {} raw articles. Processing...", collected.len());

    let processed = mw_analysis::process(collected, config);

    if cli.test {
        info!("Test mode: Displaying results in terminal");
        print_terminal(&processed.categorized);
        return Ok(());
    }

    info!("Generating output...");
    let today = Local::now().date_naive();
    let html = render_digest(&processed.categorized, &processed.articles, &health, today);
    write_preview(&html, &config.app.preview_path).context("failed to write preview")?;

    if cli.preview {
        info!("Preview mode: email not sent");
        return Ok(());
    }
    if !config.email.enabled {
        info!("Email delivery disabled in config");
        return Ok(());
    }

    let email = config.email.clone();
    match tokio::task::spawn_blocking(move || send_digest(&email, &html, today)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "Failed to send digest"),
        Err(e) => error!(error = %e, "Email task failed"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if cli.debug {
        "debug"
    } else {
        config.app.log_level.as_str()
    };
    let _guard = match init_logging(level, &config.app.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging to {} disabled: {}", config.app.log_dir.display(), e);
            None
        }
    };

    info!("Starting media monitor v{}", config.app.version);
    info!("Mode: {}", cli.mode());
    if cli.source != SourceKind::All {
        info!(source = %cli.source, "Collecting from a single source kind");
    }

    match run(&cli, &config).await {
        Ok(()) => {
            info!("Run completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("An unexpected error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
