mod args;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aggregator_core::{
    load_config, load_config_from_env, validate_config, CollectionId, CommandAggregator,
    CommandRetriever, Config, PipelineRunner, RunReport,
};

use args::Cli;

/// Exit code for malformed invocations and configuration problems.
const EXIT_USAGE: i32 = 1;
/// Exit code for a failed pipeline run.
const EXIT_FAILURE: i32 = 2;

#[tokio::main]
async fn main() {
    // Usage text and exit 1 on malformed invocation.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let collection_id = match CollectionId::new(cli.collection_id.clone()) {
        Ok(id) => id,
        Err(e) => {
            error!("Invalid collection identifier: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    info!(
        input_root = %config.storage.input_root.display(),
        output_root = %config.storage.output_root.display(),
        temp_root = %config.storage.resolved_temp_root().display(),
        "Configuration loaded"
    );

    let runner = PipelineRunner::new(
        config.storage.clone(),
        CommandRetriever::new(config.retriever.clone()),
        CommandAggregator::new(config.aggregator.clone()),
    );

    match runner.run(&collection_id, cli.stage_set()).await {
        Ok(report) => {
            print_report(&report, cli.json);
        }
        Err(e) => {
            error!("Pipeline run failed: {:#}", anyhow::Error::from(e));
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Initialize logging
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve configuration: explicit flag, then $AGGREGATOR_CONFIG, then
/// config.toml in the working directory, then environment variables alone.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(|| {
        std::env::var("AGGREGATOR_CONFIG")
            .ok()
            .map(PathBuf::from)
    });

    let config = match path {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let default_path = PathBuf::from("config.toml");
            if default_path.exists() {
                load_config(&default_path).context("Failed to load config.toml")?
            } else {
                load_config_from_env()
                    .context("Failed to load configuration from environment")?
            }
        }
    };

    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn print_report(report: &RunReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => error!("Failed to render run report: {}", e),
        }
        return;
    }

    if let Some(retrieval) = &report.retrieval {
        info!(
            target_dir = %retrieval.target_dir.display(),
            duration_ms = retrieval.duration_ms,
            "Retrieved collection"
        );
    }
    if let Some(aggregation) = &report.aggregation {
        info!(
            output_bytes = aggregation.output_bytes,
            duration_ms = aggregation.duration_ms,
            "Aggregated collection"
        );
    }
    if let Some(promotion) = &report.promotion {
        info!(
            final_dir = %promotion.final_dir.display(),
            displaced_previous = promotion.displaced_previous,
            "Promoted output"
        );
    }
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    info!(
        run_id = %report.run_id,
        collection = %report.collection_id,
        stages = %report.stages,
        duration_ms = report.duration_ms,
        "Run completed"
    );
}
