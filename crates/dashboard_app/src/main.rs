mod platform;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dashboard_engine::{resolve_base_url, ApiSettings, BaseUrlSources, DEFAULT_STATS_INTERVAL};
use dashboard_logging::{rag_info, rag_warn, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use platform::settings::{load_settings, DEFAULT_SETTINGS_FILENAME};
use platform::AppOptions;

/// Terminal dashboard for a retrieval-augmented-generation backend.
#[derive(Debug, Parser)]
#[command(name = "rag-dashboard", version, about)]
struct Cli {
    /// Base URL of the RAG API.
    #[arg(long, env = "RAG_API_URL")]
    api_url: Option<String>,

    /// RON settings file.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILENAME)]
    settings: PathBuf,

    /// Seconds between index-stats refreshes.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_secs: Option<u64>,

    /// Where log output goes: file, terminal or both.
    #[arg(long, default_value = "file")]
    log: LogDestination,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    dashboard_logging::initialize(cli.log, level, &cli.log_file);

    let settings = load_settings(&cli.settings);
    let params = settings.query_params();
    let poll_interval = resolve_poll_interval(cli.poll_secs, settings.poll_interval_secs);
    let resolved = resolve_base_url(&BaseUrlSources {
        build_time: option_env!("RAG_DASHBOARD_API_URL").map(str::to_string),
        runtime: cli.api_url,
        served_origin: settings.origin,
    });
    if resolved.is_degraded() {
        rag_warn!("Using fallback API url {}", resolved.url);
    } else {
        rag_info!("Using API url {} ({:?})", resolved.url, resolved.source);
    }

    let mut api = ApiSettings::new(resolved.url.clone());
    api.model_id = settings.model_id;

    platform::run_app(AppOptions {
        api,
        api_url_degraded: resolved.is_degraded(),
        poll_interval,
        params,
    })
    .with_context(|| format!("failed to start the engine for {}", resolved.url))
}

/// The flag wins over the settings file. A zero from the file is ignored.
fn resolve_poll_interval(flag_secs: Option<u64>, settings_secs: Option<u64>) -> Duration {
    let settings_secs = settings_secs.filter(|&secs| {
        if secs == 0 {
            rag_warn!("Ignoring poll_interval_secs = 0 in settings");
        }
        secs > 0
    });
    flag_secs
        .or(settings_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_STATS_INTERVAL)
}
