//! Batch entrypoint: annotate every discussion batch in the data directory.
//!
//! Usage: `cmv-analyze [DATA_DIR [OUTPUT_DIR]]`
//! Config comes from `config/analysis.toml` (or `$CMV_CONFIG_PATH`) and `CMV_*` env vars.

use cmv_discussion_analyzer::config::AnalysisConfig;
use cmv_discussion_analyzer::store::run_directory;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `CMV_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cmv_discussion_analyzer=info,cmv_analyze=info,warn"));

    let json = std::env::var("CMV_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn run() -> anyhow::Result<()> {
    let mut cfg = AnalysisConfig::load()?;

    let mut args = std::env::args().skip(1);
    if let Some(data) = args.next() {
        cfg.paths.data_dir = PathBuf::from(data);
    }
    if let Some(out) = args.next() {
        cfg.paths.output_dir = PathBuf::from(out);
    }

    let analyzer = cfg.build_analyzer()?;
    let reports = run_directory(&analyzer, &cfg.paths.data_dir, &cfg.paths.output_dir)?;

    let discussions: usize = reports.iter().map(|(_, r)| r.discussions.len()).sum();
    let deltas: usize = reports.iter().map(|(_, r)| r.total_awarded()).sum();
    let aborted: usize = reports.iter().map(|(_, r)| r.aborted()).sum();
    info!(files = reports.len(), discussions, deltas, aborted, "done");
    Ok(())
}

fn main() -> ExitCode {
    // Load .env if present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "analysis failed");
            ExitCode::FAILURE
        }
    }
}
