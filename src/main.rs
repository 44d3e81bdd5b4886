use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use fanlog::app::App;
use fanlog::config::{self, Config};
use fanlog::context::{AppContext, FrontEnd};
use fanlog::diagnostics;
use fanlog::logging::{FailureReporter, StderrReporter, TracingReporter};
use fanlog::workload::{self, WorkloadOptions};

/// Fan one log stream out to a rotating file, the console or a terminal viewer.
#[derive(Parser, Debug)]
#[command(name = "fanlog", version, about)]
struct Cli {
    /// Config file (defaults to ~/.fanlog/config.toml).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Dispatch debug records and enable debug diagnostics.
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Print to the console instead of opening the terminal viewer.
    #[arg(long = "headless")]
    headless: bool,

    /// Pages the demo workload crawls.
    #[arg(long = "pages", default_value_t = 40)]
    pages: u32,

    /// Delay between demo pages, in milliseconds.
    #[arg(long = "interval-ms", default_value_t = 250)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_file_path);
    let config = Config::load_from(&config_path)?;

    // Diagnostics BEFORE any tracing calls
    let diagnostics_dir = config::diagnostics_dir();
    let (diagnostics_info, _guard) = diagnostics::init_diagnostics(&diagnostics_dir, cli.debug)?;
    if let Ok(count) = diagnostics::cleanup_old_diagnostics(&diagnostics_dir) {
        if count > 0 {
            tracing::info!("Cleaned up {} old diagnostics files", count);
        }
    }
    tracing::info!(
        config = %config_path.display(),
        diagnostics = %diagnostics_info.path.display(),
        "fanlog starting"
    );

    let front_end = if cli.headless {
        FrontEnd::Headless
    } else {
        FrontEnd::Terminal
    };
    // Stderr would corrupt the terminal viewer
    let reporter: Arc<dyn FailureReporter> = match front_end {
        FrontEnd::Headless => Arc::new(StderrReporter),
        FrontEnd::Terminal => Arc::new(TracingReporter),
    };

    let context = AppContext::with_reporter(config, reporter);
    let debug_override = cli.debug.then_some(true);
    let setup = context.setup_logging(front_end, debug_override)?;

    let options = WorkloadOptions {
        pages: cli.pages,
        interval: Duration::from_millis(cli.interval_ms),
    };
    let stop = Arc::new(AtomicBool::new(false));
    let producer = workload::spawn(Arc::clone(&setup.logger), options, Arc::clone(&stop))
        .context("Failed to start workload thread")?;

    match front_end {
        FrontEnd::Terminal => {
            let mut app = App::new(setup, &context.config().ui, stop)?.with_producer(producer);
            app.run().await
        }
        FrontEnd::Headless => {
            let interrupt = Arc::clone(&stop);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    interrupt.store(true, Ordering::Relaxed);
                }
            });

            let summary = tokio::task::spawn_blocking(move || producer.join())
                .await
                .context("Failed to wait for workload thread")?
                .map_err(|_| anyhow::anyhow!("Workload thread panicked"))?;
            tracing::info!(?summary, "Workload finished");
            Ok(())
        }
    }
}
