use drift_report::constants::DEFAULT_LOG_FILTER;
use drift_report::{pipeline, server, ReportConfig};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = ReportConfig::default();
    // The blocking download must not run inside the async runtime.
    let report = pipeline::run(&cfg)?;
    tracing::info!(
        files = report.files.len(),
        dir = %cfg.output_dir.display(),
        "Report written"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(server::serve(&cfg.output_dir, cfg.bind_addr))?;
    Ok(())
}
