use std::path::PathBuf;

use charts::default_charts;
use clap::Parser;
use common::{hostinfo, style::Style};
use eyre::Result;
use tokio::fs::create_dir_all;
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Renders the copy-strategy benchmark report charts.
#[derive(Parser)]
struct Cli {
    /// Output directory for the generated charts
    #[arg(default_value = "results")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();

    let env_filter = EnvFilter::new(format!(
        "copybench_report={log_level},common={log_level},charts={log_level}"
    ));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();

    if let Err(err) = run(args).await {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Cli) -> Result<()> {
    create_dir_all(&args.out_dir).await?;

    let style = Style::init()?;
    let host_note = hostinfo::host_summary();
    debug!("Host note: {host_note:?}");

    println!("Generating report charts from recorded measurements...");
    for chart in default_charts() {
        debug!("Rendering {}", chart.name());
        chart.render(&style, host_note.as_deref(), &args.out_dir)?;
    }
    println!("✓ Charts written to: {}", args.out_dir.display());

    Ok(())
}
