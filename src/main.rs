use analytics_report::{
    Args, config::Config, reporter::Reporter, timer::Timer, transport::http_transport,
};
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse config
    let config = Config::from(Args::parse());

    // Setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    // Log flags after the level is set
    tracing::debug!(
        debug = config.debug,
        keyfile = %config.keyfile.display(),
        view_id = %config.view_id,
        "Parsed command line flags"
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let _timer = Timer::new("main");
    tracing::debug!("Setting up Google Analytics reporting service");

    let transport = http_transport(config.debug).context("Error while creating HTTP client")?;

    let reporter = Reporter::new(config, transport)
        .context("Error while creating Google Analytics Reporting Service")?;

    reporter
        .run()
        .await
        .context("Request to analyticsreporting/v4 failed")?;

    Ok(())
}
