//! Entry point wiring CLI dispatch to the report workflow.

use anyhow::Result;
use mammo_lingua::{cli::Cli, config::Settings, logging};
use tracing::{info, instrument};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let settings = Settings::load()?;
    let cli = Cli::parse();

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
