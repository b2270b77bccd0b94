use anyhow::Result;
use clap::Parser;
use lookout_config::ConfigLoader;
use lookout_server::{init_logging, Lookout, SignalHandler};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "lookout.toml")]
    config: PathBuf,

    /// Validate the configuration, print it and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ConfigLoader::new(&args.config).load_validated()?;

    if args.check {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    init_logging(&config.logging)?;
    info!(config = %args.config.display(), "Starting Lookout");

    let app = Lookout::build(config)?;
    let (signals, _rx) = SignalHandler::new();

    let listener = signals.clone();
    tokio::spawn(async move {
        if let Err(e) = listener.wait_for_system_signal().await {
            error!(error = %e, "Failed to install signal handlers, shutting down");
            listener.trigger_shutdown();
        }
    });

    app.run(signals).await
}
