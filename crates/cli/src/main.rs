use anyhow::Result;
use clap::Parser;
use neo_cli::{args::Cli, commands, logging::init_tracing};
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli)?;
    init_tracing(&config.logging);

    info!(
        target: "neo",
        version = neo_cli::VERSION,
        network = %config.protocol.network,
        "neo-native starting"
    );

    match commands::run(&cli, &config) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            error!(target: "neo", error = %err, "command failed");
            Err(err)
        }
    }
}
