use clap::{Args, Parser, Subcommand};
use neo_config::{LogFormat, NetworkType};
use neo_primitives::HardforkSelector;
use std::path::PathBuf;

/// Command-line arguments for the native contract inspector
#[derive(Parser, Debug, Clone)]
#[command(
    name = "neo-native",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect Neo N3 native contracts across hardforks",
    long_about = "Lists native contracts and their effective method tables at any hardfork, resolves methods the way the dispatcher does and plans validator registration and voting invocations."
)]
pub struct Cli {
    /// Path to the TOML node configuration
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Network preset; overrides the configured network
    #[arg(long = "network", value_name = "NETWORK", global = true)]
    pub network: Option<NetworkType>,

    /// Log filter directive, e.g. `debug` or `neo_native=trace`
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log output format (text, json, pretty)
    #[arg(long = "log-format", value_name = "FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the registered native contracts
    Contracts {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the effective method table of a contract
    Methods {
        /// Contract name or script hash
        #[arg(long, value_name = "NAME|HASH")]
        contract: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve one method the way the dispatcher would
    Resolve {
        /// Contract name or script hash
        #[arg(long, value_name = "NAME|HASH")]
        contract: String,

        /// Method name
        #[arg(long, short = 'm')]
        method: String,

        /// Number of arguments
        #[arg(long, default_value_t = 0)]
        argc: usize,

        #[command(flatten)]
        target: TargetArgs,

        /// Print JSON instead of a line of text
        #[arg(long)]
        json: bool,
    },
    /// Plan validator governance invocations
    #[command(subcommand)]
    Validator(ValidatorCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ValidatorCommand {
    /// Register a candidate
    Register {
        /// Compressed public key of the candidate, hex encoded
        #[arg(long, value_name = "HEX")]
        pubkey: String,

        /// Call registerCandidate instead of paying the fee with a GAS transfer
        #[arg(long)]
        use_register_call: bool,

        /// Registration fee in datoshi for the GAS transfer. Defaults to the
        /// genesis register price (1000 GAS), which differs from the on-chain
        /// value once the committee has called setRegisterPrice.
        #[arg(long, value_name = "DATOSHI")]
        register_price: Option<i64>,

        #[command(flatten)]
        target: TargetArgs,
    },
    /// Unregister a candidate
    Unregister {
        /// Compressed public key of the candidate, hex encoded
        #[arg(long, value_name = "HEX")]
        pubkey: String,

        #[command(flatten)]
        target: TargetArgs,
    },
    /// Vote for a candidate, or remove the vote when no candidate is given
    Vote {
        /// Voting account script hash
        #[arg(long, value_name = "HASH")]
        account: String,

        /// Compressed public key of the candidate, hex encoded
        #[arg(long, value_name = "HEX")]
        candidate: Option<String>,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Point on the hardfork timeline to inspect.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Hardfork name, `genesis` or `latest` (the newest this build knows).
    /// Defaults to the network's last scheduled hardfork.
    #[arg(long, value_name = "HARDFORK", conflicts_with = "height")]
    pub hardfork: Option<HardforkSelector>,

    /// Block height, mapped to a hardfork by the network settings
    #[arg(long, value_name = "HEIGHT")]
    pub height: Option<u32>,
}
