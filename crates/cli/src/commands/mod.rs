//! Command implementations. Each returns the text to print.

pub mod contracts;
pub mod validator;

use crate::args::{Cli, Command, TargetArgs, ValidatorCommand};
use anyhow::{Context, Result};
use neo_config::NodeConfig;
use neo_native::{Dispatcher, NativeEntry, NativeRegistry};
use neo_primitives::{Hardfork, UInt160};
use std::sync::Arc;
use tracing::debug;
use validator::ValidatorPlanner;

pub type CommandResult = Result<String>;

/// Loads the configuration file, if any, and applies the command-line
/// overrides on top of it.
pub fn load_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(network) = cli.network {
        config.protocol.network = network;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    Ok(config)
}

/// Registry and dispatcher for one network.
pub struct CommandContext {
    dispatcher: Dispatcher,
}

impl CommandContext {
    pub fn new(config: &NodeConfig) -> Result<Self> {
        let settings = config
            .protocol_settings()
            .context("invalid protocol settings")?;
        let registry =
            NativeRegistry::standard().context("failed to assemble the native registry")?;
        debug!(network = settings.network, contracts = registry.len(), "command context ready");
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(registry), settings),
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Looks a contract up by script hash or, failing that, by name.
    pub fn contract(&self, contract: &str) -> Result<&NativeEntry> {
        let registry = self.dispatcher.registry();
        let entry = match contract.parse::<UInt160>() {
            Ok(hash) => registry.lookup_by_hash(&hash),
            Err(_) => registry.lookup_by_name(contract),
        };
        entry.with_context(|| format!("unknown native contract '{contract}'"))
    }

    /// Hardfork selected by `--hardfork` or `--height`. Without either, the
    /// last hardfork the network schedules, which may precede the latest one
    /// this build knows (`--hardfork latest`).
    pub fn hardfork(&self, target: &TargetArgs) -> Option<Hardfork> {
        match (target.hardfork, target.height) {
            (Some(selector), _) => selector.resolve(),
            (None, Some(height)) => self.dispatcher.hardfork_at(height),
            (None, None) => self.dispatcher.settings().last_hardfork(),
        }
    }
}

/// Runs the parsed command.
pub fn run(cli: &Cli, config: &NodeConfig) -> CommandResult {
    let context = CommandContext::new(config)?;
    match &cli.command {
        Command::Contracts { json } => contracts::list_contracts(&context, *json),
        Command::Methods {
            contract,
            target,
            json,
        } => contracts::list_methods(&context, contract, target, *json),
        Command::Resolve {
            contract,
            method,
            argc,
            target,
            json,
        } => contracts::resolve(&context, contract, method, *argc, target, *json),
        Command::Validator(command) => {
            let request = match command {
                ValidatorCommand::Register {
                    pubkey,
                    use_register_call,
                    register_price,
                    target,
                } => ValidatorPlanner::new(&context, target)
                    .register(pubkey, *use_register_call, *register_price)?,
                ValidatorCommand::Unregister { pubkey, target } => {
                    ValidatorPlanner::new(&context, target).unregister(pubkey)?
                }
                ValidatorCommand::Vote {
                    account,
                    candidate,
                    target,
                } => ValidatorPlanner::new(&context, target).vote(account, candidate.as_deref())?,
            };
            Ok(serde_json::to_string_pretty(&request)?)
        }
    }
}
