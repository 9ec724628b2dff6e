//! Validator governance: candidate registration and voting.
//!
//! Commands here do not sign or send anything. They produce the invocation a
//! wallet would sign, after checking that every method it relies on exists
//! at the target hardfork.

use super::CommandContext;
use crate::args::TargetArgs;
use anyhow::{anyhow, bail, Context, Result};
use neo_native::{GasToken, NeoToken, Value};
use neo_primitives::{signature_account, CallFlags, Hardfork, UInt160, WitnessScope};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A contract call together with the signer that authorizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub contract: UInt160,
    pub contract_name: String,
    pub method: String,
    pub args: Vec<Value>,
    pub signer: UInt160,
    pub scope: WitnessScope,
    /// Hardfork the plan was checked against; `null` is genesis.
    pub hardfork: Option<Hardfork>,
    pub required_call_flags: CallFlags,
    /// Fixed price of the entry method, dynamic fees excluded.
    pub price: i64,
}

pub struct ValidatorPlanner<'a> {
    context: &'a CommandContext,
    hardfork: Option<Hardfork>,
}

impl<'a> ValidatorPlanner<'a> {
    pub fn new(context: &'a CommandContext, target: &TargetArgs) -> Self {
        Self {
            context,
            hardfork: context.hardfork(target),
        }
    }

    pub fn hardfork(&self) -> Option<Hardfork> {
        self.hardfork
    }

    /// Registers `pubkey` as a candidate.
    ///
    /// With `use_register_call` this is a direct `registerCandidate` call
    /// witnessed by the entry script. Otherwise the fee is paid by a GAS
    /// transfer to NeoToken carrying the key as data, which needs a global
    /// witness since the registration happens inside the transfer callback.
    pub fn register(
        &self,
        pubkey: &str,
        use_register_call: bool,
        register_price: Option<i64>,
    ) -> Result<InvocationRequest> {
        let key = parse_pubkey(pubkey)?;
        let account = signature_account(&key).map_err(|err| anyhow!("invalid public key: {err}"))?;
        let neo = self.contract_hash(NeoToken::NAME)?;

        if use_register_call {
            return self.plan(
                NeoToken::NAME,
                "registerCandidate",
                vec![Value::Bytes(key)],
                account,
                WitnessScope::CALLED_BY_ENTRY,
            );
        }

        self.require(NeoToken::NAME, "onNEP17Payment", 3).context(
            "registration by GAS transfer is not available at this hardfork, use --use-register-call",
        )?;
        let price = register_price.unwrap_or_else(|| {
            warn!(
                price = NeoToken::DEFAULT_REGISTER_PRICE,
                "no --register-price given, using the genesis register price"
            );
            NeoToken::DEFAULT_REGISTER_PRICE
        });
        if price <= 0 {
            bail!("register price must be positive, got {price}");
        }
        self.plan(
            GasToken::NAME,
            "transfer",
            vec![
                Value::Hash160(account),
                Value::Hash160(neo),
                Value::Int(price),
                Value::Bytes(key),
            ],
            account,
            WitnessScope::GLOBAL,
        )
    }

    pub fn unregister(&self, pubkey: &str) -> Result<InvocationRequest> {
        let key = parse_pubkey(pubkey)?;
        let account = signature_account(&key).map_err(|err| anyhow!("invalid public key: {err}"))?;
        self.plan(
            NeoToken::NAME,
            "unregisterCandidate",
            vec![Value::Bytes(key)],
            account,
            WitnessScope::CALLED_BY_ENTRY,
        )
    }

    /// Votes from `account` for `candidate`; no candidate removes the vote.
    pub fn vote(&self, account: &str, candidate: Option<&str>) -> Result<InvocationRequest> {
        let account: UInt160 = account
            .parse()
            .with_context(|| format!("invalid account hash '{account}'"))?;
        let vote_to = match candidate {
            Some(candidate) => {
                let key = parse_pubkey(candidate)?;
                signature_account(&key).map_err(|err| anyhow!("invalid public key: {err}"))?;
                Value::Bytes(key)
            }
            None => Value::Null,
        };
        self.plan(
            NeoToken::NAME,
            "vote",
            vec![Value::Hash160(account), vote_to],
            account,
            WitnessScope::CALLED_BY_ENTRY,
        )
    }

    fn contract_hash(&self, name: &str) -> Result<UInt160> {
        Ok(self.context.contract(name)?.metadata().hash())
    }

    /// Checks that `name/argc` resolves on `contract` and returns its flags
    /// and price.
    fn require(&self, contract: &str, name: &str, argc: usize) -> Result<(CallFlags, i64)> {
        let hash = self.contract_hash(contract)?;
        let view = self
            .context
            .dispatcher()
            .effective_metadata(&hash, self.hardfork)?;
        let entry = view.resolve(name, argc)?;
        Ok((entry.descriptor.required_call_flags, entry.price))
    }

    fn plan(
        &self,
        contract: &str,
        method: &str,
        args: Vec<Value>,
        signer: UInt160,
        scope: WitnessScope,
    ) -> Result<InvocationRequest> {
        let (required_call_flags, price) = self
            .require(contract, method, args.len())
            .with_context(|| format!("{contract}.{method} cannot be invoked at this hardfork"))?;
        let request = InvocationRequest {
            contract: self.contract_hash(contract)?,
            contract_name: contract.to_string(),
            method: method.to_string(),
            args,
            signer,
            scope,
            hardfork: self.hardfork,
            required_call_flags,
            price,
        };
        debug!(?request, "planned invocation");
        info!(
            contract,
            method,
            signer = %signer,
            scope = %scope,
            "validator invocation ready"
        );
        Ok(request)
    }
}

fn parse_pubkey(pubkey: &str) -> Result<Vec<u8>> {
    let trimmed = pubkey.trim_start_matches("0x");
    hex::decode(trimmed).with_context(|| format!("public key '{pubkey}' is not valid hex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_config::{NetworkType, NodeConfig};

    const PUBKEY: &str = "03b209fd4f53a7170ea4444e0cb0a6bb6a53c2bd016926989cf85f9b0fba17a70c";

    fn context(network: NetworkType) -> CommandContext {
        let mut config = NodeConfig::default();
        config.protocol.network = network;
        CommandContext::new(&config).unwrap()
    }

    #[test]
    fn pubkey_accepts_prefix() {
        assert_eq!(parse_pubkey(&format!("0x{PUBKEY}")).unwrap().len(), 33);
        assert!(parse_pubkey("zz").is_err());
    }

    #[test]
    fn direct_registration_uses_called_by_entry() {
        let context = context(NetworkType::MainNet);
        let target = TargetArgs {
            hardfork: None,
            height: Some(7_299_999),
        };
        let planner = ValidatorPlanner::new(&context, &target);
        assert_eq!(planner.hardfork(), Some(Hardfork::HfDomovoi));
        let request = planner.register(PUBKEY, true, None).unwrap();
        assert_eq!(request.method, "registerCandidate");
        assert_eq!(request.scope, WitnessScope::CALLED_BY_ENTRY);
        assert_eq!(request.required_call_flags, CallFlags::STATES);
    }

    #[test]
    fn gas_registration_needs_echidna() {
        let context = context(NetworkType::MainNet);
        let before = TargetArgs {
            hardfork: None,
            height: Some(7_299_999),
        };
        assert!(ValidatorPlanner::new(&context, &before)
            .register(PUBKEY, false, None)
            .is_err());

        let after = TargetArgs {
            hardfork: None,
            height: Some(7_300_000),
        };
        let request = ValidatorPlanner::new(&context, &after)
            .register(PUBKEY, false, Some(5))
            .unwrap();
        assert_eq!(request.contract_name, "GasToken");
        assert_eq!(request.scope, WitnessScope::GLOBAL);
        assert_eq!(request.args[2], Value::Int(5));
        assert_eq!(request.args[1], Value::Hash160(neo_primitives::native_contract_hash("NeoToken")));
    }
}
