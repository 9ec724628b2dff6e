//! Registry inspection commands.

use super::{CommandContext, CommandResult};
use crate::args::TargetArgs;
use anyhow::Context;
use neo_native::{EffectiveMetadata, MethodEntry};
use neo_primitives::{HardforkSelector, UInt160};
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractSummary<'a> {
    id: i32,
    name: &'a str,
    hash: UInt160,
    active_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MethodTable<'a> {
    contract: &'a str,
    hash: UInt160,
    hardfork: String,
    methods: Vec<MethodEntry<'a>>,
}

pub fn list_contracts(context: &CommandContext, json: bool) -> CommandResult {
    let summaries: Vec<ContractSummary<'_>> = context
        .dispatcher()
        .registry()
        .contracts()
        .map(|entry| {
            let metadata = entry.metadata();
            ContractSummary {
                id: metadata.id(),
                name: metadata.name(),
                hash: metadata.hash(),
                active_in: HardforkSelector::At(metadata.active_in()).to_string(),
            }
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&summaries)?);
    }
    let mut output = String::new();
    for summary in &summaries {
        writeln!(
            output,
            "{:>4}  {:<16} {}  (from {})",
            summary.id, summary.name, summary.hash, summary.active_in
        )?;
    }
    Ok(output.trim_end().to_string())
}

pub fn list_methods(
    context: &CommandContext,
    contract: &str,
    target: &TargetArgs,
    json: bool,
) -> CommandResult {
    let entry = context.contract(contract)?;
    let hardfork = context.hardfork(target);
    let view = context
        .dispatcher()
        .effective_metadata(&entry.metadata().hash(), hardfork)
        .with_context(|| format!("{} has no method table", entry.metadata().name()))?;

    if json {
        let table = MethodTable {
            contract: entry.metadata().name(),
            hash: view.hash(),
            hardfork: HardforkSelector::At(view.hardfork()).to_string(),
            methods: view.methods().collect(),
        };
        return Ok(serde_json::to_string_pretty(&table)?);
    }
    render_methods(&view)
}

fn render_methods(view: &EffectiveMetadata) -> CommandResult {
    let mut output = String::new();
    writeln!(
        output,
        "{} at {}",
        view.contract().name(),
        HardforkSelector::At(view.hardfork())
    )?;
    for entry in view.methods() {
        let method = entry.descriptor;
        let parameters: Vec<String> = method
            .parameters
            .iter()
            .map(|parameter| format!("{}: {}", parameter.name, parameter.kind))
            .collect();
        writeln!(
            output,
            "  {}({}) -> {}  [{}] price {}{}",
            method.name,
            parameters.join(", "),
            method.return_type,
            method.required_call_flags,
            entry.price,
            if method.safe { " safe" } else { "" }
        )?;
    }
    Ok(output.trim_end().to_string())
}

pub fn resolve(
    context: &CommandContext,
    contract: &str,
    method: &str,
    argc: usize,
    target: &TargetArgs,
    json: bool,
) -> CommandResult {
    let entry = context.contract(contract)?;
    let hardfork = context.hardfork(target);
    let view = context
        .dispatcher()
        .effective_metadata(&entry.metadata().hash(), hardfork)?;
    let resolved = view.resolve(method, argc)?;

    if json {
        return Ok(serde_json::to_string_pretty(&resolved)?);
    }
    Ok(format!(
        "{}.{} at {}: descriptor #{}, flags {}, price {}",
        view.contract().name(),
        resolved.descriptor.signature(),
        HardforkSelector::At(view.hardfork()),
        resolved.index,
        resolved.descriptor.required_call_flags,
        resolved.price
    ))
}
