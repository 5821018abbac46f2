//! `instantiate`: resolve a concrete type for a contract and construct it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use abstract_synth::synthesis::MetricsSnapshot;

use super::output::print_json;
use super::Session;

#[derive(Parser, Debug)]
pub struct InstantiateCmd {
    /// Path to a JSON type manifest
    pub manifest: PathBuf,

    /// Full name of the contract type
    pub type_name: String,

    /// Also report synthesis metrics
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Debug, Serialize)]
struct InstantiateOutput {
    contract: String,
    concrete_type: String,
    module: String,
    synthesized: bool,
    stubs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsSnapshot>,
}

impl InstantiateCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let session = Session::load(&self.manifest)?;
        let contract = session.resolve_type(&self.type_name)?;
        let synthesizer = session.synthesizer();
        let instance = synthesizer.instantiate(contract)?;

        let def = instance.type_def();
        let output = InstantiateOutput {
            contract: self.type_name.clone(),
            concrete_type: instance.type_name(),
            module: def.as_ref().map(|d| d.module.clone()).unwrap_or_default(),
            synthesized: def.as_ref().map(|d| d.is_synthesized).unwrap_or(false),
            stubs: def
                .iter()
                .flat_map(|d| d.methods.iter())
                .filter(|m| m.is_stub())
                .map(|m| session.registry.display_signature(&m.name, &m.params))
                .collect(),
            metrics: self.metrics.then(|| synthesizer.metrics().snapshot()),
        };

        if json_output {
            return print_json(&output);
        }

        if output.synthesized {
            println!(
                "{} -> {} (synthesized in {})",
                output.contract, output.concrete_type, output.module
            );
            for stub in &output.stubs {
                println!("  stub {}", stub);
            }
        } else {
            println!("{} is already concrete", output.contract);
        }
        if let Some(metrics) = &output.metrics {
            println!();
            println!("{}", metrics.format_report());
        }
        Ok(())
    }
}
