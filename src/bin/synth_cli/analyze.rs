//! `analyze`: print the obligation set of a type.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use abstract_synth::analyze_contract;

use super::output::{print_json, ObligationOutput};
use super::Session;

#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Path to a JSON type manifest
    pub manifest: PathBuf,

    /// Full name of the contract type
    pub type_name: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    contract: String,
    concrete: bool,
    obligations: Vec<ObligationOutput>,
}

impl AnalyzeCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let session = Session::load(&self.manifest)?;
        let contract = session.resolve_type(&self.type_name)?;
        let set = analyze_contract(&session.registry, Some(contract))?;

        let output = AnalyzeOutput {
            contract: self.type_name.clone(),
            concrete: session.registry.is_concrete(contract),
            obligations: set
                .iter()
                .map(|o| ObligationOutput::new(&session.registry, o))
                .collect(),
        };

        if json_output {
            return print_json(&output);
        }

        if output.obligations.is_empty() {
            println!("{}: no outstanding members", output.contract);
            return Ok(());
        }
        println!(
            "{}: {} outstanding member(s)",
            output.contract,
            output.obligations.len()
        );
        for obligation in &output.obligations {
            println!("  {}", obligation.line());
        }
        Ok(())
    }
}
