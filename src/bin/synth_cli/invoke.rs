//! `invoke`: instantiate a contract and call one method on the result.
//!
//! Arguments are the default values of the parameter types. A stub call is
//! reported as a failure.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;

use abstract_synth::types::parse_type_ref;
use abstract_synth::{TypeRef, Value};

use super::output::{format_params, format_value, print_json};
use super::Session;

#[derive(Parser, Debug)]
pub struct InvokeCmd {
    /// Path to a JSON type manifest
    pub manifest: PathBuf,

    /// Full name of the contract type
    pub type_name: String,

    /// Method name
    pub method: String,

    /// Parameter types, in order (e.g. `--param int --param Zoo.Animal`)
    #[arg(long = "param", value_name = "TYPE")]
    pub params: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InvokeOutput {
    success: bool,
    instance_type: String,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    not_implemented: bool,
}

impl InvokeCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let session = Session::load(&self.manifest)?;
        let contract = session.resolve_type(&self.type_name)?;

        let resolve = |name: &str| session.registry.find(name);
        let params = self
            .params
            .iter()
            .map(|p| {
                parse_type_ref(p, &resolve).ok_or_else(|| anyhow!("unknown parameter type `{}`", p))
            })
            .collect::<Result<Vec<TypeRef>>>()?;
        let args: Vec<Value> = params.iter().map(Value::default_for).collect();

        let instance = session.synthesizer().instantiate(contract)?;
        let signature = format!(
            "{}({})",
            self.method,
            format_params(&session.registry, &params)
        );
        let outcome = instance.invoke(&self.method, &params, &args);

        let output = InvokeOutput {
            success: outcome.is_ok(),
            instance_type: instance.type_name(),
            method: signature,
            result: outcome.as_ref().ok().map(format_value),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            not_implemented: outcome
                .as_ref()
                .err()
                .map(|e| e.is_not_implemented())
                .unwrap_or(false),
        };

        if json_output {
            print_json(&output)?;
        } else if let Some(result) = &output.result {
            println!("{} on {} returned {}", output.method, output.instance_type, result);
        }

        outcome.map(|_| ()).map_err(anyhow::Error::new)
    }
}
