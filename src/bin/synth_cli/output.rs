//! Human-readable and JSON rendering shared by the subcommands.

use anyhow::Result;
use serde::Serialize;

use abstract_synth::types::{TypeRef, TypeRegistry, Value};
use abstract_synth::Obligation;

#[derive(Debug, Serialize)]
pub struct ObligationOutput {
    pub name: String,
    pub params: Vec<String>,
    pub returns: String,
    pub declared_on: String,
    pub origin: &'static str,
}

impl ObligationOutput {
    pub fn new(registry: &TypeRegistry, obligation: &Obligation) -> Self {
        Self {
            name: obligation.name().to_string(),
            params: obligation
                .params()
                .iter()
                .map(|p| registry.display_type(p))
                .collect(),
            returns: registry.display_type(&obligation.signature.return_type),
            declared_on: obligation.declaring_type_name.clone(),
            origin: match obligation.origin {
                abstract_synth::analyzer::ObligationOrigin::Abstract => "abstract",
                abstract_synth::analyzer::ObligationOrigin::Interface => "interface",
            },
        }
    }

    /// `float Area()  [interface Geometry.IShape]`
    pub fn line(&self) -> String {
        format!(
            "{} {}({})  [{} {}]",
            self.returns,
            self.name,
            self.params.join(", "),
            self.origin,
            self.declared_on
        )
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a value the way it would read in source.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Void => "void".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Long(l) => l.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Str(s) => format!("{:?}", s),
        Value::Object(instance) => format!("<{}>", instance.type_name()),
        Value::Tuple(items) => format!(
            "({})",
            items.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
    }
}

pub fn format_params(registry: &TypeRegistry, params: &[TypeRef]) -> String {
    params
        .iter()
        .map(|p| registry.display_type(p))
        .collect::<Vec<_>>()
        .join(", ")
}
