//! Obligation computation over a contract's hierarchy.
//!
//! The walk itself lives in [`synth_types::members`], shared with the
//! registry's completeness check; this module resolves the contract and
//! shapes the result into an [`ObligationSet`].

use std::sync::Arc;

use tracing::debug;

use synth_types::members::{pending_members, PendingMember};
use synth_types::{SynthesisError, TypeDef, TypeId, TypeRegistry};

use crate::obligation::{MemberSignature, Obligation, ObligationOrigin, ObligationSet};

pub use synth_types::members::{parameters_match, satisfies_interface_name};

/// Computes obligation sets against a registry.
#[derive(Debug, Clone, Copy)]
pub struct ContractAnalyzer<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> ContractAnalyzer<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Compute the obligation set for `contract`.
    ///
    /// Fails with [`SynthesisError::InvalidContract`] when the reference is
    /// unset, unknown, or declared without a definition. A contract with no
    /// outstanding members yields an empty set.
    pub fn analyze(&self, contract: Option<TypeId>) -> Result<ObligationSet, SynthesisError> {
        let contract = self.resolve(contract)?;
        let id = contract.id;

        let chain = self
            .registry
            .base_chain(id)
            .ok_or_else(|| SynthesisError::invalid_contract(format!("unknown type #{}", id.index())))?;
        let interfaces = self.registry.interfaces(id).unwrap_or_default();

        let entries: Vec<Obligation> = pending_members(&chain, &interfaces)
            .into_iter()
            .map(obligation_from)
            .collect();

        debug!(
            contract = %contract.full_name(),
            obligations = entries.len(),
            "computed obligation set"
        );
        Ok(ObligationSet::new(id, entries))
    }

    fn resolve(&self, contract: Option<TypeId>) -> Result<Arc<TypeDef>, SynthesisError> {
        let id = contract.ok_or_else(|| SynthesisError::invalid_contract("contract type is unset"))?;
        let def = self
            .registry
            .get(id)
            .ok_or_else(|| SynthesisError::invalid_contract(format!("unknown type #{}", id.index())))?;
        if !def.is_defined {
            return Err(SynthesisError::invalid_contract(format!(
                "`{}` is declared but not defined",
                def.full_name()
            )));
        }
        Ok(def)
    }
}

/// Convenience wrapper around [`ContractAnalyzer::analyze`].
pub fn analyze_contract(
    registry: &TypeRegistry,
    contract: Option<TypeId>,
) -> Result<ObligationSet, SynthesisError> {
    ContractAnalyzer::new(registry).analyze(contract)
}

fn obligation_from(pending: PendingMember) -> Obligation {
    Obligation {
        signature: MemberSignature::from_method(&pending.method),
        declaring_type: pending.owner,
        declaring_type_name: pending.owner_name,
        origin: if pending.from_interface {
            ObligationOrigin::Interface
        } else {
            ObligationOrigin::Abstract
        },
    }
}
