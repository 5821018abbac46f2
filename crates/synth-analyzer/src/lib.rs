//! Contract analysis.
//!
//! Given an abstract class or interface (the *contract*), computes the
//! ordered set of members a concrete type deriving from it would still have
//! to implement:
//! - [`analyzer`]: the chain walk, override cancellation and interface matching
//! - [`obligation`]: the resulting [`ObligationSet`]

pub mod analyzer;
pub mod obligation;

pub use analyzer::{analyze_contract, parameters_match, satisfies_interface_name, ContractAnalyzer};
pub use obligation::{MemberSignature, Obligation, ObligationOrigin, ObligationSet};
