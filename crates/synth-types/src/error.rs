//! Error taxonomy for contract resolution, synthesis, and stub invocation.

use thiserror::Error;

/// Failures surfaced by the analyzer, the synthesizer, and the registry.
///
/// None of these are transient. Callers get them directly, nothing retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The contract reference is absent or does not name a registered type.
    #[error("invalid contract: {reason}")]
    InvalidContract { reason: String },

    /// The emitter cannot generate types in this process.
    #[error("type synthesis unavailable: {reason}")]
    SynthesisUnavailable { reason: String },

    /// The type cannot be default-constructed.
    #[error("cannot construct `{type_name}`: {reason}")]
    NotConstructible { type_name: String, reason: String },

    /// A type definition was rejected by the registry.
    #[error("invalid definition for `{type_name}`: {reason}")]
    Registration { type_name: String, reason: String },
}

impl SynthesisError {
    pub fn invalid_contract(reason: impl Into<String>) -> Self {
        SynthesisError::InvalidContract {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        SynthesisError::SynthesisUnavailable {
            reason: reason.into(),
        }
    }

    pub fn registration(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SynthesisError::Registration {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_constructible(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SynthesisError::NotConstructible {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the whole feature is unusable in this process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SynthesisError::SynthesisUnavailable { .. })
    }
}

/// Failures raised when calling a method on an [`Instance`](crate::Instance).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// A synthesized stub was called. Stubs never succeed.
    #[error("method `{type_name}.{method}` is not implemented")]
    NotImplemented { type_name: String, method: String },

    /// No instance method with that name and parameter list is reachable.
    #[error("no method `{method}({params})` on `{type_name}`")]
    MethodNotFound {
        type_name: String,
        method: String,
        params: String,
    },

    #[error("`{method}` expects {expected} argument(s), got {got}")]
    ArgumentCount {
        method: String,
        expected: usize,
        got: usize,
    },

    /// A native method body reported a failure of its own.
    #[error("`{method}` failed: {message}")]
    Failed { method: String, message: String },
}

impl InvocationError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, InvocationError::NotImplemented { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SynthesisError::invalid_contract("contract type is unset");
        assert_eq!(err.to_string(), "invalid contract: contract type is unset");
        assert!(!err.is_fatal());

        let err = SynthesisError::unavailable("emission disabled");
        assert!(err.is_fatal());

        let err = InvocationError::NotImplemented {
            type_name: "Geometry.ShapeImpl".to_string(),
            method: "Area".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "method `Geometry.ShapeImpl.Area` is not implemented"
        );
        assert!(err.is_not_implemented());
    }
}
