//! Environment variable helpers used by configuration loaders.
//!
//! ```
//! use synth_types::env_utils::{env_bool_or, env_string_or};
//!
//! let emit = env_bool_or("ABSTRACT_SYNTH_EMIT", true);
//! let suffix = env_string_or("ABSTRACT_SYNTH_SUFFIX", "Impl");
//! ```

/// Read a boolean flag, falling back to `default` when the variable is unset.
///
/// `1`, `true`, `yes` and `on` (any case) are truthy; any other value set is false.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => parse_truthy(&v),
        None => default,
    }
}

/// Read a string, falling back to `default` when unset or blank.
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn parse_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_truthy() {
        assert!(parse_truthy("1"));
        assert!(parse_truthy("TRUE"));
        assert!(parse_truthy(" yes "));
        assert!(parse_truthy("On"));
        assert!(!parse_truthy("0"));
        assert!(!parse_truthy("off"));
        assert!(!parse_truthy(""));
    }

    #[test]
    fn test_unset_falls_back() {
        let key = "SYNTH_TYPES_TEST_SURELY_UNSET_VAR";
        assert!(env_bool_or(key, true));
        assert!(!env_bool_or(key, false));
        assert_eq!(env_string_or(key, "Impl"), "Impl");
    }
}
