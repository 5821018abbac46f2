//! Custom assertion utilities for tests.

use abstract_synth::{InvocationError, Value};

/// Assert that an invocation signalled not-implemented.
///
/// # Panics
///
/// Panics if the call succeeded or failed for another reason.
#[allow(dead_code)]
pub fn assert_not_implemented(result: Result<Value, InvocationError>, context: &str) {
    match result {
        Err(e) if e.is_not_implemented() => {}
        Err(e) => panic!("{}: expected not-implemented, got error: {}", context, e),
        Ok(v) => panic!("{}: expected not-implemented, got value: {:?}", context, v),
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}
