#![allow(unused_imports, dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: manifest loading and type lookup
//! - `assertions`: assertion helpers with descriptive failure messages

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_error_contains, assert_not_implemented};
pub use fixtures::{fixture_path, load_fixture, synthesized_types, Fixture};
