//! Crate-level test helpers and cross-module tests.

pub mod helpers;

mod query;
