//! Shared utilities for the retail ETL crates.
//!
//! This crate provides the value coercions every stage agrees on: how a raw
//! cell becomes a number, when a number counts as an exact integer, and how
//! money is rounded.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64, any_to_string, format_numeric, parse_exact_int, parse_f64,
    parse_truncated_int, round_to_cents,
};
