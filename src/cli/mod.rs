//! CLI command handlers

pub mod commands;

pub use commands::{format, format_table, preview, template, transform, FormatOutcome, FormatRequest};
