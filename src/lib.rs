//! Deals Formatter - outsourcing deal cleanup and dashboard formatting
//!
//! This library cleans a raw deals export against a headcount reference,
//! derives the Internal, Client and Zinnov deliverables, and pastes any of
//! them into a pre-built Excel template with a fixed visual layout.
//!
//! # Features
//!
//! - Required-column validation with a message naming every missing column
//! - Lenient date parsing and fiscal-quarter labels (`Q3 2024`)
//! - Headcount range lookup and contact-evidence derivation
//! - First-wins de-duplication on a composite deal key
//! - In-process memoization keyed by input content
//! - Template formatter for seven dashboard sheets
//!
//! # Example
//!
//! ```no_run
//! use deals_formatter::excel::DashboardFormatter;
//! use deals_formatter::input::InputFile;
//! use deals_formatter::transform::DealPipeline;
//!
//! let deals = InputFile::read("deals.csv")?;
//! let headcount = InputFile::read("headcount.csv")?;
//!
//! let mut pipeline = DealPipeline::new()?;
//! let views = pipeline.run(&deals, &headcount)?;
//! println!("Internal rows: {}", views.internal.row_count());
//!
//! let mut formatter = DashboardFormatter::open("template.xlsx", "Requested Accounts")?;
//! formatter.internal_deals(&views.internal)?;
//! formatter.save("deals_internal_formatted.xlsx")?;
//! # Ok::<(), deals_formatter::error::DealsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod input;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use error::{DealsError, DealsResult};
pub use types::{DeliverableKind, Deliverables, Table};
