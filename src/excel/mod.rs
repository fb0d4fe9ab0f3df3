//! Excel support
//!
//! - Import: first worksheet of an .xlsx input → Table
//! - Format: paste a Table into a styled template sheet
//! - Scaffold: blank template with every known sheet

mod formatter;
mod importer;
pub mod profile;
mod scaffold;

pub use formatter::{DashboardFormatter, PasteRegion};
pub use importer::ExcelImporter;
pub use profile::{profile_for, FormatProfile, SheetProfile, ZinnovLayout};
pub use scaffold::scaffold_template;
