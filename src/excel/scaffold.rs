//! Blank template workbook with every sheet the formatter targets

use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use super::profile::{cell_position, FormatProfile};
use crate::error::{DealsError, DealsResult};

/// Write a workbook with one sheet per profile.
///
/// Deal sheets get their deliverable header row directly above the paste
/// origin and a placeholder in the title cell.
pub fn scaffold_template(output_path: &Path) -> DealsResult<()> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(10)
        .set_italic();
    let header_format = Format::new()
        .set_font_name("Calibri")
        .set_font_size(10)
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    for profile in FormatProfile::ALL {
        let layout = profile.layout();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(layout.sheet_name)
            .map_err(|e| DealsError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let (title_col, title_row) = cell_position(layout.title_cell).ok_or_else(|| {
            DealsError::Export(format!("Invalid title cell '{}'", layout.title_cell))
        })?;
        worksheet
            .write_string_with_format(title_row - 1, (title_col - 1) as u16, "Title", &title_format)
            .map_err(|e| DealsError::Export(format!("Failed to write title: {}", e)))?;

        if let Some(kind) = profile.deliverable() {
            let header_row = layout.start_row - 2;
            for (offset, name) in kind.columns().iter().enumerate() {
                let col = (layout.start_col - 1) as u16 + offset as u16;
                worksheet
                    .write_string_with_format(header_row, col, *name, &header_format)
                    .map_err(|e| DealsError::Export(format!("Failed to write header: {}", e)))?;
            }
        }
    }

    workbook
        .save(output_path)
        .map_err(|e| DealsError::Export(format!("Failed to save Excel file: {}", e)))?;

    Ok(())
}
