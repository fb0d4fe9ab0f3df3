//! Template-driven dashboard formatter
//!
//! Every target shares one rendering routine: title, paste, alignment,
//! column widths, borders, then a whole-sheet pass that centers `-` cells.

use std::path::Path;

use tracing::{debug, info};
use umya_spreadsheet::{
    Alignment, Border, Font, HorizontalAlignmentValues, Spreadsheet, VerticalAlignmentValues,
    Worksheet,
};

use super::profile::{column_number, FormatProfile, SheetProfile};
use crate::error::{DealsError, DealsResult};
use crate::types::{Table, PLACEHOLDER};

const FONT_NAME: &str = "Calibri";
const FONT_SIZE: f64 = 10.0;
const WIDTH_PADDING: f64 = 2.0;

/// Rectangle of pasted data, 1-based and inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRegion {
    pub sheet_name: String,
    pub first_row: u32,
    pub first_col: u32,
    pub rows: u32,
    pub cols: u32,
}

impl PasteRegion {
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn last_row(&self) -> u32 {
        self.first_row + self.rows.saturating_sub(1)
    }

    pub fn last_col(&self) -> u32 {
        self.first_col + self.cols.saturating_sub(1)
    }
}

/// Owns one template workbook for a single formatting sequence
pub struct DashboardFormatter {
    workbook: Spreadsheet,
    title: String,
}

impl DashboardFormatter {
    /// Load a template workbook from disk
    pub fn open<P: AsRef<Path>>(template: P, title: impl Into<String>) -> DealsResult<Self> {
        let path = template.as_ref();
        if !path.is_file() {
            return Err(DealsError::Template(format!(
                "Template file not found: {}",
                path.display()
            )));
        }

        let workbook = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
            DealsError::Template(format!("Failed to read template {}: {}", path.display(), e))
        })?;

        debug!(template = %path.display(), "template loaded");
        Ok(Self::from_workbook(workbook, title))
    }

    pub fn from_workbook(workbook: Spreadsheet, title: impl Into<String>) -> Self {
        Self {
            workbook,
            title: title.into(),
        }
    }

    pub fn workbook(&self) -> &Spreadsheet {
        &self.workbook
    }

    /// Fail with `SheetNotFound` unless the template has the profile's sheet
    pub fn ensure_sheet(&self, profile: FormatProfile) -> DealsResult<()> {
        let name = profile.layout().sheet_name;
        match self.workbook.get_sheet_by_name(name) {
            Some(_) => Ok(()),
            None => Err(DealsError::SheetNotFound(name.to_string())),
        }
    }

    pub fn internal_deals(&mut self, view: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::InternalDeals, view)
    }

    pub fn client_deals(&mut self, view: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::ClientDeals, view)
    }

    pub fn zinnov_deals(&mut self, view: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::ZinnovDeals, view)
    }

    pub fn digital_initiatives(&mut self, table: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::DigitalInitiatives, table)
    }

    pub fn techstack(&mut self, table: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::Techstack, table)
    }

    pub fn hiring(&mut self, table: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::Hiring, table)
    }

    pub fn key_signals(&mut self, table: &Table) -> DealsResult<PasteRegion> {
        self.apply(FormatProfile::KeySignals, table)
    }

    /// Paste `table` (header excluded) into the profile's sheet and style it
    pub fn apply(&mut self, profile: FormatProfile, table: &Table) -> DealsResult<PasteRegion> {
        let layout = profile.layout();
        let sheet = self
            .workbook
            .get_sheet_by_name_mut(layout.sheet_name)
            .ok_or_else(|| DealsError::SheetNotFound(layout.sheet_name.to_string()))?;

        let region = PasteRegion {
            sheet_name: layout.sheet_name.to_string(),
            first_row: layout.start_row,
            first_col: layout.start_col,
            rows: table.row_count() as u32,
            cols: table.column_count() as u32,
        };

        set_title(sheet, layout.title_cell, &self.title);
        paste_table(sheet, table, layout.start_row, layout.start_col);
        align_columns(sheet, layout)?;
        adjust_column_widths(sheet, layout.width_cols, WIDTH_PADDING)?;
        if !region.is_empty() {
            set_borders(sheet, &region);
        }
        center_dash_cells(sheet);

        info!(
            profile = %profile,
            sheet = layout.sheet_name,
            rows = region.rows,
            cols = region.cols,
            "table formatted"
        );
        Ok(region)
    }

    /// Write the workbook to `output`
    pub fn save<P: AsRef<Path>>(&self, output: P) -> DealsResult<()> {
        let path = output.as_ref();
        umya_spreadsheet::writer::xlsx::write(&self.workbook, path).map_err(|e| {
            DealsError::Export(format!("Failed to save Excel file {}: {}", path.display(), e))
        })?;
        info!(output = %path.display(), "workbook saved");
        Ok(())
    }
}

fn font(italic: bool) -> Font {
    let mut font = Font::default();
    font.set_name(FONT_NAME);
    font.set_size(FONT_SIZE);
    font.set_italic(italic);
    font
}

fn alignment(horizontal: HorizontalAlignmentValues, vertical: Option<VerticalAlignmentValues>) -> Alignment {
    let mut alignment = Alignment::default();
    alignment.set_horizontal(horizontal);
    if let Some(vertical) = vertical {
        alignment.set_vertical(vertical);
    }
    alignment
}

fn set_title(sheet: &mut Worksheet, address: &str, title: &str) {
    sheet.get_cell_mut(address).set_value_string(title);
    sheet.get_style_mut(address).set_font(font(true));
}

fn paste_table(sheet: &mut Worksheet, table: &Table, start_row: u32, start_col: u32) {
    for (row_offset, row) in table.rows().iter().enumerate() {
        let row_num = start_row + row_offset as u32;
        for (col_offset, value) in row.iter().enumerate() {
            let coordinate = (start_col + col_offset as u32, row_num);
            if let Some(text) = value.as_deref() {
                let cell = sheet.get_cell_mut(coordinate);
                match as_number(text) {
                    Some(number) => cell.set_value_number(number),
                    None => cell.set_value_string(text),
                };
            }
            sheet.get_style_mut(coordinate).set_font(font(false));
        }
    }
}

/// Center columns first, then left columns, from the paste row to the last used row
fn align_columns(sheet: &mut Worksheet, layout: &SheetProfile) -> DealsResult<()> {
    let (_, max_row) = sheet.get_highest_column_and_row();

    for col in layout.center_cols.clone() {
        for row in layout.start_row..=max_row {
            sheet.get_style_mut((col, row)).set_alignment(alignment(
                HorizontalAlignmentValues::Center,
                Some(VerticalAlignmentValues::Center),
            ));
        }
    }

    for letters in layout.left_cols {
        let col = letter_to_column(letters)?;
        for row in layout.start_row..=max_row {
            sheet
                .get_style_mut((col, row))
                .set_alignment(alignment(HorizontalAlignmentValues::Left, None));
        }
    }

    Ok(())
}

/// Width = longest non-empty value in the column (characters) + padding
fn adjust_column_widths(sheet: &mut Worksheet, columns: &[&str], padding: f64) -> DealsResult<()> {
    let (_, max_row) = sheet.get_highest_column_and_row();

    for letters in columns {
        let col = letter_to_column(letters)?;
        let max_length = (1..=max_row)
            .map(|row| sheet.get_value((col, row)).chars().count())
            .max()
            .unwrap_or(0);
        let width = max_length as f64 + padding;
        sheet.get_column_dimension_mut(letters).set_width(width);
        debug!(column = *letters, width, "column width set");
    }

    Ok(())
}

/// Thin grid everywhere, medium outer left/right/bottom edges
fn set_borders(sheet: &mut Worksheet, region: &PasteRegion) {
    let (last_row, last_col) = (region.last_row(), region.last_col());

    for row in region.first_row..=last_row {
        for col in region.first_col..=last_col {
            let borders = sheet.get_style_mut((col, row)).get_borders_mut();
            borders.get_left_mut().set_border_style(Border::BORDER_THIN);
            borders.get_right_mut().set_border_style(Border::BORDER_THIN);
            borders.get_top_mut().set_border_style(Border::BORDER_THIN);
            borders.get_bottom_mut().set_border_style(Border::BORDER_THIN);

            if col == region.first_col {
                borders.get_left_mut().set_border_style(Border::BORDER_MEDIUM);
            }
            if col == last_col {
                borders.get_right_mut().set_border_style(Border::BORDER_MEDIUM);
            }
            if row == last_row {
                borders.get_bottom_mut().set_border_style(Border::BORDER_MEDIUM);
            }
        }
    }
}

/// Whole-sheet pass: every cell holding exactly the placeholder is centered
fn center_dash_cells(sheet: &mut Worksheet) {
    let (max_col, max_row) = sheet.get_highest_column_and_row();

    let mut dash_cells = Vec::new();
    for row in 1..=max_row {
        for col in 1..=max_col {
            if sheet.get_value((col, row)) == PLACEHOLDER {
                dash_cells.push((col, row));
            }
        }
    }

    for coordinate in dash_cells {
        sheet
            .get_style_mut(coordinate)
            .set_alignment(alignment(HorizontalAlignmentValues::Center, None));
    }
}

fn letter_to_column(letters: &str) -> DealsResult<u32> {
    column_number(letters)
        .ok_or_else(|| DealsError::Template(format!("Invalid column letters '{}'", letters)))
}

/// Plain decimal literals are written as numbers; anything else stays text.
///
/// Leading zeros ("007") keep a value textual so identifiers survive.
/// Trailing fractional zeros are not preserved: "12.10" becomes 12.1.
fn as_number(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || int_part.len() > 15 {
        return None;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return None;
    }
    if let Some(frac_part) = frac_part {
        if !all_digits(frac_part) {
            return None;
        }
    }

    text.parse().ok()
}
