//! Static sheet layouts, one per formatter target

use std::ops::Range;

use crate::error::DealsError;
use crate::types::DeliverableKind;

/// Where and how one table is pasted into its template sheet
#[derive(Debug)]
pub struct SheetProfile {
    pub sheet_name: &'static str,
    pub title_cell: &'static str,
    /// 1-based row of the first pasted data row
    pub start_row: u32,
    /// 1-based column of the first pasted data column
    pub start_col: u32,
    /// 1-based column numbers to center, end exclusive
    pub center_cols: Range<u32>,
    pub left_cols: &'static [&'static str],
    pub width_cols: &'static [&'static str],
}

pub static INTERNAL_DEALS: SheetProfile = SheetProfile {
    sheet_name: "Outsourcing Dashboard",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..16,
    left_cols: &["E", "J", "N", "O", "P"],
    width_cols: &["L"],
};

pub static CLIENT_DEALS: SheetProfile = SheetProfile {
    sheet_name: "deals",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..13,
    left_cols: &["E", "H", "K", "L", "M"],
    width_cols: &["L"],
};

pub static ZINNOV_DEALS: SheetProfile = SheetProfile {
    sheet_name: "zinnov",
    title_cell: "E3",
    start_row: 6,
    start_col: 7,
    center_cols: 7..22,
    left_cols: &["I", "N", "S", "T", "U", "V"],
    width_cols: &["J"],
};

pub static DIGITAL_INITIATIVES: SheetProfile = SheetProfile {
    sheet_name: "Digital Initiatives",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..12,
    left_cols: &["E", "G", "H", "K"],
    width_cols: &["F"],
};

pub static TECHSTACK: SheetProfile = SheetProfile {
    sheet_name: "Techstack Dashboard",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..8,
    left_cols: &[],
    width_cols: &[],
};

pub static HIRING: SheetProfile = SheetProfile {
    sheet_name: "Hiring Details",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..15,
    left_cols: &["E", "H", "I", "J", "K", "L", "M", "N"],
    width_cols: &["F"],
};

pub static KEY_SIGNALS: SheetProfile = SheetProfile {
    sheet_name: "Key Signals",
    title_cell: "C3",
    start_row: 6,
    start_col: 3,
    center_cols: 3..9,
    left_cols: &["E", "F", "G"],
    width_cols: &["H", "I"],
};

/// Formatter targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatProfile {
    InternalDeals,
    ClientDeals,
    ZinnovDeals,
    DigitalInitiatives,
    Techstack,
    Hiring,
    KeySignals,
}

impl FormatProfile {
    pub const ALL: [FormatProfile; 7] = [
        FormatProfile::InternalDeals,
        FormatProfile::ClientDeals,
        FormatProfile::ZinnovDeals,
        FormatProfile::DigitalInitiatives,
        FormatProfile::Techstack,
        FormatProfile::Hiring,
        FormatProfile::KeySignals,
    ];

    pub fn layout(&self) -> &'static SheetProfile {
        match self {
            FormatProfile::InternalDeals => &INTERNAL_DEALS,
            FormatProfile::ClientDeals => &CLIENT_DEALS,
            FormatProfile::ZinnovDeals => &ZINNOV_DEALS,
            FormatProfile::DigitalInitiatives => &DIGITAL_INITIATIVES,
            FormatProfile::Techstack => &TECHSTACK,
            FormatProfile::Hiring => &HIRING,
            FormatProfile::KeySignals => &KEY_SIGNALS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatProfile::InternalDeals => "internal",
            FormatProfile::ClientDeals => "client",
            FormatProfile::ZinnovDeals => "zinnov",
            FormatProfile::DigitalInitiatives => "digital-initiatives",
            FormatProfile::Techstack => "techstack",
            FormatProfile::Hiring => "hiring",
            FormatProfile::KeySignals => "key-signals",
        }
    }

    /// Header columns of the deliverable this profile was laid out for
    pub fn deliverable(&self) -> Option<DeliverableKind> {
        match self {
            FormatProfile::InternalDeals => Some(DeliverableKind::Internal),
            FormatProfile::ClientDeals => Some(DeliverableKind::Client),
            FormatProfile::ZinnovDeals => Some(DeliverableKind::Zinnov),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormatProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FormatProfile {
    type Err = DealsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        FormatProfile::ALL
            .into_iter()
            .find(|profile| profile.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = FormatProfile::ALL.iter().map(|p| p.name()).collect();
                DealsError::Config(format!(
                    "Unknown format profile '{}' (expected one of: {})",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Layout used for the Zinnov deliverable.
///
/// The Zinnov deliverable has historically been pasted with the client
/// layout, while a dedicated `zinnov` sheet layout also exists. Callers
/// choose explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZinnovLayout {
    Client,
    Zinnov,
}

impl ZinnovLayout {
    pub fn profile(&self) -> FormatProfile {
        match self {
            ZinnovLayout::Client => FormatProfile::ClientDeals,
            ZinnovLayout::Zinnov => FormatProfile::ZinnovDeals,
        }
    }
}

impl std::str::FromStr for ZinnovLayout {
    type Err = DealsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(ZinnovLayout::Client),
            "zinnov" => Ok(ZinnovLayout::Zinnov),
            other => Err(DealsError::Config(format!(
                "Unknown Zinnov layout '{}' (expected client or zinnov)",
                other
            ))),
        }
    }
}

/// Profile for a deliverable. `None` for Zinnov without an explicit layout.
pub fn profile_for(kind: DeliverableKind, zinnov_layout: Option<ZinnovLayout>) -> Option<FormatProfile> {
    match kind {
        DeliverableKind::Internal => Some(FormatProfile::InternalDeals),
        DeliverableKind::Client => Some(FormatProfile::ClientDeals),
        DeliverableKind::Zinnov => zinnov_layout.map(|layout| layout.profile()),
    }
}

/// Convert Excel letters to a 1-based column number ("A"→1, "AA"→27)
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, ch| {
        let ch = ch.to_ascii_uppercase();
        if ch.is_ascii_uppercase() {
            Some(acc * 26 + (ch as u32 - 'A' as u32 + 1))
        } else {
            None
        }
    })
}

/// Split an A1 address into (column, row), both 1-based
pub fn cell_position(address: &str) -> Option<(u32, u32)> {
    let split = address.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = address.split_at(split);
    let col = column_number(letters)?;
    let row: u32 = digits.parse().ok()?;
    (row > 0).then_some((col, row))
}
