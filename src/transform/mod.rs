//! Deal cleaning and deliverable derivation
//!
//! The pipeline runs in a fixed order:
//! 1. required-column validation
//! 2. `-`/`=` removal from descriptions
//! 3. `#NAME?` row removal
//! 4. lenient date parsing
//! 5. quarter labels
//! 6. headcount range lookup
//! 7. contact evidence
//! 8. de-duplication (first row wins)
//! 9. placeholder fill
//! 10. projection into the Internal / Client / Zinnov views

pub mod cache;
pub mod dates;
pub mod headcount;

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{DealsError, DealsResult};
use crate::input::InputFile;
use crate::types::{Cell, DeliverableKind, Deliverables, Table, PLACEHOLDER};

pub use cache::{InputFingerprint, TransformCache};
pub use headcount::HeadcountMapping;

pub const DESCRIPTION: &str = "Description";
pub const DEAL_START_DATE: &str = "Deal Start Date";
pub const DEAL_END_DATE: &str = "Deal End Date";
pub const HEADCOUNT: &str = "Headcount";
pub const LINKEDIN_LINK: &str = "Linkedin Link";
pub const GMAIL_ID: &str = "Gmail Id";
pub const CLIENT_NAME: &str = "Client Name";
pub const PROVIDER_NAME: &str = "Provider Name";
pub const PROVIDER_MSA: &str = "Provider MSA";
pub const CLIENT_MSA: &str = "Client MSA";

pub const FORMATTED_START_DATE: &str = "Formatted Start Date";
pub const FORMATTED_END_DATE: &str = "Formatted End Date";
pub const HEADCOUNT_RANGE: &str = "Headcount Range";
pub const CONTACT_EVIDENCE: &str = "LinkedIn_URL_CVID";

/// Columns every deals file must carry
pub const REQUIRED_COLUMNS: [&str; 10] = [
    DESCRIPTION,
    DEAL_START_DATE,
    DEAL_END_DATE,
    HEADCOUNT,
    LINKEDIN_LINK,
    GMAIL_ID,
    CLIENT_NAME,
    PROVIDER_NAME,
    PROVIDER_MSA,
    CLIENT_MSA,
];

/// Columns the pipeline adds to every row
pub const DERIVED_COLUMNS: [&str; 4] = [
    FORMATTED_START_DATE,
    FORMATTED_END_DATE,
    HEADCOUNT_RANGE,
    CONTACT_EVIDENCE,
];

/// Spreadsheet error marker left behind by broken formulas
pub const ERROR_MARKER: &str = "#NAME?";

pub const SECONDARY_RESEARCH: &str = "Secondary Research";

/// Counters from one cleaning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub input_rows: usize,
    pub error_marker_rows: usize,
    pub duplicate_rows: usize,
    pub output_rows: usize,
}

/// Resolved positions of the columns the row derivations read and write
struct Positions {
    description: usize,
    start_date: usize,
    end_date: usize,
    headcount: usize,
    linkedin: usize,
    gmail: usize,
    client_name: usize,
    provider_name: usize,
    provider_msa: usize,
    formatted_start: usize,
    formatted_end: usize,
    headcount_range: usize,
    contact_evidence: usize,
}

/// Cleans raw deal tables and projects them into the three deliverables
pub struct DealTransformer {
    description_noise: Regex,
}

impl DealTransformer {
    pub fn new() -> DealsResult<Self> {
        let description_noise = Regex::new(r"[-=]")
            .map_err(|e| DealsError::Config(format!("Regex error: {}", e)))?;
        Ok(Self { description_noise })
    }

    /// Run every step and return the three views
    pub fn transform(&self, deals: &Table, mapping: &HeadcountMapping) -> DealsResult<Deliverables> {
        let (cleaned, _) = self.clean(deals, mapping)?;
        project(&cleaned)
    }

    /// Steps 1–9: the cleaned table with all input columns plus the derived ones
    pub fn clean(
        &self,
        deals: &Table,
        mapping: &HeadcountMapping,
    ) -> DealsResult<(Table, CleanStats)> {
        validate_columns(deals)?;

        let mut columns: Vec<String> = deals.columns().to_vec();
        let formatted_start = ensure_column(&mut columns, FORMATTED_START_DATE);
        let formatted_end = ensure_column(&mut columns, FORMATTED_END_DATE);
        let headcount_range = ensure_column(&mut columns, HEADCOUNT_RANGE);
        let contact_evidence = ensure_column(&mut columns, CONTACT_EVIDENCE);

        let pos = Positions {
            description: position(deals, DESCRIPTION)?,
            start_date: position(deals, DEAL_START_DATE)?,
            end_date: position(deals, DEAL_END_DATE)?,
            headcount: position(deals, HEADCOUNT)?,
            linkedin: position(deals, LINKEDIN_LINK)?,
            gmail: position(deals, GMAIL_ID)?,
            client_name: position(deals, CLIENT_NAME)?,
            provider_name: position(deals, PROVIDER_NAME)?,
            provider_msa: position(deals, PROVIDER_MSA)?,
            formatted_start,
            formatted_end,
            headcount_range,
            contact_evidence,
        };

        let mut stats = CleanStats {
            input_rows: deals.row_count(),
            ..CleanStats::default()
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut cleaned = Table::new(columns.iter().cloned());

        for raw in deals.rows() {
            let mut cells = raw.clone();
            cells.resize(columns.len(), None);

            cells[pos.description] = cells[pos.description]
                .as_deref()
                .map(|text| self.clean_description(text));
            if cells[pos.description]
                .as_deref()
                .is_some_and(|text| text.contains(ERROR_MARKER))
            {
                stats.error_marker_rows += 1;
                continue;
            }

            self.derive(&mut cells, &pos, mapping);

            let key = dedup_key(&cells, &pos);
            if !seen.insert(key) {
                stats.duplicate_rows += 1;
                continue;
            }

            fill_placeholders(&mut cells);
            cleaned.push_row(cells);
        }

        stats.output_rows = cleaned.row_count();
        if stats.error_marker_rows > 0 {
            warn!(
                rows = stats.error_marker_rows,
                "dropped rows whose description carries {}", ERROR_MARKER
            );
        }
        info!(
            input = stats.input_rows,
            error_marker = stats.error_marker_rows,
            duplicates = stats.duplicate_rows,
            output = stats.output_rows,
            "deals cleaned"
        );

        Ok((cleaned, stats))
    }

    /// Strip every `-` and `=` character
    pub fn clean_description(&self, text: &str) -> String {
        self.description_noise.replace_all(text, "").into_owned()
    }

    /// Steps 4–7 for one row
    fn derive(&self, cells: &mut [Cell], pos: &Positions, mapping: &HeadcountMapping) {
        let start = dates::parse_date(cells[pos.start_date].as_deref());
        let end = dates::parse_date(cells[pos.end_date].as_deref());

        cells[pos.start_date] = dates::iso_date(start);
        cells[pos.end_date] = dates::iso_date(end);
        cells[pos.formatted_start] = Some(dates::quarter_label(start));
        cells[pos.formatted_end] = Some(dates::quarter_label(end));

        cells[pos.headcount_range] = Some(
            mapping
                .lookup(cells[pos.headcount].as_deref())
                .unwrap_or(PLACEHOLDER)
                .to_string(),
        );

        cells[pos.contact_evidence] = Some(contact_evidence(
            cells[pos.linkedin].as_deref(),
            cells[pos.gmail].as_deref(),
        ));
    }
}

/// Linkedin link if it points at linkedin.com, else a Gmail address, else
/// [`SECONDARY_RESEARCH`]
pub fn contact_evidence(linkedin: Option<&str>, gmail: Option<&str>) -> String {
    if let Some(link) = linkedin.filter(|link| link.contains("linkedin.com")) {
        return link.to_string();
    }
    if let Some(mail) = gmail.filter(|mail| mail.contains("@gmail.com")) {
        return mail.to_string();
    }
    SECONDARY_RESEARCH.to_string()
}

/// Client + Provider + Description + Provider MSA + Formatted Start Date.
/// Null components count as empty strings.
fn dedup_key(cells: &[Cell], pos: &Positions) -> String {
    [
        pos.client_name,
        pos.provider_name,
        pos.description,
        pos.provider_msa,
        pos.formatted_start,
    ]
    .iter()
    .map(|&idx| cells[idx].as_deref().unwrap_or(""))
    .collect()
}

fn fill_placeholders(cells: &mut [Cell]) {
    for cell in cells.iter_mut() {
        if cell.as_deref().map_or(true, str::is_empty) {
            *cell = Some(PLACEHOLDER.to_string());
        }
    }
}

/// Required columns first, then whatever the projections still need
fn validate_columns(deals: &Table) -> DealsResult<()> {
    let missing = deals.missing_columns(&REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(DealsError::missing_columns("Deals", missing));
    }

    let projected = projection_source_columns();
    let missing = deals.missing_columns(&projected);
    if !missing.is_empty() {
        return Err(DealsError::missing_columns("Deals", missing));
    }
    Ok(())
}

/// Input columns read by the three views, in first-use order
pub fn projection_source_columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::new();
    for kind in DeliverableKind::ALL {
        for &name in kind.columns() {
            if !DERIVED_COLUMNS.contains(&name) && !columns.contains(&name) {
                columns.push(name);
            }
        }
    }
    columns
}

/// Index of `name`, appending it when absent (derived columns replace inputs of the same name)
fn ensure_column(columns: &mut Vec<String>, name: &str) -> usize {
    match columns.iter().position(|c| c == name) {
        Some(idx) => idx,
        None => {
            columns.push(name.to_string());
            columns.len() - 1
        }
    }
}

fn position(table: &Table, name: &str) -> DealsResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| DealsError::missing_columns("Deals", vec![name.to_string()]))
}

/// Step 10: fixed-column views of a cleaned table
pub fn project(cleaned: &Table) -> DealsResult<Deliverables> {
    let view = |kind: DeliverableKind| {
        debug!(deliverable = %kind, columns = kind.columns().len(), "projecting view");
        cleaned.select("Deals", kind.columns())
    };
    Ok(Deliverables {
        internal: view(DeliverableKind::Internal)?,
        client: view(DeliverableKind::Client)?,
        zinnov: view(DeliverableKind::Zinnov)?,
    })
}

//==============================================================================
// Pipeline
//==============================================================================

/// Transformer plus memoization keyed by the raw input bytes
pub struct DealPipeline {
    transformer: DealTransformer,
    cache: TransformCache,
}

impl DealPipeline {
    pub fn new() -> DealsResult<Self> {
        Ok(Self {
            transformer: DealTransformer::new()?,
            cache: TransformCache::new(),
        })
    }

    /// Deliverables for the given inputs, recomputed only when their content changed
    pub fn run(&mut self, deals: &InputFile, headcount: &InputFile) -> DealsResult<Arc<Deliverables>> {
        let fingerprint = InputFingerprint::of(deals.bytes(), headcount.bytes());
        let transformer = &self.transformer;
        self.cache.get_or_compute(fingerprint, || {
            debug!(deals = %deals.name(), headcount = %headcount.name(), "loading inputs");
            let deal_table = deals.to_table()?;
            let mapping = HeadcountMapping::from_table(&headcount.to_table()?)?;
            debug!(entries = mapping.len(), "headcount mapping built");
            transformer.transform(&deal_table, &mapping)
        })
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }
}
