//! Deal cleaning and deliverable derivation tests

use deals_formatter::error::DealsError;
use deals_formatter::input::{InputFile, InputFormat};
use deals_formatter::transform::{
    DealPipeline, DealTransformer, HeadcountMapping, CONTACT_EVIDENCE, FORMATTED_START_DATE,
    HEADCOUNT_RANGE, REQUIRED_COLUMNS, SECONDARY_RESEARCH,
};
use deals_formatter::types::{DeliverableKind, Table};
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

const ALL_DEAL_COLUMNS: [&str; 18] = [
    "Deal Id",
    "Client Name",
    "Client Subsidiary",
    "Draup Verticals",
    "Provider Name",
    "Client MSA",
    "Provider MSA",
    "Description",
    "Deal Start Date",
    "Deal End Date",
    "Headcount",
    "Linkedin Link",
    "Gmail Id",
    "Business Function",
    "Functional Workload",
    "Digital Product",
    "Skills",
    "Digital Technology Evidence",
];

/// Deal row builder: every column starts filled, overrides by name (None = null)
fn deal(overrides: &[(&str, Option<&str>)]) -> Vec<Option<String>> {
    ALL_DEAL_COLUMNS
        .iter()
        .map(|name| {
            if let Some((_, value)) = overrides.iter().find(|(col, _)| col == name) {
                return value.map(str::to_string);
            }
            let default = match *name {
                "Deal Start Date" => "2024-07-15",
                "Deal End Date" => "2025-01-31",
                "Headcount" => "100",
                "Linkedin Link" => "",
                "Gmail Id" => "",
                other => other,
            };
            (!default.is_empty()).then(|| default.to_string())
        })
        .collect()
}

fn deals_table(rows: Vec<Vec<Option<String>>>) -> Table {
    let mut table = Table::new(ALL_DEAL_COLUMNS);
    for row in rows {
        table.push_row(row);
    }
    table
}

fn mapping() -> HeadcountMapping {
    let mut table = Table::new(["Main", "Range"]);
    table.push_row(vec![Some("100".into()), Some("51-200".into())]);
    table.push_row(vec![Some("10".into()), Some("1-50".into())]);
    HeadcountMapping::from_table(&table).unwrap()
}

fn transformer() -> DealTransformer {
    DealTransformer::new().unwrap()
}

fn fixture(path: &str) -> InputFile {
    InputFile::read(path).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_required_columns_are_named() {
    let columns: Vec<&str> = ALL_DEAL_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "Gmail Id" && *c != "Client MSA")
        .collect();
    let table = Table::new(columns);

    let err = transformer().transform(&table, &mapping()).unwrap_err();
    match &err {
        DealsError::MissingColumns { columns, .. } => {
            assert_eq!(columns, &vec!["Gmail Id".to_string(), "Client MSA".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "Missing columns in Deals file: Gmail Id, Client MSA"
    );
}

#[test]
fn test_every_required_column_missing() {
    let table = Table::new(["Deal Id", "Skills"]);
    let err = transformer().transform(&table, &mapping()).unwrap_err();
    match err {
        DealsError::MissingColumns { columns, .. } => assert_eq!(columns, REQUIRED_COLUMNS.to_vec()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_each_single_missing_required_column() {
    for missing in REQUIRED_COLUMNS {
        let columns: Vec<&str> = ALL_DEAL_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != missing)
            .collect();
        let err = transformer()
            .transform(&Table::new(columns), &mapping())
            .unwrap_err();
        match err {
            DealsError::MissingColumns { columns, .. } => assert_eq!(columns, vec![missing]),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_missing_projection_column_is_reported() {
    let columns: Vec<&str> = ALL_DEAL_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "Deal Id" && *c != "Client Subsidiary")
        .collect();
    let err = transformer()
        .transform(&Table::new(columns), &mapping())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing columns in Deals file: Deal Id, Client Subsidiary"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// ROW DERIVATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_quarter_labels() {
    let table = deals_table(vec![
        deal(&[("Deal Id", Some("A")), ("Deal Start Date", Some("2024-07-15"))]),
        deal(&[
            ("Deal Id", Some("B")),
            ("Client Name", Some("Other")),
            ("Deal Start Date", Some("garbage")),
            ("Deal End Date", None),
        ]),
    ]);
    let views = transformer().transform(&table, &mapping()).unwrap();

    assert_eq!(views.zinnov.get(0, FORMATTED_START_DATE), Some("Q3 2024"));
    assert_eq!(views.zinnov.get(0, "Formatted End Date"), Some("Q1 2025"));
    assert_eq!(views.zinnov.get(1, FORMATTED_START_DATE), Some("-"));
    assert_eq!(views.zinnov.get(1, "Formatted End Date"), Some("-"));
    assert_eq!(views.internal.get(0, "Deal Start Date"), Some("2024-07-15"));
    assert_eq!(views.internal.get(1, "Deal Start Date"), Some("-"));
}

#[test]
fn test_description_cleanup_and_error_marker() {
    let table = deals_table(vec![
        deal(&[("Description", Some("=Cloud - migration=="))]),
        deal(&[("Client Name", Some("B")), ("Description", Some("#NAME?"))]),
        deal(&[("Client Name", Some("C")), ("Description", Some("see #NAME? here"))]),
        deal(&[("Client Name", Some("D")), ("Description", None)]),
    ]);
    let (cleaned, stats) = transformer().clean(&table, &mapping()).unwrap();

    assert_eq!(stats.error_marker_rows, 2);
    assert_eq!(cleaned.row_count(), 2);
    assert_eq!(cleaned.get(0, "Description"), Some("Cloud  migration"));
    assert_eq!(cleaned.get(1, "Description"), Some("-"));
}

#[test]
fn test_headcount_range_lookup() {
    let table = deals_table(vec![
        deal(&[("Headcount", Some("100"))]),
        deal(&[("Client Name", Some("B")), ("Headcount", Some("10.0"))]),
        deal(&[("Client Name", Some("C")), ("Headcount", Some("7"))]),
        deal(&[("Client Name", Some("D")), ("Headcount", None)]),
    ]);
    let views = transformer().transform(&table, &mapping()).unwrap();

    let ranges: Vec<Option<&str>> = (0..4).map(|r| views.internal.get(r, HEADCOUNT_RANGE)).collect();
    assert_eq!(ranges, vec![Some("51-200"), Some("1-50"), Some("-"), Some("-")]);
    assert_eq!(views.internal.get(3, "Headcount"), Some("-"));
}

#[test]
fn test_contact_evidence_column() {
    let table = deals_table(vec![
        deal(&[
            ("Linkedin Link", Some("https://linkedin.com/x")),
            ("Gmail Id", Some("a@gmail.com")),
        ]),
        deal(&[
            ("Client Name", Some("B")),
            ("Linkedin Link", None),
            ("Gmail Id", Some("a@gmail.com")),
        ]),
        deal(&[("Client Name", Some("C")), ("Linkedin Link", None), ("Gmail Id", None)]),
    ]);
    let views = transformer().transform(&table, &mapping()).unwrap();

    assert_eq!(views.zinnov.get(0, CONTACT_EVIDENCE), Some("https://linkedin.com/x"));
    assert_eq!(views.zinnov.get(1, CONTACT_EVIDENCE), Some("a@gmail.com"));
    assert_eq!(views.zinnov.get(2, CONTACT_EVIDENCE), Some(SECONDARY_RESEARCH));
}

// ═══════════════════════════════════════════════════════════════════════════
// DE-DUPLICATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_duplicates_collapse_to_first() {
    let table = deals_table(vec![
        deal(&[("Deal Id", Some("FIRST")), ("Deal Start Date", Some("2024-07-15"))]),
        // Same quarter, different day: still a duplicate
        deal(&[("Deal Id", Some("SECOND")), ("Deal Start Date", Some("2024-09-30"))]),
        // Different quarter: kept
        deal(&[("Deal Id", Some("THIRD")), ("Deal Start Date", Some("2024-10-01"))]),
        // Case differs: kept
        deal(&[("Deal Id", Some("FOURTH")), ("Client Name", Some("CLIENT NAME"))]),
    ]);
    let (cleaned, stats) = transformer().clean(&table, &mapping()).unwrap();

    assert_eq!(stats.duplicate_rows, 1);
    let ids: Vec<Option<&str>> = (0..cleaned.row_count()).map(|r| cleaned.get(r, "Deal Id")).collect();
    assert_eq!(ids, vec![Some("FIRST"), Some("THIRD"), Some("FOURTH")]);
}

#[test]
fn test_null_key_components_do_not_merge_distinct_deals() {
    let table = deals_table(vec![
        deal(&[
            ("Deal Id", Some("A")),
            ("Client Name", Some("Acme")),
            ("Provider Name", Some("Infosys")),
            ("Provider MSA", None),
        ]),
        deal(&[
            ("Deal Id", Some("B")),
            ("Client Name", Some("Beta")),
            ("Provider Name", Some("TCS")),
            ("Provider MSA", None),
        ]),
        // Same deal as A with the same missing MSA
        deal(&[
            ("Deal Id", Some("C")),
            ("Client Name", Some("Acme")),
            ("Provider Name", Some("Infosys")),
            ("Provider MSA", Some("")),
        ]),
    ]);
    let (cleaned, stats) = transformer().clean(&table, &mapping()).unwrap();

    assert_eq!(stats.duplicate_rows, 1);
    let ids: Vec<Option<&str>> = (0..cleaned.row_count()).map(|r| cleaned.get(r, "Deal Id")).collect();
    assert_eq!(ids, vec![Some("A"), Some("B")]);
}

#[test]
fn test_error_marker_matches_literally() {
    let table = deals_table(vec![
        deal(&[("Deal Id", Some("A")), ("Description", Some("Broken #NAME cell"))]),
        deal(&[("Deal Id", Some("B")), ("Client Name", Some("B")), ("Description", Some("Broken #NAME? cell"))]),
    ]);
    let (cleaned, stats) = transformer().clean(&table, &mapping()).unwrap();
    assert_eq!(stats.error_marker_rows, 1);
    assert_eq!(cleaned.get(0, "Deal Id"), Some("A"));
}

#[test]
fn test_dedup_uses_cleaned_description() {
    let table = deals_table(vec![
        deal(&[("Deal Id", Some("A")), ("Description", Some("Data-platform"))]),
        deal(&[("Deal Id", Some("B")), ("Description", Some("Data=platform"))]),
    ]);
    let views = transformer().transform(&table, &mapping()).unwrap();
    assert_eq!(views.client.row_count(), 1);
    assert_eq!(views.client.get(0, "Deal Id"), Some("A"));
}

// ═══════════════════════════════════════════════════════════════════════════
// VIEWS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_view_columns() {
    let views = transformer()
        .transform(&deals_table(vec![deal(&[])]), &mapping())
        .unwrap();

    for kind in DeliverableKind::ALL {
        assert_eq!(views.get(kind).columns(), kind.columns());
    }
    assert_eq!(views.internal.column_count(), 16);
    assert_eq!(views.client.column_count(), 11);
    assert_eq!(views.zinnov.column_count(), 18);
}

#[test]
fn test_no_nulls_or_empty_cells_in_views() {
    let table = deals_table(vec![deal(&[
        ("Draup Verticals", None),
        ("Skills", Some("")),
        ("Client Subsidiary", None),
    ])]);
    let views = transformer().transform(&table, &mapping()).unwrap();

    for kind in DeliverableKind::ALL {
        for row in views.get(kind).rows() {
            assert!(row.iter().all(|c| c.as_deref().is_some_and(|v| !v.is_empty())));
        }
    }
    assert_eq!(views.zinnov.get(0, "Client Subsidiary"), Some("-"));
}

#[test]
fn test_empty_input_gives_empty_views() {
    let views = transformer()
        .transform(&deals_table(vec![]), &mapping())
        .unwrap();
    assert!(views.internal.is_empty());
    assert_eq!(views.internal.to_csv_string().unwrap().lines().count(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURE FILES + PIPELINE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_fixture_internal_csv() {
    let mut pipeline = DealPipeline::new().unwrap();
    let views = pipeline
        .run(&fixture("test-data/deals.csv"), &fixture("test-data/headcount.csv"))
        .unwrap();

    let csv = views.internal.to_csv_string().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4, "header + D001, D004, D005");
    assert_eq!(
        lines[1],
        "D001,Acme Corp,Banking,Infosys,Acme MSA,Infosys MSA,51-200,Cloud migration  phase1,Q3 2024,IT,Infrastructure,Azure,Cloud;DevOps,Azure landing zone,100,2024-07-15"
    );
    assert_eq!(
        lines[2],
        "D004,Gamma Health,Healthcare,Wipro,Gamma MSA,Wipro MSA,-,Claims processing,-,Operations,Claims,Guidewire,Java,Claims platform,999,-"
    );
    assert_eq!(
        lines[3],
        "D005,Delta Energy,-,Accenture,Delta MSA,Accenture MSA,201-1000,Data platform,Q1 2023,Analytics,Reporting,Snowflake,SQL,-,500,2023-03-02"
    );
}

#[test]
fn test_fixture_zinnov_contact_evidence() {
    let mut pipeline = DealPipeline::new().unwrap();
    let views = pipeline
        .run(&fixture("test-data/deals.csv"), &fixture("test-data/headcount.csv"))
        .unwrap();

    let evidence: Vec<Option<&str>> = (0..views.zinnov.row_count())
        .map(|r| views.zinnov.get(r, CONTACT_EVIDENCE))
        .collect();
    assert_eq!(
        evidence,
        vec![
            Some("https://www.linkedin.com/in/jdoe"),
            Some("ops@gmail.com"),
            Some(SECONDARY_RESEARCH)
        ]
    );
    assert_eq!(views.zinnov.get(1, "Formatted End Date"), Some("Q1 2026"));
}

#[test]
fn test_transform_is_idempotent() {
    let deals = fixture("test-data/deals.csv");
    let headcount = fixture("test-data/headcount.csv");

    let first = DealPipeline::new().unwrap().run(&deals, &headcount).unwrap();
    let second = DealPipeline::new().unwrap().run(&deals, &headcount).unwrap();

    for kind in DeliverableKind::ALL {
        assert_eq!(
            first.get(kind).to_csv_string().unwrap(),
            second.get(kind).to_csv_string().unwrap()
        );
    }
}

#[test]
fn test_pipeline_memoizes_by_content() {
    let deals = fixture("test-data/deals.csv");
    let headcount = fixture("test-data/headcount.csv");
    let mut pipeline = DealPipeline::new().unwrap();

    let first = pipeline.run(&deals, &headcount).unwrap();
    let second = pipeline.run(&deals, &headcount).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(pipeline.cache().hits(), 1);

    // Same bytes under a different name still hit
    let renamed = InputFile::from_bytes("copy.csv", InputFormat::Csv, deals.bytes().to_vec());
    pipeline.run(&renamed, &headcount).unwrap();
    assert_eq!(pipeline.cache().hits(), 2);

    // Changed content misses
    let mut changed_bytes = deals.bytes().to_vec();
    changed_bytes.extend_from_slice(b"D006,New Co,,Retail,HCL,N MSA,HCL MSA,New deal,2022-05-01,,10,,,,,,,\n");
    let changed = InputFile::from_bytes("deals.csv", InputFormat::Csv, changed_bytes);
    let third = pipeline.run(&changed, &headcount).unwrap();
    assert_eq!(third.internal.row_count(), 4);
    assert_eq!(pipeline.cache().misses(), 2);
    assert_eq!(pipeline.cache().len(), 2);
}

#[test]
fn test_pipeline_surfaces_validation_errors() {
    let mut pipeline = DealPipeline::new().unwrap();
    let err = pipeline
        .run(
            &fixture("test-data/deals_missing_columns.csv"),
            &fixture("test-data/headcount.csv"),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing columns in Deals file: Gmail Id, Client MSA"
    );
    assert!(pipeline.cache().is_empty());
}
