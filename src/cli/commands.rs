use crate::config::Settings;
use crate::error::{DealsError, DealsResult};
use crate::excel::{profile_for, scaffold_template, DashboardFormatter, ExcelImporter, FormatProfile, PasteRegion};
use crate::input::{InputFile, InputFormat};
use crate::transform::DealPipeline;
use crate::types::{DeliverableKind, Table};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Widest a preview column is allowed to get before truncation
const PREVIEW_COLUMN_WIDTH: usize = 28;

/// Inputs of the `format` command
#[derive(Debug, Clone)]
pub struct FormatRequest {
    pub deals: PathBuf,
    pub headcount: PathBuf,
    pub template: PathBuf,
    pub deliverable: DeliverableKind,
    pub settings: Settings,
}

/// Files written by the `format` command
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    pub csv_path: PathBuf,
    pub xlsx_path: PathBuf,
    pub profile: FormatProfile,
    pub region: PasteRegion,
}

fn load_inputs(deals: &Path, headcount: &Path, verbose: bool) -> DealsResult<(InputFile, InputFile)> {
    if verbose {
        println!("{}", "📖 Reading input files...".cyan());
    }
    let deals = InputFile::read(deals)?;
    let headcount = InputFile::read(headcount)?;
    if verbose {
        println!(
            "   Deals: {} bytes, Headcount: {} bytes\n",
            deals.bytes().len(),
            headcount.bytes().len()
        );
    }
    Ok((deals, headcount))
}

fn write_csv(table: &Table, out_dir: &Path, kind: DeliverableKind) -> DealsResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(kind.csv_file_name());
    let file = fs::File::create(&path)?;
    table.write_csv(file)?;
    Ok(path)
}

/// Execute the transform command
pub fn transform(
    deals: PathBuf,
    headcount: PathBuf,
    deliverables: Vec<DeliverableKind>,
    out_dir: PathBuf,
    verbose: bool,
) -> DealsResult<Vec<PathBuf>> {
    println!("{}", "🧹 Deals Formatter - Cleaning deals".bold().green());
    println!("   Deals:     {}", deals.display());
    println!("   Headcount: {}\n", headcount.display());

    let (deals, headcount) = load_inputs(&deals, &headcount, verbose)?;
    let mut pipeline = DealPipeline::new()?;
    let views = pipeline.run(&deals, &headcount)?;

    let mut written = Vec::new();
    for kind in deliverables {
        let table = views.get(kind);
        let path = write_csv(table, &out_dir, kind)?;
        println!(
            "   📄 {} deliverable: {} rows → {}",
            kind.label().bright_blue().bold(),
            table.row_count(),
            path.display()
        );
        written.push(path);
    }

    println!("\n{}", "✅ CSV deliverables ready".bold().green());
    Ok(written)
}

/// Execute the preview command
pub fn preview(
    deals: PathBuf,
    headcount: PathBuf,
    deliverable: DeliverableKind,
    rows: usize,
    json: bool,
) -> DealsResult<()> {
    let (deals, headcount) = load_inputs(&deals, &headcount, false)?;
    let mut pipeline = DealPipeline::new()?;
    let views = pipeline.run(&deals, &headcount)?;
    let table = views.get(deliverable);

    if json {
        println!("{}", serde_json::to_string_pretty(&table.to_json_records(rows))?);
        return Ok(());
    }

    println!(
        "{}",
        format!("📋 Preview of {} Deliverable", deliverable.label())
            .bold()
            .green()
    );
    println!(
        "   {} rows × {} columns (showing {})\n",
        table.row_count(),
        table.column_count(),
        rows.min(table.row_count())
    );
    for line in render_preview(table, rows) {
        println!("{}", line);
    }
    Ok(())
}

/// Aligned text rendering of the first `rows` rows
pub fn render_preview(table: &Table, rows: usize) -> Vec<String> {
    let shown = &table.rows()[..rows.min(table.row_count())];

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            shown
                .iter()
                .map(|row| row[idx].as_deref().map_or(0, |v| v.chars().count()))
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .min(PREVIEW_COLUMN_WIDTH)
        })
        .collect();

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{:<width$}", truncate(text, width), width = width))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(shown.len() + 2);
    lines.push(render_row(table.columns().iter().map(String::as_str).collect()));
    lines.push(
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in shown {
        lines.push(render_row(row.iter().map(|c| c.as_deref().unwrap_or("")).collect()));
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Execute the format command: CSV download plus the formatted workbook
pub fn format(request: FormatRequest, verbose: bool) -> DealsResult<FormatOutcome> {
    let kind = request.deliverable;
    println!("{}", "🎨 Deals Formatter - Formatted Excel Output".bold().green());
    println!("   Deliverable: {}", kind.label().bright_blue().bold());
    println!("   Template:    {}", request.template.display());
    println!("   Title:       {}\n", request.settings.title);

    // Layout and target sheet are checked before any input is read or output written
    let profile = profile_for(kind, request.settings.zinnov_layout).ok_or_else(|| {
        DealsError::Config(
            "The Zinnov deliverable can use the client layout or the dedicated zinnov layout; \
             choose one with --zinnov-layout client|zinnov or `zinnov_layout` in the config file"
                .to_string(),
        )
    })?;
    let mut formatter = DashboardFormatter::open(&request.template, request.settings.title.clone())?;
    formatter.ensure_sheet(profile)?;

    let (deals, headcount) = load_inputs(&request.deals, &request.headcount, verbose)?;
    let mut pipeline = DealPipeline::new()?;
    let views = pipeline.run(&deals, &headcount)?;
    let table = views.get(kind);

    let csv_path = write_csv(table, &request.settings.out_dir, kind)?;
    println!("   📄 CSV: {} ({} rows)", csv_path.display(), table.row_count());

    if verbose {
        println!(
            "{}",
            format!("📊 Pasting into '{}'...", profile.layout().sheet_name).cyan()
        );
    }
    let region = formatter.apply(profile, table)?;

    let xlsx_path = request.settings.out_dir.join(kind.xlsx_file_name());
    formatter.save(&xlsx_path)?;
    println!("   📗 Excel: {}", xlsx_path.display());

    println!("\n{}", "✅ All files are ready!".bold().green());
    Ok(FormatOutcome {
        csv_path,
        xlsx_path,
        profile,
        region,
    })
}

/// Execute the format-table command for any profile
pub fn format_table(
    input: PathBuf,
    template: PathBuf,
    profile: FormatProfile,
    title: String,
    output: PathBuf,
    sheet: Option<String>,
) -> DealsResult<PasteRegion> {
    println!("{}", "🎨 Deals Formatter - Table Formatting".bold().green());
    println!("   Input:   {}", input.display());
    println!("   Profile: {}", profile.to_string().bright_blue().bold());
    println!("   Output:  {}\n", output.display());

    let mut formatter = DashboardFormatter::open(&template, title)?;
    formatter.ensure_sheet(profile)?;

    let file = InputFile::read(&input)?;
    let table = match (file.format(), sheet) {
        (InputFormat::Xlsx, Some(sheet)) => ExcelImporter::with_sheet(sheet).import(file.bytes())?,
        _ => file.to_table()?,
    };

    let region = formatter.apply(profile, &table)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    formatter.save(&output)?;

    println!(
        "{}",
        format!(
            "✅ {} rows × {} columns pasted into '{}'",
            region.rows, region.cols, region.sheet_name
        )
        .bold()
        .green()
    );
    Ok(region)
}

/// Execute the template command
pub fn template(output: PathBuf) -> DealsResult<()> {
    println!("{}", "📐 Deals Formatter - Template Scaffold".bold().green());
    scaffold_template(&output)?;
    println!("   Sheets:");
    for profile in FormatProfile::ALL {
        println!("      {}", profile.layout().sheet_name.cyan());
    }
    println!("\n{}", format!("✅ Template written: {}", output.display()).bold().green());
    Ok(())
}
