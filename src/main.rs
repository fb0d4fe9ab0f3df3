use clap::{Parser, Subcommand};
use colored::Colorize;
use deals_formatter::cli;
use deals_formatter::config::DealsConfig;
use deals_formatter::error::DealsResult;
use deals_formatter::excel::{FormatProfile, ZinnovLayout};
use deals_formatter::types::DeliverableKind;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "deals-formatter")]
#[command(about = "Outsourcing deals cleaner and dashboard formatter")]
#[command(long_about = "Deals Formatter - clean outsourcing deal exports and format dashboards

Reads a deals file and a headcount mapping (CSV or XLSX), cleans descriptions,
derives quarter labels, headcount ranges and contact evidence, removes
duplicates, and produces three deliverables:

  Internal  - 16 columns, full detail
  Client    - 11 columns, client-facing
  Zinnov    - 18 columns, partner export

COMMANDS:
  transform     - Write deliverable CSV files
  preview       - Show the first rows of a deliverable
  format        - Write the CSV and paste it into an Excel template
  format-table  - Paste any table into one of the seven template sheets
  template      - Scaffold a blank template workbook

EXAMPLES:
  deals-formatter transform -d deals.csv -c headcount.csv --all
  deals-formatter preview -d deals.csv -c headcount.csv --deliverable client
  deals-formatter format -d deals.csv -c headcount.csv -t template.xlsx --deliverable internal
  deals-formatter format -d deals.csv -c headcount.csv -t template.xlsx --deliverable zinnov --zinnov-layout client

CONFIG:
  Settings are read from --config or ./deals-formatter.yaml when present:

    title: Requested Accounts
    zinnov_layout: client
    out_dir: out

LOGGING:
  --verbose raises the log level to info. RUST_LOG overrides both.")]
#[command(version)]
struct Cli {
    /// YAML config file (default: ./deals-formatter.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show verbose steps and info-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean deals and write deliverable CSV files
    Transform {
        /// Deals file (.csv or .xlsx)
        #[arg(short, long)]
        deals: PathBuf,

        /// Headcount mapping file with Main and Range columns (.csv or .xlsx)
        #[arg(short = 'c', long)]
        headcount: PathBuf,

        /// Deliverable to write: internal, client or zinnov
        #[arg(long, required_unless_present = "all")]
        deliverable: Option<DeliverableKind>,

        /// Write all three deliverables
        #[arg(long, conflicts_with = "deliverable")]
        all: bool,

        /// Output directory
        #[arg(short, long, env = "DEALS_OUT_DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print the first rows of a deliverable
    Preview {
        /// Deals file (.csv or .xlsx)
        #[arg(short, long)]
        deals: PathBuf,

        /// Headcount mapping file (.csv or .xlsx)
        #[arg(short = 'c', long)]
        headcount: PathBuf,

        /// Deliverable to show: internal, client or zinnov
        #[arg(long, default_value = "internal")]
        deliverable: DeliverableKind,

        /// Number of rows to show
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Print JSON records instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the deliverable CSV and the formatted Excel workbook
    Format {
        /// Deals file (.csv or .xlsx)
        #[arg(short, long)]
        deals: PathBuf,

        /// Headcount mapping file (.csv or .xlsx)
        #[arg(short = 'c', long)]
        headcount: PathBuf,

        /// Excel template containing the dashboard sheets
        #[arg(short, long)]
        template: PathBuf,

        /// Deliverable to format: internal, client or zinnov
        #[arg(long)]
        deliverable: DeliverableKind,

        /// Title written into the sheet's title cell
        #[arg(long, env = "DEALS_TITLE")]
        title: Option<String>,

        /// Layout for the Zinnov deliverable: client or zinnov
        #[arg(long)]
        zinnov_layout: Option<ZinnovLayout>,

        /// Output directory
        #[arg(short, long, env = "DEALS_OUT_DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Paste any table into one of the template sheets
    FormatTable {
        /// Table to paste (.csv or .xlsx); the header row is not pasted
        input: PathBuf,

        /// Excel template containing the dashboard sheets
        #[arg(short, long)]
        template: PathBuf,

        /// internal, client, zinnov, digital-initiatives, techstack, hiring or key-signals
        #[arg(short, long)]
        profile: FormatProfile,

        /// Title written into the sheet's title cell
        #[arg(long, env = "DEALS_TITLE")]
        title: Option<String>,

        /// Worksheet to read when the input is .xlsx (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output workbook path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a blank template workbook with every dashboard sheet
    Template {
        /// Output workbook path
        output: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "deals_formatter=info"
    } else {
        "deals_formatter=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> DealsResult<()> {
    let config = DealsConfig::discover(cli.config.as_deref())?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Transform {
            deals,
            headcount,
            deliverable,
            all,
            out_dir,
        } => {
            let settings = config.resolve(None, None, out_dir);
            let kinds = if all {
                DeliverableKind::ALL.to_vec()
            } else {
                deliverable.into_iter().collect()
            };
            cli::transform(deals, headcount, kinds, settings.out_dir, verbose).map(|_| ())
        }

        Commands::Preview {
            deals,
            headcount,
            deliverable,
            rows,
            json,
        } => cli::preview(deals, headcount, deliverable, rows, json),

        Commands::Format {
            deals,
            headcount,
            template,
            deliverable,
            title,
            zinnov_layout,
            out_dir,
        } => {
            let request = cli::FormatRequest {
                deals,
                headcount,
                template,
                deliverable,
                settings: config.resolve(title, zinnov_layout, out_dir),
            };
            cli::format(request, verbose).map(|_| ())
        }

        Commands::FormatTable {
            input,
            template,
            profile,
            title,
            sheet,
            output,
        } => {
            let settings = config.resolve(title, None, None);
            cli::format_table(input, template, profile, settings.title, output, sheet).map(|_| ())
        }

        Commands::Template { output } => cli::template(output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}\n\n{}",
                "🚨 An error occurred while processing your files:".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}
