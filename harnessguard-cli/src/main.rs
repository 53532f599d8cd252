//! HarnessGuard CLI - wire harness validation, reports and procurement export
//! from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use harnessguard::reports::{
    generate_mark_tube_list, generate_strip_list, to_csv, BomItem, CutlistItem, FromToItem,
    MarkTubeItem, StripListItem,
};
use harnessguard::{
    generate_bom, generate_cutlist, generate_fromto, ErrorType, HarnessGuardCore,
    HarnessGuardError, ProjectSettings, RulesEngine, ValidationOptions, ValidationResult,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tabled::{builder::Builder, settings::Style};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "harnessguard-cli")]
#[command(about = "Wire harness validation and manufacturing report tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct CatalogArgs {
    /// Directory of JSON catalog files overriding the built-in catalog
    #[arg(long, value_name = "DIR")]
    catalog: Option<PathBuf>,

    /// Do not enrich from or check against any catalog
    #[arg(long, conflicts_with = "catalog")]
    no_catalog: bool,
}

impl CatalogArgs {
    fn options(&self) -> ValidationOptions {
        ValidationOptions {
            use_catalog: !self.no_catalog,
            catalog_dir: self.catalog.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a harness file
    Check {
        /// Path to a harness JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project settings JSON (system voltage, RoHS/UL requirements)
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings of this kind exist
        #[arg(long, value_enum)]
        fail_on: Option<FailOn>,
    },

    /// Print a manufacturing report for a harness file
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        /// Path to a harness JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: ReportFormat,
    },

    /// Write the procurement CSV; refused while validation findings remain
    Export {
        /// Path to a harness JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Project settings JSON (system voltage, RoHS/UL requirements)
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List available validation rules
    Rules {
        /// Show detailed rule descriptions
        #[arg(short, long)]
        detailed: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
    /// GitLab CI format
    Gitlab,
}

#[derive(Clone, ValueEnum)]
enum FailOn {
    Any,
    DataQuality,
    Electrical,
    Compliance,
    Physical,
    Compatibility,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    Bom,
    Cutlist,
    Fromto,
    StripList,
    MarkTube,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
    Csv,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check {
            file,
            settings,
            catalog,
            format,
            fail_on,
        } => handle_check(&file, settings.as_deref(), &catalog.options(), format, fail_on),
        Commands::Report {
            kind,
            file,
            catalog,
            format,
        } => handle_report(kind, &file, &catalog.options(), format),
        Commands::Export {
            file,
            settings,
            catalog,
            output,
        } => handle_export(&file, settings.as_deref(), &catalog.options(), output.as_deref()),
        Commands::Rules { detailed } => {
            handle_rules(detailed);
            0
        }
    };

    process::exit(exit_code);
}

/// `RUST_LOG` wins when set; otherwise `-v` picks the level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<ProjectSettings, HarnessGuardError> {
    HarnessGuardCore::load_settings(path)
}

fn handle_check(
    file: &Path,
    settings: Option<&Path>,
    options: &ValidationOptions,
    format: OutputFormat,
    fail_on: Option<FailOn>,
) -> i32 {
    let result = load_settings(settings)
        .and_then(|settings| HarnessGuardCore::validate_file(file, &settings, options));

    match result {
        Ok(validation) => {
            if let Err(e) = output_results(&validation, &format) {
                eprintln!("Error: {}", e);
                return 1;
            }
            if let Some(fail_on) = fail_on {
                if should_fail(&validation, &fail_on) {
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn should_fail(result: &ValidationResult, fail_on: &FailOn) -> bool {
    match fail_on {
        FailOn::Any => !result.is_valid(),
        FailOn::DataQuality => result.has(ErrorType::DataQualityError),
        FailOn::Electrical => result.has(ErrorType::ElectricalError),
        FailOn::Compliance => result.has(ErrorType::ComplianceError),
        FailOn::Physical => result.has(ErrorType::PhysicalError),
        FailOn::Compatibility => result.has(ErrorType::CompatibilityError),
    }
}

fn output_results(result: &ValidationResult, format: &OutputFormat) -> Result<(), HarnessGuardError> {
    match format {
        OutputFormat::Human => output_human(result),
        OutputFormat::Json => output_json(result)?,
        OutputFormat::Github => output_github(result),
        OutputFormat::Gitlab => output_gitlab(result)?,
    }
    Ok(())
}

fn output_human(result: &ValidationResult) {
    println!("\nFile: {} ({})", result.file.display(), result.harness_name);
    println!("{}", "─".repeat(60));

    if result.is_valid() {
        println!("  No findings");
        return;
    }

    for error_type in ErrorType::ALL {
        let findings: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.error_type == error_type)
            .collect();
        if findings.is_empty() {
            continue;
        }
        println!("\n  {}:", error_type);
        for error in findings {
            println!("    - {}", error.message);
            println!("      {}: {}", error.component_type, error.component_id);
        }
    }

    println!("\n  Summary:");
    println!("    Data quality:  {}", result.stats.data_quality);
    println!("    Electrical:    {}", result.stats.electrical);
    println!("    Compliance:    {}", result.stats.compliance);
    println!("    Physical:      {}", result.stats.physical);
    println!("    Compatibility: {}", result.stats.compatibility);
}

fn output_json(result: &ValidationResult) -> Result<(), HarnessGuardError> {
    let output = serde_json::json!({
        "results": [result],
        "summary": {
            "total_files": 1,
            "total_errors": result.total_errors(),
            "valid": result.is_valid(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_github(result: &ValidationResult) {
    for error in &result.errors {
        println!(
            "::error file={},title={}::{}",
            result.file.display(),
            error.error_type,
            error.message.replace('\n', " ")
        );
    }
}

fn error_type_to_gitlab(error_type: ErrorType) -> &'static str {
    match error_type {
        ErrorType::ElectricalError | ErrorType::PhysicalError => "critical",
        ErrorType::ComplianceError | ErrorType::CompatibilityError => "major",
        ErrorType::DataQualityError => "minor",
    }
}

fn output_gitlab(result: &ValidationResult) -> Result<(), HarnessGuardError> {
    let reports: Vec<_> = result
        .errors
        .iter()
        .map(|error| {
            serde_json::json!({
                "description": error.message,
                "check_name": error.error_type.as_str(),
                "fingerprint": format!("{}:{}", error.error_type, error.component_id),
                "severity": error_type_to_gitlab(error.error_type),
                "location": {
                    "path": result.file.display().to_string(),
                }
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

/// BOM row with its group, for flat table and CSV output.
#[derive(Serialize)]
struct BomRow<'a> {
    category: &'static str,
    part_number: &'a str,
    manufacturer: &'a str,
    quantity: usize,
}

fn handle_report(kind: ReportKind, file: &Path, options: &ValidationOptions, format: ReportFormat) -> i32 {
    let harness = match HarnessGuardCore::load_catalog(options)
        .and_then(|catalog| HarnessGuardCore::load_harness(file, &catalog))
    {
        Ok(loaded) => loaded.harness,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let rendered = match kind {
        ReportKind::Bom => {
            let bom = generate_bom(&harness);
            let rows: Vec<BomRow> = bom
                .connectors
                .iter()
                .map(|item| bom_row("connector", item))
                .chain(bom.wires.iter().map(|item| bom_row("wire", item)))
                .collect();
            match format {
                ReportFormat::Json => serde_json::to_string_pretty(&bom).map_err(HarnessGuardError::from),
                ReportFormat::Csv => to_csv(&rows),
                ReportFormat::Table => Ok(table(
                    &["CATEGORY", "PART NUMBER", "MANUFACTURER", "QTY"],
                    rows.iter()
                        .map(|r| {
                            vec![
                                r.category.to_string(),
                                r.part_number.to_string(),
                                r.manufacturer.to_string(),
                                r.quantity.to_string(),
                            ]
                        })
                        .collect(),
                )),
            }
        }
        ReportKind::Cutlist => {
            let items = generate_cutlist(&harness).items;
            render_rows(&items, format, &["WIRE", "PART NUMBER", "COLOR", "LENGTH (mm)"], |i: &CutlistItem| {
                vec![
                    i.wire_id.clone(),
                    i.part_number.clone(),
                    i.color.clone(),
                    i.length.to_string(),
                ]
            })
        }
        ReportKind::Fromto => {
            let items = generate_fromto(&harness).items;
            render_rows(&items, format, &["WIRE", "FROM", "TO"], |i: &FromToItem| {
                vec![i.wire_id.clone(), i.from_location.clone(), i.to_location.clone()]
            })
        }
        ReportKind::StripList => {
            let items = generate_strip_list(&harness);
            render_rows(
                &items,
                format,
                &["WIRE", "STRIP A", "TERMINAL A", "STRIP B", "TERMINAL B"],
                |i: &StripListItem| {
                    vec![
                        i.wire_id.clone(),
                        optional(i.strip_length_a),
                        i.terminal_part_number_a.clone().unwrap_or_default(),
                        optional(i.strip_length_b),
                        i.terminal_part_number_b.clone().unwrap_or_default(),
                    ]
                },
            )
        }
        ReportKind::MarkTube => {
            let items = generate_mark_tube_list(&harness);
            render_rows(
                &items,
                format,
                &["TEXT", "QTY", "DIAMETER (mm)", "LENGTH (mm)"],
                |i: &MarkTubeItem| {
                    vec![
                        i.text_to_print.clone(),
                        i.quantity.to_string(),
                        i.diameter_mm.to_string(),
                        i.length_mm.to_string(),
                    ]
                },
            )
        }
    };

    match rendered {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn bom_row<'a>(category: &'static str, item: &'a BomItem) -> BomRow<'a> {
    BomRow {
        category,
        part_number: &item.part_number,
        manufacturer: &item.manufacturer,
        quantity: item.quantity,
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn render_rows<T: Serialize>(
    items: &[T],
    format: ReportFormat,
    headers: &[&str],
    cells: impl Fn(&T) -> Vec<String>,
) -> Result<String, HarnessGuardError> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        ReportFormat::Csv => to_csv(items),
        ReportFormat::Table => Ok(table(headers, items.iter().map(cells).collect())),
    }
}

/// Markdown-style table with a header row.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row);
    }
    let mut out = builder.build().with(Style::markdown()).to_string();
    out.push('\n');
    out
}

fn handle_export(
    file: &Path,
    settings: Option<&Path>,
    options: &ValidationOptions,
    output: Option<&Path>,
) -> i32 {
    let result = load_settings(settings)
        .and_then(|settings| HarnessGuardCore::export_procurement_file(file, &settings, options))
        .and_then(|export| export.to_csv());

    match result {
        Ok(csv) => match output {
            Some(path) => match fs::write(path, csv) {
                Ok(()) => {
                    eprintln!("Wrote procurement export to {}", path.display());
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            },
            None => {
                print!("{}", csv);
                0
            }
        },
        Err(HarnessGuardError::ExportRejected(rejected)) => {
            eprintln!("Error: {}", rejected);
            for error in &rejected.errors {
                eprintln!("  [{}] {}", error.error_type, error.message);
            }
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_rules(detailed: bool) {
    println!("Available validation rules:\n");

    let engine = RulesEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if detailed {
            println!("    {}", rule.description());
        }
        println!();
    }
}
