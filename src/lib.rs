//! vockit: Pascal VOC dataset checks and COCO conversion.
//!
//! vockit works on a dataset laid out as a directory of images plus a
//! directory with one VOC XML annotation per image, joined by file stem.
//! It provides three tools:
//!
//! - [`pairing`]: verify every image has an annotation and vice versa
//! - [`count`]: per-class instance counts across all annotations
//! - [`conversion`]: convert the dataset into a single COCO JSON document
//!
//! # Modules
//!
//! - [`ir`]: dataset model, label table, box normalization, VOC/COCO I/O
//! - [`error`]: error types for vockit operations

pub mod conversion;
pub mod count;
pub mod error;
pub mod ir;
pub mod pairing;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use error::VockitError;

/// The vockit CLI application.
#[derive(Parser)]
#[command(name = "vockit")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check that every image has a matching XML annotation and vice versa.
    CheckPairs(CheckPairsArgs),
    /// Count object instances per class across VOC XML files.
    Count(CountArgs),
    /// Convert VOC XML annotations to a single COCO JSON file.
    Convert(ConvertArgs),
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the check-pairs subcommand.
#[derive(clap::Args)]
struct CheckPairsArgs {
    /// Path to the images directory.
    #[arg(long)]
    images: PathBuf,

    /// Path to the XML annotations directory.
    #[arg(long)]
    annotations: PathBuf,

    /// Number of unmatched stems to list per side.
    #[arg(long, default_value_t = pairing::DEFAULT_PREVIEW_LIMIT)]
    preview: usize,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the count subcommand.
#[derive(clap::Args)]
struct CountArgs {
    /// Path to the annotations folder.
    #[arg(long = "ann-dir", visible_alias = "annotations")]
    ann_dir: PathBuf,

    /// Search XML files recursively.
    #[arg(long)]
    recursive: bool,

    /// Exclude objects with <difficult>1</difficult> from the class counts.
    #[arg(long)]
    exclude_difficult: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Path to the images directory.
    #[arg(long)]
    images: PathBuf,

    /// Path to the XML annotations directory.
    #[arg(long)]
    annotations: PathBuf,

    /// Output COCO JSON file (parent directories are created).
    #[arg(long)]
    output: PathBuf,

    /// Skip unknown class labels instead of failing.
    #[arg(long)]
    allow_unknown: bool,

    /// Class table entry NAME=ID[:SUPERCATEGORY]; repeat to replace the
    /// default car/motorbike table.
    #[arg(long = "class", value_name = "NAME=ID[:SUPER]")]
    classes: Vec<ir::ClassSpec>,

    /// Description for the COCO info block.
    #[arg(long)]
    description: Option<String>,

    /// Version string for the COCO info block.
    #[arg(long)]
    dataset_version: Option<String>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Run the vockit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), VockitError> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CheckPairs(args)) => run_check_pairs(args),
        Some(Commands::Count(args)) => run_count(args),
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("vockit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Pair-check, count and convert Pascal VOC datasets.");
            println!();
            println!("Run 'vockit --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing() {
    // Ignore the error when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Execute the check-pairs subcommand.
fn run_check_pairs(args: CheckPairsArgs) -> Result<(), VockitError> {
    let report = pairing::check_dataset_pairs(&args.images, &args.annotations)?
        .with_preview_limit(args.preview);

    emit(&report, args.report)?;

    if report.is_consistent() {
        Ok(())
    } else {
        Err(VockitError::PairingMismatch { report })
    }
}

/// Execute the count subcommand.
///
/// A missing or empty annotation directory is reported but is not a
/// failure: the counter has no error exit status of its own.
fn run_count(args: CountArgs) -> Result<(), VockitError> {
    let opts = count::CountOptions {
        recursive: args.recursive,
        exclude_difficult: args.exclude_difficult,
    };
    let report = match count::count_instances(&args.ann_dir, &opts) {
        Ok(report) => report,
        Err(
            err @ (VockitError::MissingDirectory { .. } | VockitError::NoAnnotationFiles { .. }),
        ) => {
            eprintln!("[ERROR] {err}");
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    emit(&report, args.report)
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), VockitError> {
    let label_map = if args.classes.is_empty() {
        ir::LabelMap::default()
    } else {
        ir::LabelMap::from_entries(args.classes)?
    };

    let info = ir::DatasetInfo {
        description: args.description,
        version: args.dataset_version,
        ..Default::default()
    };

    let opts = conversion::ConvertOptions::new(args.images, args.annotations)
        .allow_unknown_labels(args.allow_unknown)
        .with_label_map(label_map)
        .with_info(info);

    let conversion = conversion::convert_to_file(&opts, &args.output)?;
    emit(&conversion.report, args.report)
}

fn emit<T>(report: &T, format: ReportFormat) -> Result<(), VockitError>
where
    T: Serialize + std::fmt::Display,
{
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|source| VockitError::ReportSerialize { source })?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }
    Ok(())
}
