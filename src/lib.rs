//! JDX: a versioned binary container for annotated image datasets.
//!
//! A JDX file packs encoded images together with their object-detection
//! annotations (class id plus normalized bounding box) behind a small
//! header carrying the format version, item count and class label table.
//! The header can be read on its own, so indexing many files stays cheap.
//!
//! # Modules
//!
//! - [`format`]: The on-disk format, its data model and codecs
//! - [`validation`]: Structural checks and dataset validation reports
//! - [`inspect`]: Header-only summaries
//! - [`manifest`]: JSON manifest interchange (pack/unpack)
//! - [`error`]: Error types for jdx operations

pub mod error;
pub mod format;
pub mod inspect;
pub mod manifest;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::JdxError;

use format::{AnnotationPolicy, ReadOptions, ReadWarning, DEFAULT_REGION_TOLERANCE};

/// The jdx CLI application.
#[derive(Parser)]
#[command(name = "jdx")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the header of a JDX file without reading its items.
    Inspect(InspectArgs),
    /// Read a JDX file completely and report errors and warnings.
    Validate(ValidateArgs),
    /// Build a JDX file from a JSON manifest and payload files.
    Pack(PackArgs),
    /// Extract payload files and a JSON manifest from a JDX file.
    Unpack(UnpackArgs),
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Annotation range-check mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AnnotationMode {
    /// Regions must lie inside the unit square.
    Strict,
    /// Regions may exceed the unit square by up to --tolerance.
    Lenient,
}

/// Annotation policy arguments shared by reading subcommands.
#[derive(clap::Args)]
struct PolicyArgs {
    /// How strictly annotation regions are range-checked.
    #[arg(long, value_enum, default_value_t = AnnotationMode::Lenient)]
    annotations: AnnotationMode,

    /// Allowed excess outside the unit square in lenient mode.
    #[arg(long, default_value_t = DEFAULT_REGION_TOLERANCE)]
    tolerance: f32,
}

impl PolicyArgs {
    fn policy(&self) -> AnnotationPolicy {
        match self.annotations {
            AnnotationMode::Strict => AnnotationPolicy::Strict,
            AnnotationMode::Lenient => AnnotationPolicy::Lenient {
                tolerance: self.tolerance,
            },
        }
    }
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// JDX file to inspect.
    input: PathBuf,

    /// Maximum number of labels to list.
    #[arg(long, default_value_t = 20)]
    max_labels: usize,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// JDX file to validate.
    input: PathBuf,

    /// Reject trailing data and treat warnings as errors.
    #[arg(long)]
    strict: bool,

    /// Do not check that payloads look like images.
    #[arg(long)]
    skip_payload_check: bool,

    #[command(flatten)]
    policy: PolicyArgs,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the pack subcommand.
#[derive(clap::Args)]
struct PackArgs {
    /// JSON manifest describing labels, payload files and annotations.
    manifest: PathBuf,

    /// Output JDX file.
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    policy: PolicyArgs,
}

/// Arguments for the unpack subcommand.
#[derive(clap::Args)]
struct UnpackArgs {
    /// JDX file to unpack.
    input: PathBuf,

    /// Output directory for payload files and manifest.json.
    #[arg(short, long)]
    output: PathBuf,

    /// Reject trailing data after the last item.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    policy: PolicyArgs,
}

/// Run the jdx CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), JdxError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Pack(args)) => run_pack(args),
        Some(Commands::Unpack(args)) => run_unpack(args),
        None => {
            // No subcommand: just print a short banner and exit successfully
            println!("jdx {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("A versioned binary container for annotated image datasets.");
            println!();
            println!("Run 'jdx --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), JdxError> {
    let opts = inspect::InspectOptions {
        max_labels: args.max_labels,
    };
    let report = inspect::inspect_path(&args.input, &opts)?;

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(JdxError::ReportJson)?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", report),
    }

    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), JdxError> {
    let read_opts = ReadOptions {
        strict: args.strict,
        annotations: args.policy.policy(),
    };
    let read = format::read_dataset_from_path_with(&args.input, &read_opts)?;

    let opts = validation::ValidateOptions {
        check_payloads: !args.skip_payload_check,
    };
    let report = validation::validate_dataset(&read.dataset, &opts);

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "item_count": read.dataset.len(),
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "read_warnings": read.warnings,
                "issues": report.issues,
            }))
            .map_err(JdxError::ReportJson)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print_read_warnings(&read.warnings);
            print!("{}", report);
        }
    }

    // Determine exit status
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0 || !read.warnings.is_empty();

    if has_errors || (args.strict && has_warnings) {
        Err(JdxError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count() + read.warnings.len(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the pack subcommand.
fn run_pack(args: PackArgs) -> Result<(), JdxError> {
    let (dataset, warnings) = manifest::pack(&args.manifest, &args.output, args.policy.policy())?;
    print_read_warnings(&warnings);

    println!(
        "Packed {} item(s) with {} annotation(s) into {}",
        dataset.len(),
        dataset.annotation_count(),
        args.output.display()
    );
    Ok(())
}

/// Execute the unpack subcommand.
fn run_unpack(args: UnpackArgs) -> Result<(), JdxError> {
    let opts = ReadOptions {
        strict: args.strict,
        annotations: args.policy.policy(),
    };
    let (manifest, warnings) = manifest::unpack(&args.input, &args.output, &opts)?;
    print_read_warnings(&warnings);

    println!(
        "Unpacked {} item(s) into {}",
        manifest.items.len(),
        args.output.display()
    );
    Ok(())
}

fn print_read_warnings(warnings: &[ReadWarning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}
