mod config;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use schemars::schema_for;
use skugen_core::{AdjustmentKind, Catalog, CatalogDocument, CatalogError};
use skugen_generate::{
    EnumerationStrategy, GenerateOptions, GenerationEngine, GenerationError, OutputFormat,
    candidate_count, enumerate, open_sink,
};
use thiserror::Error;
use uuid::Uuid;

use config::{ConfigError, PricingOverrides, load_options, write_default_options};
use registry::{
    RunContext, RunPaths, init_console_logging, init_run_logging, start_run, write_report,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "skugen", version, about = "SKU combination generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate, price and write every SKU of a catalog.
    Generate(GenerateArgs),
    /// Count combinations without writing any output.
    Count(CountArgs),
    /// Print the JSON Schema of catalog files.
    Schema,
    /// Write a pricing options file filled with defaults.
    InitOptions(InitOptionsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Subsets,
    RequiredFirst,
}

impl From<StrategyArg> for EnumerationStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Subsets => EnumerationStrategy::Subsets,
            StrategyArg::RequiredFirst => EnumerationStrategy::RequiredFirst,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AdjustmentArg {
    Percentage,
    Fixed,
}

impl From<AdjustmentArg> for AdjustmentKind {
    fn from(value: AdjustmentArg) -> Self {
        match value {
            AdjustmentArg::Percentage => AdjustmentKind::Percentage,
            AdjustmentArg::Fixed => AdjustmentKind::Fixed,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Catalog JSON file.
    #[arg(long)]
    catalog: PathBuf,
    /// Pricing options TOML file.
    #[arg(long)]
    options: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "csv")]
    format: FormatArg,
    /// Output file; defaults to skus.<ext> inside the run directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    #[arg(long, value_enum, default_value = "subsets")]
    strategy: StrategyArg,
    /// Stop after this many records.
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long, default_value_t = 1)]
    flush_every: u64,
    /// Log progress every N records (0 disables).
    #[arg(long, default_value_t = 100_000)]
    progress_every: u64,
    #[command(flatten)]
    pricing: PricingArgs,
}

#[derive(Args, Debug)]
struct PricingArgs {
    #[arg(long)]
    prefix: Option<String>,
    #[arg(long)]
    separator: Option<String>,
    #[arg(long)]
    base_price: Option<Decimal>,
    /// Lower-case SKUs instead of upper-casing them.
    #[arg(long, default_value_t = false)]
    lowercase: bool,
    /// Emit SKUs without prices.
    #[arg(long, default_value_t = false)]
    no_price: bool,
    #[arg(long, conflicts_with = "no_vat")]
    vat: bool,
    #[arg(long)]
    no_vat: bool,
    #[arg(long, value_enum)]
    vat_type: Option<AdjustmentArg>,
    #[arg(long)]
    vat_amount: Option<Decimal>,
    #[arg(long, conflicts_with = "no_discount")]
    discount: bool,
    #[arg(long)]
    no_discount: bool,
    #[arg(long, value_enum)]
    discount_type: Option<AdjustmentArg>,
    #[arg(long)]
    discount_amount: Option<Decimal>,
}

impl PricingArgs {
    fn into_overrides(self) -> PricingOverrides {
        PricingOverrides {
            prefix_name: self.prefix,
            separator: self.separator,
            price: self.no_price.then_some(false),
            base_price: self.base_price,
            vat: toggle(self.vat, self.no_vat),
            vat_type: self.vat_type.map(AdjustmentKind::from),
            vat_amount: self.vat_amount,
            discount: toggle(self.discount, self.no_discount),
            discount_type: self.discount_type.map(AdjustmentKind::from),
            discount_amount: self.discount_amount,
            uppercase: self.lowercase.then_some(false),
        }
    }
}

fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[derive(Args, Debug)]
struct CountArgs {
    /// Catalog JSON file.
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long, value_enum, default_value = "subsets")]
    strategy: StrategyArg,
    /// Stop counting after this many combinations.
    #[arg(long)]
    limit: Option<u64>,
}

#[derive(Args, Debug)]
struct InitOptionsArgs {
    /// Destination TOML file.
    path: PathBuf,
    /// Replace an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Count(args) => run_count(args),
        Command::Schema => run_schema(),
        Command::InitOptions(args) => run_init_options(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        catalog,
        options,
        format,
        out,
        run_dir,
        strategy,
        limit,
        flush_every,
        progress_every,
        pricing,
    } = args;

    // A bad catalog or options file never creates a run directory.
    let catalog_path = catalog;
    let catalog = read_catalog(&catalog_path)?;
    let mut pricing_options = load_options(options.as_deref())?;
    pricing.into_overrides().apply(&mut pricing_options);

    let run_id = Uuid::new_v4().to_string();
    let generate_options = GenerateOptions {
        run_id: Some(run_id.clone()),
        strategy: strategy.into(),
        limit,
        flush_every,
        progress_every,
    };

    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        catalog_path,
        format: format.into(),
        out,
        generate: generate_options,
        pricing: pricing_options,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        run_root = %run_paths.root.display(),
        config = %run_paths.config_path.display()
    );
    tracing::info!(
        event = "catalog_loaded",
        path = %run_ctx.catalog_path.display(),
        attributes = catalog.len()
    );

    let timer = Instant::now();
    let outcome = execute_run(&run_ctx, &run_paths, &catalog);
    let duration_ms = timer.elapsed().as_millis();

    match &outcome {
        Ok(()) => {
            tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);
        }
        Err(err) => {
            tracing::error!(
                event = "run_finished",
                status = "failed",
                error = %err,
                duration_ms = duration_ms
            );
        }
    }

    outcome
}

fn execute_run(
    run_ctx: &RunContext,
    run_paths: &RunPaths,
    catalog: &Catalog,
) -> Result<(), CliError> {
    let mut sink = open_sink(run_ctx.format, &run_paths.output_path, run_ctx.pricing.price)?;
    let engine = GenerationEngine::new(run_ctx.generate.clone());
    let report = engine.run(catalog, &run_ctx.pricing, sink.as_mut())?;
    tracing::info!(
        event = "output_written",
        path = %run_paths.output_path.display(),
        records = report.records_emitted,
        bytes = report.bytes_written
    );

    write_report(run_paths, &report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    Ok(())
}

fn run_count(args: CountArgs) -> Result<(), CliError> {
    init_console_logging()?;

    let catalog = read_catalog(&args.catalog)?;
    let derived = catalog.derive_sets();
    let bound = candidate_count(&derived.sets);

    let mut combinations = enumerate(args.strategy.into(), &derived);
    let emitted = match args.limit {
        Some(limit) => combinations.by_ref().take(saturating_usize(limit)).count(),
        None => combinations.by_ref().count(),
    };
    let stats = combinations.stats();

    tracing::info!(
        event = "count_finished",
        candidates = stats.candidates,
        rejected = stats.rejected,
        emitted = emitted
    );

    match bound {
        Some(bound) => println!("candidate_bound={bound}"),
        None => println!("candidate_bound=overflow"),
    }
    println!("combinations={emitted}");
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = schema_for!(CatalogDocument);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_init_options(args: InitOptionsArgs) -> Result<(), CliError> {
    write_default_options(&args.path, args.force)?;
    println!("options_path={}", args.path.display());
    Ok(())
}

fn read_catalog(path: &std::path::Path) -> Result<Catalog, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(Catalog::from_json_str(&contents)?)
}

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pricing_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "skugen",
            "generate",
            "--catalog",
            "catalog.json",
            "--prefix",
            "Cab",
            "--no-vat",
            "--discount",
            "--discount-type",
            "fixed",
            "--discount-amount",
            "12.5",
            "--lowercase",
            "--strategy",
            "required-first",
        ])
        .expect("parse generate");

        let Command::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert!(matches!(args.strategy, StrategyArg::RequiredFirst));

        let mut options = skugen_core::PricingOptions::default();
        args.pricing.into_overrides().apply(&mut options);

        assert_eq!(options.prefix_name, "Cab");
        assert!(!options.vat);
        assert!(options.discount);
        assert_eq!(options.discount_type, AdjustmentKind::Fixed);
        assert_eq!(options.discount_amount, "12.5".parse::<Decimal>().expect("decimal"));
        assert!(!options.uppercase);
        assert!(options.price);
    }

    #[test]
    fn unset_toggles_leave_file_values() {
        assert_eq!(toggle(false, false), None);
        assert_eq!(toggle(true, false), Some(true));
        assert_eq!(toggle(false, true), Some(false));
    }

    #[test]
    fn vat_and_no_vat_conflict() {
        let result = Cli::try_parse_from([
            "skugen",
            "generate",
            "--catalog",
            "catalog.json",
            "--vat",
            "--no-vat",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_catalog_leaves_no_run_directory() {
        let scratch = std::env::temp_dir().join(format!("skugen_cli_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&scratch).expect("create scratch dir");
        let catalog_path = scratch.join("catalog.json");
        std::fs::write(&catalog_path, r#"[{"name": "Color"}]"#).expect("write catalog");
        let run_dir = scratch.join("runs");

        let cli = Cli::try_parse_from([
            OsString::from("skugen"),
            OsString::from("generate"),
            OsString::from("--catalog"),
            catalog_path.clone().into_os_string(),
            OsString::from("--run-dir"),
            run_dir.clone().into_os_string(),
        ])
        .expect("parse generate");
        let Command::Generate(args) = cli.command else {
            panic!("expected generate command");
        };

        let result = run_generate(args);

        assert!(matches!(result, Err(CliError::Catalog(_))));
        assert!(!run_dir.exists());
    }
}
