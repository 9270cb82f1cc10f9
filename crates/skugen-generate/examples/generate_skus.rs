use std::env;
use std::path::PathBuf;

use skugen_core::{Catalog, PricingOptions};
use skugen_generate::{GenerateOptions, GenerationEngine, OutputFormat, open_sink};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut catalog_path: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => catalog_path = args.next().map(PathBuf::from),
            "--out" => out_path = args.next().map(PathBuf::from),
            _ => {
                if catalog_path.is_none() {
                    catalog_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let catalog_path = catalog_path.ok_or("missing --catalog path")?;
    let out_path = out_path.unwrap_or_else(|| PathBuf::from("skus.csv"));
    let catalog = Catalog::from_json_str(&std::fs::read_to_string(&catalog_path)?)?;

    let pricing = PricingOptions::default();
    let mut sink = open_sink(OutputFormat::Csv, &out_path, pricing.price)?;
    let report = GenerationEngine::new(GenerateOptions::default()).run(
        &catalog,
        &pricing,
        sink.as_mut(),
    )?;

    println!("records={} out={}", report.records_emitted, out_path.display());
    Ok(())
}
