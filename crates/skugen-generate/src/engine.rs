use std::time::Instant;

use tracing::{info, warn};

use skugen_core::{Catalog, PricingOptions};

use crate::enumerate::{Enumeration, candidate_count, enumerate};
use crate::errors::GenerationError;
use crate::memory::resident_memory_mb;
use crate::model::{GenerateOptions, GenerationReport};
use crate::output::{SkuRecord, SkuSink};
use crate::pricing::PriceBook;
use crate::sku::format_sku;

/// Entry point for streaming SKUs from a catalog into a sink.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Enumerate, price and write every combination of `catalog`.
    ///
    /// Records are written one at a time; the sink is flushed every
    /// `flush_every` records and finished before returning.
    pub fn run(
        &self,
        catalog: &Catalog,
        pricing: &PricingOptions,
        sink: &mut dyn SkuSink,
    ) -> Result<GenerationReport, GenerationError> {
        if self.options.flush_every == 0 {
            return Err(GenerationError::InvalidOptions(
                "flush_every must be at least 1".to_string(),
            ));
        }

        let start = Instant::now();
        let run_id = self
            .options
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let derived = catalog.derive_sets();
        let price_book = PriceBook::new(catalog);

        let mut report = GenerationReport::new(run_id.clone(), self.options.strategy);
        report.attributes = derived.sets.len();
        report.required_attributes = derived.required_sets.len();
        report.candidate_bound = candidate_count(&derived.sets);

        info!(
            run_id = %run_id,
            attributes = report.attributes,
            required = report.required_attributes,
            strategy = ?self.options.strategy,
            candidate_bound = ?report.candidate_bound,
            limit = ?self.options.limit,
            "generation started"
        );

        let mut combinations = enumerate(self.options.strategy, &derived);
        let outcome = self.drain(&mut combinations, &price_book, pricing, sink, &mut report);

        let stats = combinations.stats();
        report.candidates = stats.candidates;
        report.rejected = stats.rejected;

        if let Err(err) = outcome {
            warn!(
                run_id = %run_id,
                records = report.records_emitted,
                error = %err,
                "generation failed"
            );
            return Err(err);
        }

        report.bytes_written = sink.finish()?;

        let elapsed = start.elapsed();
        report.duration_ms = elapsed.as_millis() as u64;
        report.records_per_sec = if elapsed.as_secs_f64() > 0.0 {
            report.records_emitted as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        info!(
            run_id = %run_id,
            records = report.records_emitted,
            candidates = report.candidates,
            rejected = report.rejected,
            limit_reached = report.limit_reached,
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(report)
    }

    fn drain(
        &self,
        combinations: &mut Enumeration<'_>,
        price_book: &PriceBook<'_>,
        pricing: &PricingOptions,
        sink: &mut dyn SkuSink,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        let mut since_flush = 0_u64;

        loop {
            if self
                .options
                .limit
                .is_some_and(|limit| report.records_emitted >= limit)
            {
                report.limit_reached = true;
                break;
            }

            let Some(combination) = combinations.next() else {
                break;
            };

            let sku = format_sku(&combination, pricing);
            let breakdown = if pricing.price {
                match price_book.price(&combination, pricing) {
                    Ok(breakdown) => Some(breakdown),
                    Err(source) => return Err(GenerationError::Pricing { sku, source }),
                }
            } else {
                None
            };
            let record = SkuRecord { sku, breakdown };
            sink.write_record(&record)?;
            report.records_emitted += 1;

            since_flush += 1;
            if since_flush >= self.options.flush_every {
                sink.flush()?;
                since_flush = 0;
            }

            if self.options.progress_every > 0
                && report.records_emitted % self.options.progress_every == 0
            {
                info!(
                    records = report.records_emitted,
                    rss_mb = resident_memory_mb().unwrap_or_default(),
                    "generation progress"
                );
            }
        }

        if since_flush > 0 {
            sink.flush()?;
        }

        Ok(())
    }
}
