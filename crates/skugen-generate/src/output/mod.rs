//! Record sinks.
//!
//! Every sink writes records as they arrive and never holds more than the
//! current record, so output size is bounded only by the destination.

pub mod csv;
pub mod json;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::pricing::PriceBreakdown;

pub use self::csv::CsvSink;
pub use self::json::JsonArraySink;
pub use self::text::TextSink;

/// One emitted SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuRecord {
    pub sku: String,
    /// Absent when pricing is switched off.
    pub breakdown: Option<PriceBreakdown>,
}

/// Destination for generated records.
pub trait SkuSink {
    fn write_record(&mut self, record: &SkuRecord) -> Result<(), GenerationError>;

    fn flush(&mut self) -> Result<(), GenerationError>;

    /// Write any trailer, flush, and return the number of bytes written.
    fn finish(&mut self) -> Result<u64, GenerationError>;
}

/// Supported output layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

/// Create `path` and open a buffered sink of the given format on it.
pub fn open_sink(
    format: OutputFormat,
    path: &Path,
    with_price: bool,
) -> Result<Box<dyn SkuSink>, GenerationError> {
    let writer = BufWriter::new(File::create(path)?);
    let sink: Box<dyn SkuSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink::new(writer, with_price)?),
        OutputFormat::Json => Box::new(JsonArraySink::new(writer)?),
        OutputFormat::Text => Box::new(TextSink::new(writer, with_price)?),
    };
    Ok(sink)
}

/// Decimal without trailing fractional zeros (`135.0` prints as `135`).
pub(crate) fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
