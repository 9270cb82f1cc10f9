use std::io::Write;

use crate::errors::GenerationError;

use super::{CountingWriter, SkuRecord, SkuSink, decimal_text};

const PRICED_HEADER: [&str; 5] = ["sku", "subtotal", "discount", "vat", "total_price"];

/// CSV sink with a fixed header.
pub struct CsvSink<W: Write> {
    writer: ::csv::Writer<CountingWriter<W>>,
    with_price: bool,
}

impl<W: Write> CsvSink<W> {
    /// Writes the header immediately so empty runs still produce a valid file.
    pub fn new(inner: W, with_price: bool) -> Result<Self, GenerationError> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(CountingWriter::new(inner));

        if with_price {
            writer.write_record(PRICED_HEADER)?;
        } else {
            writer.write_record(["sku"])?;
        }

        Ok(Self { writer, with_price })
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, GenerationError> {
        let counting = self
            .writer
            .into_inner()
            .map_err(|err| GenerationError::Io(err.into_error()))?;
        Ok(counting.into_inner())
    }
}

impl<W: Write> SkuSink for CsvSink<W> {
    fn write_record(&mut self, record: &SkuRecord) -> Result<(), GenerationError> {
        match (&record.breakdown, self.with_price) {
            (Some(breakdown), true) => self.writer.write_record([
                record.sku.clone(),
                decimal_text(breakdown.subtotal),
                decimal_text(breakdown.discount),
                decimal_text(breakdown.vat),
                decimal_text(breakdown.total_price),
            ])?,
            (None, true) => self
                .writer
                .write_record([record.sku.as_str(), "", "", "", ""])?,
            (_, false) => self.writer.write_record([record.sku.as_str()])?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GenerationError> {
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        Ok(self.writer.get_ref().bytes_written())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::pricing::PriceBreakdown;

    fn record(sku: &str, total: i64) -> SkuRecord {
        SkuRecord {
            sku: sku.to_string(),
            breakdown: Some(PriceBreakdown {
                subtotal: Decimal::from(total),
                discount: Decimal::ZERO,
                vat: Decimal::ZERO,
                total_price: Decimal::from(total),
            }),
        }
    }

    #[test]
    fn writes_header_and_priced_rows() {
        let mut sink = CsvSink::new(Vec::new(), true).expect("sink");
        sink.write_record(&record("TEST-RED", 40)).expect("write");
        let bytes = sink.finish().expect("finish");

        let output = String::from_utf8(sink.into_inner().expect("inner")).expect("utf8");
        assert_eq!(
            output,
            "sku,subtotal,discount,vat,total_price\nTEST-RED,40,0,0,40\n"
        );
        assert_eq!(bytes, output.len() as u64);
    }

    #[test]
    fn sku_only_layout() {
        let mut sink = CsvSink::new(Vec::new(), false).expect("sink");
        sink.write_record(&record("TEST-RED", 40)).expect("write");
        sink.finish().expect("finish");

        let output = String::from_utf8(sink.into_inner().expect("inner")).expect("utf8");
        assert_eq!(output, "sku\nTEST-RED\n");
    }
}
