use std::io::Write;

use crate::errors::GenerationError;

use super::{CountingWriter, SkuRecord, SkuSink, decimal_text};

/// Comma-and-space separated lines: `SKU, Subtotal, Total Price, VAT, Discount`.
pub struct TextSink<W: Write> {
    writer: CountingWriter<W>,
}

impl<W: Write> TextSink<W> {
    pub fn new(inner: W, with_price: bool) -> Result<Self, GenerationError> {
        let mut writer = CountingWriter::new(inner);
        if with_price {
            writeln!(writer, "SKU, Subtotal, Total Price, VAT, Discount")?;
        } else {
            writeln!(writer, "SKU")?;
        }
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> SkuSink for TextSink<W> {
    fn write_record(&mut self, record: &SkuRecord) -> Result<(), GenerationError> {
        match &record.breakdown {
            Some(breakdown) => writeln!(
                self.writer,
                "{}, {}, {}, {}, {}",
                record.sku,
                decimal_text(breakdown.subtotal),
                decimal_text(breakdown.total_price),
                decimal_text(breakdown.vat),
                decimal_text(breakdown.discount),
            )?,
            None => writeln!(self.writer, "{}", record.sku)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GenerationError> {
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        Ok(self.writer.bytes_written())
    }
}
