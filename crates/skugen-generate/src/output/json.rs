use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::GenerationError;

use super::{CountingWriter, SkuRecord, SkuSink};

#[derive(Serialize)]
struct JsonRecord<'r> {
    sku: &'r str,
    #[serde(flatten)]
    price: Option<JsonPrice>,
}

#[derive(Serialize)]
struct JsonPrice {
    #[serde(with = "rust_decimal::serde::str")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    vat: Decimal,
    #[serde(rename = "totalPrice", with = "rust_decimal::serde::str")]
    total_price: Decimal,
}

/// Streams a JSON array, one element per record.
pub struct JsonArraySink<W: Write> {
    writer: CountingWriter<W>,
    first: bool,
    closed: bool,
}

impl<W: Write> JsonArraySink<W> {
    pub fn new(inner: W) -> Result<Self, GenerationError> {
        let mut writer = CountingWriter::new(inner);
        writer.write_all(b"[")?;
        Ok(Self {
            writer,
            first: true,
            closed: false,
        })
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> SkuSink for JsonArraySink<W> {
    fn write_record(&mut self, record: &SkuRecord) -> Result<(), GenerationError> {
        let separator: &[u8] = if self.first { b"\n  " } else { b",\n  " };
        self.writer.write_all(separator)?;
        self.first = false;

        let element = JsonRecord {
            sku: &record.sku,
            price: record.breakdown.map(|breakdown| JsonPrice {
                subtotal: breakdown.subtotal.normalize(),
                discount: breakdown.discount.normalize(),
                vat: breakdown.vat.normalize(),
                total_price: breakdown.total_price.normalize(),
            }),
        };
        serde_json::to_writer(&mut self.writer, &element)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), GenerationError> {
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, GenerationError> {
        if !self.closed {
            self.writer.write_all(b"\n]\n")?;
            self.closed = true;
        }
        self.writer.flush()?;
        Ok(self.writer.bytes_written())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PriceBreakdown;

    #[test]
    fn output_is_a_valid_json_array() {
        let mut sink = JsonArraySink::new(Vec::new()).expect("sink");
        sink.write_record(&SkuRecord {
            sku: "TEST-RED".to_string(),
            breakdown: Some(PriceBreakdown {
                subtotal: Decimal::from(100),
                discount: Decimal::from(10),
                vat: Decimal::from(45),
                total_price: Decimal::from(135),
            }),
        })
        .expect("write");
        sink.write_record(&SkuRecord {
            sku: "TEST-BLUE".to_string(),
            breakdown: None,
        })
        .expect("write");
        sink.finish().expect("finish");

        let parsed: serde_json::Value =
            serde_json::from_slice(&sink.into_inner()).expect("parse output");
        let items = parsed.as_array().expect("array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["sku"], "TEST-RED");
        assert_eq!(items[0]["totalPrice"], "135");
        assert_eq!(items[0]["vat"], "45");
        assert!(items[1].get("subtotal").is_none());
    }

    #[test]
    fn empty_run_is_an_empty_array() {
        let mut sink = JsonArraySink::new(Vec::new()).expect("sink");
        sink.finish().expect("finish");
        sink.finish().expect("finish twice");

        let parsed: serde_json::Value =
            serde_json::from_slice(&sink.into_inner()).expect("parse output");
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn prices_keep_every_digit() {
        let exact: Decimal = "12345678901234567.89".parse().expect("decimal");
        let mut sink = JsonArraySink::new(Vec::new()).expect("sink");
        sink.write_record(&SkuRecord {
            sku: "X".to_string(),
            breakdown: Some(PriceBreakdown {
                subtotal: exact,
                discount: Decimal::ZERO,
                vat: exact,
                total_price: exact,
            }),
        })
        .expect("write");
        sink.finish().expect("finish");

        let parsed: serde_json::Value =
            serde_json::from_slice(&sink.into_inner()).expect("parse output");
        let item = &parsed[0];
        for field in ["subtotal", "vat", "totalPrice"] {
            let text = item[field].as_str().expect("decimal string");
            assert_eq!(text.parse::<Decimal>().expect("decimal"), exact);
            assert_eq!(text, crate::output::decimal_text(exact));
        }
        assert_eq!(item["discount"], "0");
    }
}
