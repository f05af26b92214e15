//! Corpus loading and chunking.
//!
//! The corpus is a JSON array of `{year, finance_parameter, value}` objects.
//! Chunking is a 1:1 order-preserving map, so a chunk's position is its
//! identity in every index built from it.
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Chunk, Record};

/// Records that survived parsing plus the number of elements that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusLoad {
    pub records: Vec<Record>,
    pub dropped: usize,
}

pub fn load_records(path: &Path) -> Result<CorpusLoad> {
    if !path.exists() {
        return Err(Error::NotFound(format!("corpus file {}", path.display())));
    }
    let raw = fs::read_to_string(path)?;
    let load = parse_records(&raw)?;
    tracing::info!(path = %path.display(), records = load.records.len(), dropped = load.dropped, "loaded corpus");
    Ok(load)
}

/// Parse a corpus document, dropping elements that are not well-formed records.
///
/// A document that is not valid JSON, or whose top level is not an array, is
/// an error: there is nothing positional to recover from it.
pub fn parse_records(raw: &str) -> Result<CorpusLoad> {
    let doc: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = doc else {
        return Err(Error::Corpus("top-level value must be an array of records".into()));
    };
    let mut load = CorpusLoad { records: Vec::with_capacity(items.len()), dropped: 0 };
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) if record.value.is_finite() => load.records.push(record),
            Ok(record) => {
                tracing::warn!(position, parameter = %record.finance_parameter, "dropping record with non-finite value");
                load.dropped += 1;
            }
            Err(e) => {
                tracing::warn!(position, error = %e, "dropping malformed record");
                load.dropped += 1;
            }
        }
    }
    Ok(load)
}

pub fn chunk_records(records: &[Record]) -> Vec<Chunk> {
    records
        .iter()
        .map(|r| Chunk { text: render_chunk_text(r), metadata: r.clone() })
        .collect()
}

pub fn render_chunk_text(record: &Record) -> String {
    format!(
        "Year: {}, Parameter: {}, Value: {}",
        record.year,
        record.finance_parameter,
        format_value(record.value)
    )
}

/// Render a float the way the corpus producer prints it: integral values keep
/// a trailing `.0`, and very large or very small magnitudes use `e+NN`/`e-NN`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{value:e}");
        if let Some((mantissa, exp)) = sci.split_once('e') {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            return format!("{mantissa}e{sign}{digits:0>2}");
        }
        return sci;
    }
    let plain = value.to_string();
    if plain.contains('.') { plain } else { format!("{plain}.0") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_keep_decimal_point() {
        assert_eq!(format_value(383_285_000_000.0), "383285000000.0");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-12.0), "-12.0");
    }

    #[test]
    fn fractional_values_use_shortest_form() {
        assert_eq!(format_value(6.13), "6.13");
        assert_eq!(format_value(0.5), "0.5");
    }

    #[test]
    fn extreme_magnitudes_use_exponent() {
        assert_eq!(format_value(1e16), "1e+16");
        assert_eq!(format_value(2.5e-5), "2.5e-05");
    }

    #[test]
    fn chunk_text_template() {
        let r = Record { year: 2023, finance_parameter: "Total Revenue".into(), value: 383_285_000_000.0 };
        assert_eq!(render_chunk_text(&r), "Year: 2023, Parameter: Total Revenue, Value: 383285000000.0");
    }
}
