//! The `path|visit_weight|last_visit` line format of a record store.

use std::path::Path;

use jumper_domain::record::Record;

use crate::{Error, Result};

pub const FIELD_SEPARATOR: char = '|';

/// Parses one store line. The path may itself contain `|`, so the two numeric fields are taken
/// from the right. Trailing whitespace after the timestamp is tolerated.
pub fn parse_line(store: &Path, line_number: usize, line: &str) -> Result<Record> {
	let corrupt = |message: String| Error::CorruptRecord {
		path: store.to_path_buf(),
		line: line_number,
		message,
	};
	let line = line.trim_end_matches(['\n', '\r']);
	let Some((rest, timestamp)) = line.rsplit_once(FIELD_SEPARATOR) else {
		return Err(corrupt("missing fields.".to_string()));
	};
	let Some((path, weight)) = rest.rsplit_once(FIELD_SEPARATOR) else {
		return Err(corrupt("missing fields.".to_string()));
	};

	if path.is_empty() {
		return Err(corrupt("path must not be empty.".to_string()));
	}

	let weight = weight.trim();
	let timestamp = timestamp.trim();

	if weight.is_empty() {
		return Err(corrupt("visit weight must not be empty.".to_string()));
	}
	if timestamp.is_empty() {
		return Err(corrupt("timestamp must not be empty.".to_string()));
	}

	let visit_weight = weight
		.parse::<f64>()
		.map_err(|_| corrupt(format!("visit weight {weight:?} is not a number.")))?;

	if !visit_weight.is_finite() || visit_weight < 0.0 {
		return Err(corrupt(format!("visit weight {weight:?} must be finite and non-negative.")));
	}

	let last_visit = timestamp
		.parse::<i64>()
		.map_err(|_| corrupt(format!("timestamp {timestamp:?} is not an integer.")))?;

	Ok(Record::new(path, visit_weight, last_visit))
}

pub fn format_record(record: &Record) -> String {
	format!(
		"{}{FIELD_SEPARATOR}{:.6}{FIELD_SEPARATOR}{}",
		record.path, record.visit_weight, record.last_visit
	)
}
