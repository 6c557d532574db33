//! Whole-store operations. Every rewrite goes through a temporary file next to the store that
//! replaces it in one rename.

use std::{
	fs::{self, File},
	io::{self, BufWriter, Write},
	path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use jumper_domain::{frecency::FrecencyModel, record::Record};

use crate::{Error, RecordReader, Result, codec};

const STAGING_PREFIX: &str = ".jumper_";

/// Outcome of [`clean`].
#[derive(Clone, Debug, PartialEq)]
pub struct CleanReport {
	pub kept: usize,
	pub removed: usize,
	/// The filtered copy left next to the store by a dry run that removed something.
	pub staged: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoreStats {
	pub entries: usize,
	/// Sum of every record's decayed visit weight.
	pub total_visits: f64,
}

/// Records a visit of `path`. An existing record is decayed to `now` and credited `weight`; a new
/// record starts at `weight`. Returns the record as written.
pub fn visit(
	store: &Path,
	path: &str,
	weight: f64,
	now: i64,
	model: &FrecencyModel,
) -> Result<Record> {
	let staged = stage(store)?;
	let mut writer = BufWriter::new(staged.as_file());
	let mut visited = None;

	if let Some(reader) = RecordReader::open(store)? {
		for record in reader {
			let mut record = record?;

			if visited.is_none() && record.path == path {
				record.visit(now, weight, model);

				visited = Some(record.clone());
			}

			write_record(&mut writer, staged.path(), &record)?;
		}
	}

	let record = match visited {
		Some(record) => record,
		None => {
			let record = Record::new(path, weight, now);

			write_record(&mut writer, staged.path(), &record)?;

			record
		},
	};

	finish(writer, staged.path())?;
	persist(staged, store)?;

	tracing::debug!(
		store = %store.display(),
		path,
		weight = record.visit_weight,
		"Recorded visit."
	);

	Ok(record)
}

/// Drops every record for which `keep` returns false. Returns `None` when the store does not exist.
///
/// The store is only rewritten when something was removed. A dry run leaves the store untouched
/// and keeps the filtered copy instead.
pub fn clean<F>(store: &Path, mut keep: F, dry_run: bool) -> Result<Option<CleanReport>>
where
	F: FnMut(&Record) -> bool,
{
	let Some(reader) = RecordReader::open(store)? else {
		return Ok(None);
	};
	let staged = stage(store)?;
	let mut writer = BufWriter::new(staged.as_file());
	let mut report = CleanReport { kept: 0, removed: 0, staged: None };

	for record in reader {
		let record = record?;

		if keep(&record) {
			write_record(&mut writer, staged.path(), &record)?;

			report.kept += 1;
		} else {
			report.removed += 1;
		}
	}

	finish(writer, staged.path())?;

	tracing::info!(
		store = %store.display(),
		kept = report.kept,
		removed = report.removed,
		dry_run,
		"Cleaned store."
	);

	if report.removed == 0 {
		return Ok(Some(report));
	}

	if dry_run {
		let (_, path) = staged
			.keep()
			.map_err(|err| Error::Persist { path: store.to_path_buf(), source: err.error })?;

		report.staged = Some(path);
	} else {
		persist(staged, store)?;
	}

	Ok(Some(report))
}

/// Counts the records of a store. Returns `None` when the store does not exist.
pub fn stats(store: &Path, now: i64, model: &FrecencyModel) -> Result<Option<StoreStats>> {
	let Some(reader) = RecordReader::open(store)? else {
		return Ok(None);
	};
	let mut stats = StoreStats { entries: 0, total_visits: 0.0 };

	for record in reader {
		let record = record?;

		stats.entries += 1;
		stats.total_visits += record.decayed_visits(now, model);
	}

	Ok(Some(stats))
}

/// Creates the temporary file that will replace `store`, carrying over the store's permissions.
fn stage(store: &Path) -> Result<NamedTempFile> {
	let dir = match store.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	};
	let staged = tempfile::Builder::new()
		.prefix(STAGING_PREFIX)
		.tempfile_in(dir)
		.map_err(Error::io(dir))?;

	match fs::metadata(store) {
		Ok(metadata) => {
			staged
				.as_file()
				.set_permissions(metadata.permissions())
				.map_err(Error::io(staged.path()))?;
		},
		Err(err) if err.kind() == io::ErrorKind::NotFound => {},
		Err(source) => return Err(Error::Io { path: store.to_path_buf(), source }),
	}

	Ok(staged)
}

fn write_record(writer: &mut BufWriter<&File>, staged: &Path, record: &Record) -> Result<()> {
	writeln!(writer, "{}", codec::format_record(record)).map_err(Error::io(staged))
}

fn finish(mut writer: BufWriter<&File>, staged: &Path) -> Result<()> {
	writer.flush().map_err(Error::io(staged))?;
	writer.get_ref().sync_all().map_err(Error::io(staged))
}

fn persist(staged: NamedTempFile, store: &Path) -> Result<()> {
	staged
		.persist(store)
		.map(|_| ())
		.map_err(|err| Error::Persist { path: store.to_path_buf(), source: err.error })
}
