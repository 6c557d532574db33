mod error;

pub use error::{Error, Result};

use std::{
	fs,
	path::{Path, PathBuf},
};

use tempfile::TempDir;

use jumper_domain::record::Record;

pub const STORE_NAME: &str = "store";
pub const FILTERS_NAME: &str = "filters";

/// A temporary directory holding one record store plus whatever fixture paths a test needs. The
/// directory is removed on drop.
pub struct TestStore {
	dir: TempDir,
	store: PathBuf,
}
impl TestStore {
	/// An empty directory; the store file itself does not exist yet.
	pub fn new() -> Result<Self> {
		let dir = tempfile::Builder::new()
			.prefix("jumper_test_")
			.tempdir()
			.map_err(|err| Error::Message(format!("Failed to create test directory: {err}.")))?;
		let store = dir.path().join(STORE_NAME);

		Ok(Self { dir, store })
	}

	pub fn with_records(records: &[Record]) -> Result<Self> {
		let store = Self::new()?;

		store.write_records(records)?;

		Ok(store)
	}

	pub fn with_lines(lines: &[&str]) -> Result<Self> {
		let store = Self::new()?;

		store.write_lines(lines)?;

		Ok(store)
	}

	pub fn dir(&self) -> &Path {
		self.dir.path()
	}

	pub fn path(&self) -> &Path {
		&self.store
	}

	pub fn write_records(&self, records: &[Record]) -> Result<()> {
		let lines: Vec<String> = records
			.iter()
			.map(|r| format!("{}|{:.6}|{}", r.path, r.visit_weight, r.last_visit))
			.collect();

		write(&self.store, &lines)
	}

	pub fn write_lines(&self, lines: &[&str]) -> Result<()> {
		write(&self.store, lines)
	}

	pub fn read_lines(&self) -> Result<Vec<String>> {
		let content = read(&self.store)?;

		Ok(content.lines().map(str::to_string).collect())
	}

	/// Writes a filters file next to the store and returns its path.
	pub fn write_filters(&self, patterns: &[&str]) -> Result<PathBuf> {
		let path = self.dir.path().join(FILTERS_NAME);

		write(&path, patterns)?;

		Ok(path)
	}

	/// Creates `relative` as a directory (parents included) inside the test directory.
	pub fn create_dir(&self, relative: &str) -> Result<PathBuf> {
		let path = self.dir.path().join(relative);

		fs::create_dir_all(&path).map_err(|source| Error::Io { path: path.clone(), source })?;

		Ok(path)
	}

	/// Creates `relative` as an empty file (parents included) inside the test directory.
	pub fn create_file(&self, relative: &str) -> Result<PathBuf> {
		let path = self.dir.path().join(relative);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
		}

		fs::write(&path, "").map_err(|source| Error::Io { path: path.clone(), source })?;

		Ok(path)
	}

	/// Names of the entries of the test directory, sorted.
	pub fn entries(&self) -> Result<Vec<String>> {
		let dir = self.dir.path();
		let mut names = Vec::new();

		let read_dir =
			fs::read_dir(dir).map_err(|source| Error::Io { path: dir.to_path_buf(), source })?;

		for entry in read_dir {
			let entry = entry.map_err(|source| Error::Io { path: dir.to_path_buf(), source })?;

			names.push(entry.file_name().to_string_lossy().into_owned());
		}

		names.sort();

		Ok(names)
	}
}

/// Renders `path` as the string a store records for it.
pub fn path_string(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

fn write<S>(path: &Path, lines: &[S]) -> Result<()>
where
	S: AsRef<str>,
{
	let mut content = String::new();

	for line in lines {
		content.push_str(line.as_ref());
		content.push('\n');
	}

	fs::write(path, content).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}

fn read(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })
}
