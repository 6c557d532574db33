//! Glob patterns naming paths that are never recorded nor listed.

use std::{
	fs, io,
	path::{Path, PathBuf},
};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct Filters {
	set: GlobSet,
	patterns: Vec<String>,
	source: Option<PathBuf>,
}
impl Filters {
	pub fn empty() -> Self {
		Self { set: GlobSet::empty(), patterns: Vec::new(), source: None }
	}

	/// Reads one pattern per line. Blank lines and `#` comments are skipped, invalid patterns are
	/// skipped with a warning, and a missing file yields no filters.
	pub fn load(path: &Path) -> Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::empty()),
			Err(source) => return Err(Error::Io { path: path.to_path_buf(), source }),
		};
		let mut builder = GlobSetBuilder::new();
		let mut patterns = Vec::new();

		for (index, line) in content.lines().enumerate() {
			let pattern = line.trim_end_matches('\r');

			if pattern.is_empty() || pattern.starts_with('#') {
				continue;
			}

			match compile(pattern) {
				Ok(glob) => {
					builder.add(glob);
					patterns.push(pattern.to_string());
				},
				Err(reason) => {
					tracing::warn!(
						path = %path.display(),
						line = index + 1,
						pattern,
						%reason,
						"Ignoring invalid filter pattern."
					);
				},
			}
		}

		Ok(Self { set: builder.build()?, patterns, source: Some(path.to_path_buf()) })
	}

	pub fn is_match(&self, path: &str) -> bool {
		!self.patterns.is_empty() && self.set.is_match(path)
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}
impl Default for Filters {
	fn default() -> Self {
		Self::empty()
	}
}

fn compile(pattern: &str) -> Result<globset::Glob, String> {
	if pattern.contains('|') {
		return Err("pattern contains '|', the store field separator".to_string());
	}
	if pattern.contains("***") {
		return Err("pattern contains three or more consecutive '*'".to_string());
	}

	GlobBuilder::new(pattern).literal_separator(true).build().map_err(|err| err.to_string())
}
