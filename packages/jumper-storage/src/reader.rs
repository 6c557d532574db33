use std::{
	fs::File,
	io::{self, BufRead, BufReader, Lines},
	path::{Path, PathBuf},
};

use jumper_domain::record::Record;

use crate::{Error, Result, codec};

/// Streams the records of a store one line at a time.
pub struct RecordReader {
	path: PathBuf,
	lines: Lines<BufReader<File>>,
	line_number: usize,
}
impl RecordReader {
	/// Returns `None` when the store does not exist yet.
	pub fn open(path: &Path) -> Result<Option<Self>> {
		match File::open(path) {
			Ok(file) => Ok(Some(Self {
				path: path.to_path_buf(),
				lines: BufReader::new(file).lines(),
				line_number: 0,
			})),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(source) => Err(Error::Io { path: path.to_path_buf(), source }),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Iterator for RecordReader {
	type Item = Result<Record>;

	fn next(&mut self) -> Option<Self::Item> {
		let line = self.lines.next()?;

		self.line_number += 1;

		Some(match line {
			Ok(line) => codec::parse_line(&self.path, self.line_number, &line),
			Err(source) => Err(Error::Io { path: self.path.clone(), source }),
		})
	}
}
