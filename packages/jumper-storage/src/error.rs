use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error on {path:?}: {source}")]
	Io { path: PathBuf, source: io::Error },

	#[error("Corrupt record at {path:?} line {line}: {message}")]
	CorruptRecord { path: PathBuf, line: usize, message: String },

	#[error("Failed to replace {path:?}: {source}")]
	Persist { path: PathBuf, source: io::Error },

	#[error(transparent)]
	Glob(#[from] globset::Error),
}
impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
		let path = path.into();

		move |source| Self::Io { path, source }
	}
}
