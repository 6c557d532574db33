mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Frecency, MAX_RESULTS, Matching, Search, Service, Storage};

use std::{
	fs,
	path::{Path, PathBuf},
};

pub const DIRECTORIES_ENV: &str = "__JUMPER_FOLDERS";
pub const FILES_ENV: &str = "__JUMPER_FILES";
pub const FILTERS_ENV: &str = "__JUMPER_FILTERS";

const CASE_MODES: [&str; 3] = ["sensitive", "insensitive", "semi_sensitive"];
const SYNTAXES: [&str; 3] = ["extended", "fuzzy", "exact"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSource {
	Config,
	Env(&'static str),
	Home,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
	pub path: PathBuf,
	pub source: PathSource,
}

#[derive(Clone, Debug)]
pub struct StorePaths {
	pub directories: ResolvedPath,
	pub files: ResolvedPath,
	pub filters: Option<ResolvedPath>,
}

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Loads `path` when given, otherwise returns the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
	match path {
		Some(path) => load(path),
		None => Ok(Config::default()),
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.search.max_results == 0 {
		return Err(Error::Validation {
			message: "search.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_results > MAX_RESULTS {
		return Err(Error::Validation {
			message: format!("search.max_results must be {MAX_RESULTS} or less."),
		});
	}
	if !cfg.search.beta.is_finite() {
		return Err(Error::Validation {
			message: "search.beta must be a finite number.".to_string(),
		});
	}
	if cfg.search.beta < 0.0 {
		return Err(Error::Validation {
			message: "search.beta must be zero or greater.".to_string(),
		});
	}
	if !CASE_MODES.contains(&cfg.search.case_mode.as_str()) {
		return Err(Error::Validation {
			message: "search.case_mode must be one of sensitive, insensitive, or semi_sensitive."
				.to_string(),
		});
	}
	if !SYNTAXES.contains(&cfg.search.syntax.as_str()) {
		return Err(Error::Validation {
			message: "search.syntax must be one of extended, fuzzy, or exact.".to_string(),
		});
	}

	let matching = &cfg.matching;

	for (label, value) in [
		("matching.match_bonus", matching.match_bonus),
		("matching.post_separator_bonus", matching.post_separator_bonus),
		("matching.post_slash_bonus", matching.post_slash_bonus),
		("matching.uppercase_bonus", matching.uppercase_bonus),
		("matching.camel_case_bonus", matching.camel_case_bonus),
		("matching.end_of_path_bonus", matching.end_of_path_bonus),
		("matching.first_gap_penalty", matching.first_gap_penalty),
		("matching.gap_penalty", matching.gap_penalty),
	] {
		if value < 0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if matching.match_bonus == 0 {
		return Err(Error::Validation {
			message: "matching.match_bonus must be greater than zero.".to_string(),
		});
	}
	if !matching.alignment_scaling.is_finite() || matching.alignment_scaling < 0.0 {
		return Err(Error::Validation {
			message: "matching.alignment_scaling must be a finite number, zero or greater."
				.to_string(),
		});
	}

	let frecency = &cfg.frecency;

	for (label, value) in [
		("frecency.short_decay", frecency.short_decay),
		("frecency.long_decay", frecency.long_decay),
		("frecency.recency_reward", frecency.recency_reward),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if !frecency.offset.is_finite() {
		return Err(Error::Validation {
			message: "frecency.offset must be a finite number.".to_string(),
		});
	}
	if !frecency.visit_weight.is_finite() || frecency.visit_weight <= 0.0 {
		return Err(Error::Validation {
			message: "frecency.visit_weight must be a finite number greater than zero.".to_string(),
		});
	}

	Ok(())
}

/// Resolves store locations from the process environment.
pub fn store_paths(cfg: &Config) -> Result<StorePaths> {
	store_paths_with(cfg, |key| std::env::var(key).ok())
}

/// Resolves store locations with a caller-supplied environment lookup.
pub fn store_paths_with<F>(cfg: &Config, env: F) -> Result<StorePaths>
where
	F: Fn(&str) -> Option<String>,
{
	let home = env("HOME").filter(|home| !home.trim().is_empty()).map(PathBuf::from);
	let resolve = |configured: &Option<PathBuf>, env_var: &'static str, dotfile: &str| {
		if let Some(path) = configured {
			return Some(ResolvedPath { path: path.clone(), source: PathSource::Config });
		}
		if let Some(value) = env(env_var).filter(|value| !value.trim().is_empty()) {
			return Some(ResolvedPath { path: PathBuf::from(value), source: PathSource::Env(env_var) });
		}

		home.as_ref().map(|home| ResolvedPath { path: home.join(dotfile), source: PathSource::Home })
	};
	let directories = resolve(&cfg.storage.directories, DIRECTORIES_ENV, ".jfolders")
		.ok_or(Error::UnresolvedPath { store: "directories", env_var: DIRECTORIES_ENV })?;
	let files = resolve(&cfg.storage.files, FILES_ENV, ".jfiles")
		.ok_or(Error::UnresolvedPath { store: "files", env_var: FILES_ENV })?;
	let filters = resolve(&cfg.storage.filters, FILTERS_ENV, ".jfilters");

	Ok(StorePaths { directories, files, filters })
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.search.case_mode = cfg.search.case_mode.trim().to_ascii_lowercase().replace('-', "_");
	cfg.search.syntax = cfg.search.syntax.trim().to_ascii_lowercase();

	for path in [&mut cfg.storage.directories, &mut cfg.storage.files, &mut cfg.storage.filters] {
		if path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
			*path = None;
		}
	}
}
