use std::path::PathBuf;

use serde::Deserialize;

pub const MAX_RESULTS: u32 = 50_000;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub matching: Matching,
	pub frecency: Frecency,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "warn".to_string() }
	}
}

/// Store locations. Unset entries fall back to the `__JUMPER_*` environment variables and then
/// to dotfiles under `$HOME`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub directories: Option<PathBuf>,
	pub files: Option<PathBuf>,
	pub filters: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_results: u32,
	/// Inverse temperature applied to the text-match score.
	pub beta: f64,
	pub case_mode: String,
	pub syntax: String,
	pub orderless: bool,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_results: MAX_RESULTS,
			beta: 1.0,
			case_mode: "semi_sensitive".to_string(),
			syntax: "extended".to_string(),
			orderless: false,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub match_bonus: i32,
	pub post_separator_bonus: i32,
	pub post_slash_bonus: i32,
	pub uppercase_bonus: i32,
	pub camel_case_bonus: i32,
	pub end_of_path_bonus: i32,
	pub first_gap_penalty: i32,
	pub gap_penalty: i32,
	/// Weight of a permutation's closeness to the typed token order.
	pub alignment_scaling: f64,
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			match_bonus: 20,
			post_separator_bonus: 4,
			post_slash_bonus: 6,
			uppercase_bonus: 6,
			camel_case_bonus: 4,
			end_of_path_bonus: 3,
			first_gap_penalty: 19,
			gap_penalty: 1,
			alignment_scaling: 80.0,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Frecency {
	/// Per-second rate of the hyperbolic recency term.
	pub short_decay: f64,
	/// Per-second rate of the exponential decay applied to accumulated visits.
	pub long_decay: f64,
	pub recency_reward: f64,
	/// Added to the logarithm so scores stay positive.
	pub offset: f64,
	/// Weight credited to a path on each visit.
	pub visit_weight: f64,
}
impl Default for Frecency {
	fn default() -> Self {
		Self {
			short_decay: 1e-4,
			long_decay: 3e-7,
			recency_reward: 10.0,
			offset: std::f64::consts::LN_10,
			visit_weight: 1.0,
		}
	}
}
