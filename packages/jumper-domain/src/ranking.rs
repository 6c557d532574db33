//! Combines the best alignment over all compiled query variants with a record's frecency.

use std::ops::Range;

use jumper_config::Config;

use crate::{
	frecency::FrecencyModel,
	matching::{self, CaseMode, Matcher, ScoringParams},
	query::CompiledQuery,
	record::Record,
};

/// Weight of the text-match total against frecency, before `beta` is applied.
const TEXT_WEIGHT: f64 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct RankedMatch {
	pub score: f64,
	/// Index of the winning query variant.
	pub query_index: usize,
	pub spans: Vec<Range<usize>>,
}
impl RankedMatch {
	/// Text shown for `path`: highlighted when requested and spans were traced.
	pub fn display(&self, path: &str, highlight: bool) -> String {
		if highlight { matching::highlight(path, &self.spans) } else { path.to_string() }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct BestAlignment {
	pub total: f64,
	pub query_index: usize,
	pub spans: Vec<Range<usize>>,
}

#[derive(Clone, Debug)]
pub struct Ranker {
	pub queries: Vec<CompiledQuery>,
	pub matcher: Matcher,
	pub frecency: FrecencyModel,
	/// Weight of a variant's closeness to the typed token order.
	pub alignment_scaling: f64,
	/// Inverse temperature of the text-match score.
	pub beta: f64,
}
impl Ranker {
	pub fn new(queries: Vec<CompiledQuery>, beta: f64, case_mode: CaseMode) -> Self {
		let defaults = jumper_config::Matching::default();

		Self {
			queries,
			matcher: Matcher::new(ScoringParams::from(&defaults), case_mode),
			frecency: FrecencyModel::default(),
			alignment_scaling: defaults.alignment_scaling,
			beta,
		}
	}

	pub fn from_config(
		cfg: &Config,
		queries: Vec<CompiledQuery>,
		beta: f64,
		case_mode: CaseMode,
	) -> Self {
		Self {
			queries,
			matcher: Matcher::new(ScoringParams::from(&cfg.matching), case_mode),
			frecency: FrecencyModel::from(&cfg.frecency),
			alignment_scaling: cfg.matching.alignment_scaling,
			beta,
		}
	}

	/// Best `alignment score + scaling * closeness` over every variant; the first variant wins
	/// ties.
	pub fn best_alignment(&self, path: &str, with_spans: bool) -> Option<BestAlignment> {
		let mut best: Option<BestAlignment> = None;

		for (query_index, query) in self.queries.iter().enumerate() {
			let Some(alignment) = self.matcher.align(path, query, with_spans) else { continue };
			let total =
				f64::from(alignment.score) + self.alignment_scaling * query.alignment_closeness;

			if best.as_ref().is_none_or(|current| total > current.total) {
				best = Some(BestAlignment { total, query_index, spans: alignment.spans });
			}
		}

		best
	}

	/// Final ranking score of `record` at `now`, or `None` when no variant aligns.
	pub fn evaluate(&self, record: &Record, now: i64, with_spans: bool) -> Option<RankedMatch> {
		let best = self.best_alignment(&record.path, with_spans)?;
		let score = self.beta * TEXT_WEIGHT * best.total + record.frecency(now, &self.frecency);

		Some(RankedMatch { score, query_index: best.query_index, spans: best.spans })
	}

	pub fn rank(&self, record: &Record, now: i64, want_highlight: bool) -> Option<(f64, String)> {
		let ranked = self.evaluate(record, now, want_highlight)?;
		let display = ranked.display(&record.path, want_highlight);

		Some((ranked.score, display))
	}
}

/// Ranks one record with the default magnitudes.
pub fn rank(
	record: &Record,
	queries: &[CompiledQuery],
	beta: f64,
	case_mode: CaseMode,
	want_highlight: bool,
	now: i64,
) -> Option<(f64, String)> {
	Ranker::new(queries.to_vec(), beta, case_mode).rank(record, now, want_highlight)
}
