//! Banded dynamic-programming alignment of a compiled query against one haystack.
//!
//! A full alignment has to absorb every query character, so cell `(i, j)` is only reachable
//! when `j - 1 <= i <= j + n - m`. The table therefore stores one band of `n - m + 2` rows,
//! indexed by `i - j + 1`, instead of the full `n * m` grid. Each band row is one diagonal
//! sweep of the haystack.

use std::{ops::Range, str::FromStr};

use crate::{Error, Result, query::CompiledQuery};

/// Opens a highlighted run in display output.
pub const HIGHLIGHT_START: &str = "\x1b[32m";
/// Closes a highlighted run in display output.
pub const HIGHLIGHT_END: &str = "\x1b[0m";
/// Score reported for the empty query, which matches every haystack.
pub const EMPTY_QUERY_SCORE: i32 = 1;

const UNREACHABLE: i32 = -1;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaseMode {
	Sensitive,
	Insensitive,
	/// Lowercase haystack letters match either case; uppercase ones only match themselves.
	#[default]
	SemiSensitive,
}
impl FromStr for CaseMode {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		match value {
			"sensitive" => Ok(Self::Sensitive),
			"insensitive" => Ok(Self::Insensitive),
			"semi_sensitive" | "semi-sensitive" => Ok(Self::SemiSensitive),
			other => Err(Error::InvalidCaseMode(other.to_string())),
		}
	}
}

/// Bonus and penalty magnitudes of the alignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoringParams {
	pub match_bonus: i32,
	pub post_separator_bonus: i32,
	pub post_slash_bonus: i32,
	pub camel_case_bonus: i32,
	pub end_of_path_bonus: i32,
	pub uppercase_bonus: i32,
	pub first_gap_penalty: i32,
	pub gap_penalty: i32,
}
impl Default for ScoringParams {
	fn default() -> Self {
		Self::from(&jumper_config::Matching::default())
	}
}
impl From<&jumper_config::Matching> for ScoringParams {
	fn from(cfg: &jumper_config::Matching) -> Self {
		Self {
			match_bonus: cfg.match_bonus,
			post_separator_bonus: cfg.post_separator_bonus,
			post_slash_bonus: cfg.post_slash_bonus,
			camel_case_bonus: cfg.camel_case_bonus,
			end_of_path_bonus: cfg.end_of_path_bonus,
			uppercase_bonus: cfg.uppercase_bonus,
			first_gap_penalty: cfg.first_gap_penalty,
			gap_penalty: cfg.gap_penalty,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alignment {
	pub score: i32,
	/// Matched runs as character index ranges into the haystack, in ascending order. Empty unless
	/// spans were requested.
	pub spans: Vec<Range<usize>>,
}

#[derive(Clone, Copy, Debug)]
struct Cell {
	matched: i32,
	gap: i32,
}
impl Cell {
	const ORIGIN: Self = Self { matched: 0, gap: 0 };
	const UNREACHABLE: Self = Self { matched: UNREACHABLE, gap: UNREACHABLE };

	fn is_reachable(self) -> bool {
		self.matched != UNREACHABLE || self.gap != UNREACHABLE
	}

	fn best(self) -> i32 {
		self.matched.max(self.gap)
	}
}

struct Band {
	cells: Vec<Cell>,
	width: usize,
}
impl Band {
	fn new(height: usize, width: usize) -> Self {
		let mut cells = vec![Cell::UNREACHABLE; height * width];

		for row in cells.chunks_mut(width) {
			row[0] = Cell::ORIGIN;
		}

		Self { cells, width }
	}

	fn get(&self, i: usize, j: usize) -> Cell {
		self.cells[(i + 1 - j) * self.width + j]
	}

	/// The previous diagonal sweep and the current one, borrowed together.
	fn sweep_mut(&mut self, row: usize) -> (&[Cell], &mut [Cell]) {
		let (before, after) = self.cells.split_at_mut(row * self.width);

		(&before[(row - 1) * self.width..], &mut after[..self.width])
	}
}

#[derive(Clone, Debug, Default)]
pub struct Matcher {
	pub params: ScoringParams,
	pub case_mode: CaseMode,
}
impl Matcher {
	pub fn new(params: ScoringParams, case_mode: CaseMode) -> Self {
		Self { params, case_mode }
	}

	/// Scores `haystack` against `query`, or `None` when no alignment satisfies the query's gap
	/// mask.
	pub fn align(
		&self,
		haystack: &str,
		query: &CompiledQuery,
		with_spans: bool,
	) -> Option<Alignment> {
		if query.is_empty() {
			return Some(Alignment { score: EMPTY_QUERY_SCORE, spans: Vec::new() });
		}

		let hay: Vec<char> = haystack.chars().collect();

		if !quick_match(&hay, &query.characters, self.case_mode) {
			return None;
		}

		let n = hay.len() + 1;
		let m = query.len() + 1;
		let height = n - m + 2;
		let bonus = char_bonuses(&hay, &self.params);
		let gaps = &query.gap_allowed;
		let mut band = Band::new(height, m);
		let mut best: Option<(usize, i32)> = None;
		let mut max_column = 0_usize;

		for row in 1..height {
			let (prev, cur) = band.sweep_mut(row);

			for j in 1..m {
				let i = row + j - 1;
				let cell = Cell {
					matched: self.match_transition(&hay, query, &bonus, cur[j - 1], i, j),
					gap: self.gap_transition(prev[j], gaps[j]),
				};

				cur[j] = cell;

				if cell.is_reachable() {
					max_column = max_column.max(j);
				} else if j >= max_column {
					break;
				}

				if j == m - 1
					&& cell.matched != UNREACHABLE
					&& best.is_none_or(|(_, score)| cell.matched >= score)
					&& (gaps[m - 1] || i == n - 1)
				{
					best = Some((i, cell.matched));
				}
			}
		}

		let (end, score) = best?;
		let spans = if with_spans { self.trace_spans(&band, end, m - 1) } else { Vec::new() };

		Some(Alignment { score, spans })
	}

	fn gap_transition(&self, top: Cell, allowed: bool) -> i32 {
		if !allowed {
			return UNREACHABLE;
		}

		let gap = (top.gap - self.params.gap_penalty)
			.max(top.matched - self.params.first_gap_penalty)
			.max(UNREACHABLE);

		if gap == UNREACHABLE && top.is_reachable() { 0 } else { gap }
	}

	fn match_transition(
		&self,
		hay: &[char],
		query: &CompiledQuery,
		bonus: &[i32],
		top_left: Cell,
		i: usize,
		j: usize,
	) -> i32 {
		if j == 1 && i != 1 && !query.gap_allowed[0] {
			return UNREACHABLE;
		}

		let hay_ch = hay[i - 1];
		let query_ch = query.characters[j - 1];

		if !match_char(hay_ch, query_ch, self.case_mode) {
			return UNREACHABLE;
		}

		let predecessor = top_left.best();

		if predecessor < 0 {
			return UNREACHABLE;
		}

		let exact_case = if hay_ch.is_ascii_uppercase() && hay_ch == query_ch {
			self.params.uppercase_bonus
		} else {
			0
		};

		predecessor + bonus[i - 1] + exact_case
	}

	/// Walks back from the winning cell, deciding at each step whether the optimal predecessor was
	/// a gap or a match with the same comparison the forward pass used.
	fn trace_spans(&self, band: &Band, end: usize, last: usize) -> Vec<Range<usize>> {
		let mut spans = Vec::new();
		let mut run_end = Some(end);
		let mut skipped = false;
		let (mut i, mut j) = (end, last);

		while j > 0 && i >= j {
			let cell = band.get(i, j);

			skipped = if cell.gap == UNREACHABLE {
				false
			} else if cell.matched == UNREACHABLE {
				true
			} else if skipped {
				cell.matched - self.params.first_gap_penalty <= cell.gap - self.params.gap_penalty
			} else {
				cell.matched < cell.gap
			};
			i -= 1;

			if skipped {
				if let Some(stop) = run_end.take()
					&& i + 1 < stop
				{
					spans.push(i + 1..stop);
				}
			} else {
				if run_end.is_none() {
					run_end = Some(i + 1);
				}

				j -= 1;
			}
		}

		if let Some(stop) = run_end
			&& i < stop
		{
			spans.push(i..stop);
		}

		spans.reverse();

		spans
	}
}

/// Aligns with the default magnitudes.
pub fn align(haystack: &str, query: &CompiledQuery, case_mode: CaseMode) -> Option<Alignment> {
	Matcher::new(ScoringParams::default(), case_mode).align(haystack, query, true)
}

pub fn match_char(hay: char, query: char, case_mode: CaseMode) -> bool {
	if hay.to_ascii_lowercase() != query.to_ascii_lowercase() {
		return false;
	}

	match case_mode {
		CaseMode::Insensitive => true,
		CaseMode::Sensitive => hay == query,
		CaseMode::SemiSensitive => !hay.is_ascii_uppercase() || hay == query,
	}
}

/// Linear subsequence test run before the alignment table is allocated.
pub fn quick_match(hay: &[char], query: &[char], case_mode: CaseMode) -> bool {
	let mut pending = query.iter().peekable();

	for &ch in hay {
		match pending.peek() {
			Some(&&wanted) if match_char(ch, wanted, case_mode) => {
				pending.next();
			},
			Some(_) => {},
			None => break,
		}
	}

	pending.peek().is_none()
}

pub fn is_separator(ch: char) -> bool {
	matches!(ch, '/' | '_' | '-' | '.' | '#' | '\\' | ' ')
}

/// Per-character reward for matching at each haystack position.
pub fn char_bonuses(hay: &[char], params: &ScoringParams) -> Vec<i32> {
	let mut bonus = vec![params.match_bonus; hay.len()];
	let mut last_slash = None;
	let mut prev_is_separator = true;

	for (i, &ch) in hay.iter().enumerate() {
		let separator = is_separator(ch);

		if separator {
			if ch == '/' {
				last_slash = Some(i);
			}
		} else if prev_is_separator {
			bonus[i] += if i > 0 && hay[i - 1] == '/' {
				params.post_slash_bonus
			} else {
				params.post_separator_bonus
			};
		} else if ch.is_ascii_uppercase() && hay[i - 1].is_ascii_lowercase() {
			bonus[i] += params.camel_case_bonus;
		}

		prev_is_separator = separator;
	}

	if let Some(slash) = last_slash.filter(|&slash| slash > 0) {
		for value in &mut bonus[slash + 1..] {
			*value += params.end_of_path_bonus;
		}
	}

	bonus
}

/// Wraps each span of `haystack` in highlight escapes.
pub fn highlight(haystack: &str, spans: &[Range<usize>]) -> String {
	if spans.is_empty() {
		return haystack.to_string();
	}

	let mut out = String::with_capacity(
		haystack.len() + spans.len() * (HIGHLIGHT_START.len() + HIGHLIGHT_END.len()),
	);
	let mut pending = spans.iter().peekable();
	let mut open = false;

	for (index, ch) in haystack.chars().enumerate() {
		if open && pending.peek().is_some_and(|span| span.end == index) {
			out.push_str(HIGHLIGHT_END);
			pending.next();

			open = false;
		}
		if !open && pending.peek().is_some_and(|span| span.start == index) {
			out.push_str(HIGHLIGHT_START);

			open = true;
		}

		out.push(ch);
	}

	if open {
		out.push_str(HIGHLIGHT_END);
	}

	out
}
