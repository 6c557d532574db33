//! Query tokenization and compilation into flat character sequences with gap masks.

use std::str::FromStr;

use crate::{
	Error, Result,
	permutation::{Permutation, Permutations},
};

/// Upper bound on reorderable tokens in one query.
pub const MAX_TOKENS: usize = 50;
/// Orderless search is skipped above this many reorderable tokens.
pub const MAX_ORDERLESS_TOKENS: usize = 7;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Syntax {
	/// Whitespace-separated tokens with `^`, `$` and `'` markers.
	Extended,
	/// The whole query is one token; gaps allowed everywhere.
	Fuzzy,
	/// The whole query is one token; gaps allowed only around it.
	Exact,
}
impl FromStr for Syntax {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		match value {
			"extended" => Ok(Self::Extended),
			"fuzzy" => Ok(Self::Fuzzy),
			"exact" => Ok(Self::Exact),
			other => Err(Error::InvalidSyntax(other.to_string())),
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
	AnchoredStart,
	AnchoredEnd,
	Exact,
	Fuzzy,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
	pub text: String,
	pub kind: TokenKind,
}
impl Token {
	fn parse(word: &str) -> Self {
		if let Some(text) = word.strip_prefix('\'') {
			Self { text: text.to_string(), kind: TokenKind::Exact }
		} else if let Some(text) = word.strip_prefix('^') {
			Self { text: text.to_string(), kind: TokenKind::AnchoredStart }
		} else if let Some(text) = word.strip_suffix('$') {
			Self { text: text.to_string(), kind: TokenKind::AnchoredEnd }
		} else {
			Self { text: word.to_string(), kind: TokenKind::Fuzzy }
		}
	}
}

/// Tokens of one query, anchors split out from the reorderable ones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenSet {
	pub start: Option<Token>,
	pub end: Option<Token>,
	pub tokens: Vec<Token>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
	pub characters: Vec<char>,
	/// `gap_allowed[k]` permits skipping haystack characters before `characters[k]`; the last
	/// entry covers the tail after the final character.
	pub gap_allowed: Vec<bool>,
	pub alignment_closeness: f64,
}
impl CompiledQuery {
	pub fn len(&self) -> usize {
		self.characters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.characters.is_empty()
	}
}

pub fn tokenize(query: &str) -> Result<TokenSet> {
	let mut set = TokenSet::default();
	let mut accepted = 0_usize;

	for word in query.split_whitespace() {
		if matches!(word, "'" | "^" | "$") {
			continue;
		}

		let token = Token::parse(word);

		match token.kind {
			TokenKind::AnchoredStart => {
				if accepted > 0 {
					return Err(Error::InvalidQuery {
						message: format!("'^' is only allowed on the first token, found {word:?}."),
					});
				}

				set.start = Some(token);
			},
			TokenKind::AnchoredEnd => {
				if set.end.is_some() {
					return Err(Error::InvalidQuery {
						message: "at most one token may end with '$'.".to_string(),
					});
				}

				set.end = Some(token);
			},
			TokenKind::Exact | TokenKind::Fuzzy => {
				if set.tokens.len() == MAX_TOKENS {
					return Err(Error::InvalidQuery {
						message: format!("no more than {MAX_TOKENS} tokens are accepted."),
					});
				}

				set.tokens.push(token);
			},
		}

		accepted += 1;
	}

	Ok(set)
}

/// Lays out the anchored-start token, `order` over the reorderable tokens, then the anchored-end
/// token.
pub fn compile(set: &TokenSet, order: &[usize], alignment_closeness: f64) -> CompiledQuery {
	let mut characters = Vec::new();
	let mut gap_allowed = Vec::new();

	if let Some(start) = &set.start {
		for ch in start.text.chars() {
			characters.push(ch);
			gap_allowed.push(false);
		}
	}

	for &index in order {
		let token = &set.tokens[index];

		for (offset, ch) in token.text.chars().enumerate() {
			characters.push(ch);
			gap_allowed.push(offset == 0 || token.kind == TokenKind::Fuzzy);
		}
	}

	gap_allowed.push(true);

	if let Some(end) = &set.end {
		for ch in end.text.chars() {
			characters.push(ch);
			gap_allowed.push(false);
		}
	}

	CompiledQuery { characters, gap_allowed, alignment_closeness }
}

/// Share of `n (n - 1) / 2` ordered pairs a permutation must keep to be evaluated.
pub fn orderless_threshold(n: usize) -> f64 {
	match n {
		5 => 0.70,
		6 => 0.81,
		7 => 0.90,
		_ => 0.0,
	}
}

pub fn make_queries(query: &str, orderless: bool) -> Result<Vec<CompiledQuery>> {
	let set = tokenize(query)?;
	let n = set.tokens.len();
	let identity: Vec<usize> = (0..n).collect();
	let mut queries = vec![compile(&set, &identity, 1.0)];

	if orderless && (2..=MAX_ORDERLESS_TOKENS).contains(&n) {
		let min_pairs = orderless_threshold(n) * Permutation::max_ordered_pairs(n) as f64;

		for perm in Permutations::new(n).skip(1) {
			if perm.ordered_pairs as f64 >= min_pairs {
				queries.push(compile(&set, &perm.order, perm.closeness()));
			}
		}
	}

	Ok(queries)
}

/// Compiles `query` verbatim, spaces included, as one token.
pub fn make_standard_query(query: &str, fuzzy: bool) -> CompiledQuery {
	let characters: Vec<char> = query.chars().collect();
	let n = characters.len();
	let gap_allowed = (0..=n).map(|k| k == 0 || k == n || fuzzy).collect();

	CompiledQuery { characters, gap_allowed, alignment_closeness: 1.0 }
}

pub fn build_queries(query: &str, syntax: Syntax, orderless: bool) -> Result<Vec<CompiledQuery>> {
	match syntax {
		Syntax::Extended => make_queries(query, orderless),
		Syntax::Fuzzy => Ok(vec![make_standard_query(query, true)]),
		Syntax::Exact => Ok(vec![make_standard_query(query, false)]),
	}
}
