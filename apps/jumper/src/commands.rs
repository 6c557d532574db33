//! Subcommand handlers. Reports go to the writer passed in, never straight to stdout.

use std::{
	io::{IsTerminal, Write},
	ops::Range,
	path::{Path, PathBuf},
};

use color_eyre::{Result, eyre};

use jumper_config::{Config, PathSource, ResolvedPath, StorePaths};
use jumper_domain::{
	frecency::FrecencyModel,
	matching::{self, CaseMode},
	query::{self, Syntax},
	ranking::Ranker,
	record::Record,
	selector::Selector,
};
use jumper_storage::{Filters, RecordReader, store};

use crate::{CleanArgs, Command, FindArgs, StatusArgs, StoreArgs, StoreKind, UpdateArgs};

/// Everything a handler needs besides its arguments.
pub struct Context {
	pub config: Config,
	pub config_path: Option<PathBuf>,
	pub paths: StorePaths,
	pub filters: Filters,
	/// Unix seconds all scores are computed at.
	pub now: i64,
	pub home: Option<String>,
}
impl Context {
	/// Loads the filters named by `paths`.
	pub fn new(
		config: Config,
		config_path: Option<PathBuf>,
		paths: StorePaths,
		now: i64,
		home: Option<String>,
	) -> Result<Self> {
		let filters = match &paths.filters {
			Some(resolved) => Filters::load(&resolved.path)?,
			None => Filters::empty(),
		};

		Ok(Self { config, config_path, paths, filters, now, home })
	}

	pub fn store_path(&self, kind: StoreKind) -> &Path {
		match kind {
			StoreKind::Directories => &self.paths.directories.path,
			StoreKind::Files => &self.paths.files.path,
		}
	}

	/// The store named by `args`, directories by default.
	fn select(&self, args: &StoreArgs) -> (PathBuf, StoreKind) {
		let kind = args.kind.unwrap_or(StoreKind::Directories);
		let path = args.file.clone().unwrap_or_else(|| self.store_path(kind).to_path_buf());

		(path, kind)
	}

	fn frecency(&self) -> FrecencyModel {
		FrecencyModel::from(&self.config.frecency)
	}
}

/// Ranking and display settings of one search pass.
#[derive(Clone, Debug)]
pub struct SearchOptions {
	pub query: String,
	pub limit: usize,
	pub beta: f64,
	pub case_mode: CaseMode,
	pub syntax: Syntax,
	pub orderless: bool,
	pub highlight: bool,
	pub scores: bool,
	pub existing: bool,
	pub home_tilde: bool,
	pub relative_to: Option<String>,
}
impl SearchOptions {
	pub fn from_config(cfg: &Config) -> Result<Self> {
		Ok(Self {
			query: String::new(),
			limit: cfg.search.max_results as usize,
			beta: cfg.search.beta,
			case_mode: cfg.search.case_mode.parse()?,
			syntax: cfg.search.syntax.parse()?,
			orderless: cfg.search.orderless,
			highlight: false,
			scores: false,
			existing: false,
			home_tilde: false,
			relative_to: None,
		})
	}

	pub fn for_find(cfg: &Config, args: &FindArgs) -> Result<Self> {
		let mut options = Self::from_config(cfg)?;

		options.query = args.query.join(" ");

		if let Some(max_results) = args.max_results {
			options.limit = max_results as usize;
		}
		if let Some(beta) = args.beta {
			if !beta.is_finite() || beta < 0.0 {
				return Err(eyre::eyre!("Beta must be a finite number, zero or greater."));
			}

			options.beta = beta;
		}
		if let Some(syntax) = &args.syntax {
			options.syntax = syntax.parse()?;
		}
		if let Some(case_mode) = &args.case_mode {
			options.case_mode = case_mode.parse()?;
		}

		options.orderless |= args.orderless;
		options.highlight = args.color;
		options.scores = args.scores;
		options.existing = args.existing;
		options.home_tilde = args.home_tilde;
		options.relative_to = args
			.relative_to
			.as_ref()
			.map(|dir| dir.to_string_lossy().trim_end_matches('/').to_string());

		Ok(options)
	}

	/// Rewrites `path` for display and moves `spans` along with it.
	fn shorten(&self, path: &str, spans: &[Range<usize>], home: Option<&str>) -> Shortened {
		if let Some(dir) = self.relative_to.as_deref()
			&& let Some(shortened) = strip_dir(path, dir, ".", "")
		{
			return shortened.remap(spans);
		}
		if self.home_tilde
			&& let Some(home) = home
			&& let Some(shortened) = strip_dir(path, home.trim_end_matches('/'), "~", "~/")
		{
			return shortened.remap(spans);
		}

		Shortened { text: path.to_string(), spans: spans.to_vec() }
	}
}

struct Shortened {
	text: String,
	spans: Vec<Range<usize>>,
}

/// A display path whose characters from `lead` on are the source path's from `skipped` on.
struct Stripped {
	text: String,
	skipped: usize,
	lead: usize,
}
impl Stripped {
	fn remap(self, spans: &[Range<usize>]) -> Shortened {
		let spans = spans
			.iter()
			.filter_map(|span| {
				let start = span.start.max(self.skipped);

				(start < span.end)
					.then(|| start - self.skipped + self.lead..span.end - self.skipped + self.lead)
			})
			.collect();

		Shortened { text: self.text, spans }
	}
}

/// Replaces a leading `dir` by `same` when `path` is `dir`, or `dir/` by `under` when it lies
/// below it. An empty `dir` never matches.
fn strip_dir(path: &str, dir: &str, same: &str, under: &str) -> Option<Stripped> {
	if dir.is_empty() {
		return None;
	}
	if path == dir {
		return Some(Stripped { text: same.to_string(), skipped: path.chars().count(), lead: 0 });
	}

	let rest = path.strip_prefix(dir)?.strip_prefix('/')?;

	Some(Stripped {
		text: format!("{under}{rest}"),
		skipped: dir.chars().count() + 1,
		lead: under.chars().count(),
	})
}

struct Hit {
	path: String,
	spans: Vec<Range<usize>>,
}

pub fn dispatch<W>(ctx: &Context, command: &Command, out: &mut W) -> Result<()>
where
	W: Write,
{
	match command {
		Command::Find(args) => find(ctx, args, out),
		Command::Update(args) => update(ctx, args),
		Command::Status(args) => status(ctx, args, std::io::stdout().is_terminal(), out),
		Command::Clean(args) => clean(ctx, args, out),
	}
}

pub fn find<W>(ctx: &Context, args: &FindArgs, out: &mut W) -> Result<()>
where
	W: Write,
{
	let (store, kind) = ctx.select(&args.store);
	let options = SearchOptions::for_find(&ctx.config, args)?;

	search(ctx, &store, kind, &options, "", out)?;

	Ok(())
}

/// Ranks every unfiltered record of `store` and prints the best `options.limit`, each line
/// prefixed with `prefix`. Returns the number of printed paths.
pub fn search<W>(
	ctx: &Context,
	store: &Path,
	kind: StoreKind,
	options: &SearchOptions,
	prefix: &str,
	out: &mut W,
) -> Result<usize>
where
	W: Write,
{
	if options.limit == 0 {
		return Ok(0);
	}

	let Some(reader) = RecordReader::open(store)? else {
		tracing::debug!(store = %store.display(), "Store does not exist.");

		return Ok(0);
	};
	let queries = query::build_queries(&options.query, options.syntax, options.orderless)?;
	let variants = queries.len();
	let ranker = Ranker::from_config(&ctx.config, queries, options.beta, options.case_mode);
	let mut selector = Selector::create(options.limit)?;
	let mut scanned = 0_usize;
	let mut matched = 0_usize;

	for record in reader {
		let record = record?;

		scanned += 1;

		if ctx.filters.is_match(&record.path) {
			continue;
		}

		let Some(ranked) = ranker.evaluate(&record, ctx.now, options.highlight) else { continue };

		matched += 1;

		if selector.would_accept(ranked.score)
			&& (!options.existing || kind.exists(Path::new(&record.path)))
		{
			selector.insert(ranked.score, Hit { path: record.path, spans: ranked.spans });
		}
	}

	tracing::debug!(store = %store.display(), variants, scanned, matched, "Ranked store.");

	let results = selector.drain_sorted_descending();

	for ranked in &results {
		let hit = &ranked.payload;
		let shortened = options.shorten(&hit.path, &hit.spans, ctx.home.as_deref());
		let text = if options.highlight {
			matching::highlight(&shortened.text, &shortened.spans)
		} else {
			shortened.text
		};

		write!(out, "{prefix}")?;

		if options.scores {
			write!(out, "{:.3}  ", ranked.score)?;
		}

		writeln!(out, "{text}")?;
	}

	Ok(results.len())
}

pub fn update(ctx: &Context, args: &UpdateArgs) -> Result<()> {
	let (store, _) = ctx.select(&args.store);
	let weight = args.weight.unwrap_or(ctx.config.frecency.visit_weight);

	if args.path.is_empty() || args.path.contains(['\n', '\r']) {
		return Err(eyre::eyre!("Path must be non-empty and fit on one line."));
	}
	if !weight.is_finite() || weight <= 0.0 {
		return Err(eyre::eyre!("Visit weight must be a finite number greater than zero."));
	}
	if ctx.filters.is_match(&args.path) {
		tracing::debug!(path = %args.path, "Path matches a filter. Skipping update.");

		return Ok(());
	}

	let record = store::visit(&store, &args.path, weight, ctx.now, &ctx.frecency())?;

	tracing::info!(store = %store.display(), path = %record.path, "Updated record.");

	Ok(())
}

pub fn status<W>(ctx: &Context, args: &StatusArgs, color: bool, out: &mut W) -> Result<()>
where
	W: Write,
{
	if !args.store.is_unset() {
		let (store, kind) = ctx.select(&args.store);
		let header = store.display().to_string();

		return status_store(ctx, &header, &store, kind, args, color, out);
	}

	print_config(ctx, color, out)?;

	for (label, kind) in [("DIRECTORIES", StoreKind::Directories), ("FILES", StoreKind::Files)] {
		writeln!(out)?;
		status_store(ctx, label, ctx.store_path(kind), kind, args, color, out)?;
	}

	Ok(())
}

fn print_config<W>(ctx: &Context, color: bool, out: &mut W) -> Result<()>
where
	W: Write,
{
	writeln!(out, "{}", jumper_cli::bold("CONFIG:", color))?;

	match &ctx.config_path {
		Some(path) => writeln!(out, "  config: {}", path.display())?,
		None => writeln!(out, "  config: (defaults)")?,
	}

	writeln!(out, "  directories: {}", describe(&ctx.paths.directories))?;
	writeln!(out, "  files: {}", describe(&ctx.paths.files))?;

	match &ctx.paths.filters {
		Some(resolved) => {
			let count = ctx.filters.len();
			let plural = if count == 1 { "" } else { "s" };
			let mut line = format!("{} ({count} pattern{plural})", resolved.path.display());

			if let PathSource::Env(var) = resolved.source {
				line.push_str(&format!(" (via ${var})"));
			}

			writeln!(out, "  filters: {line}")?;
		},
		None => writeln!(out, "  filters: (disabled)")?,
	}

	Ok(())
}

fn describe(resolved: &ResolvedPath) -> String {
	match resolved.source {
		PathSource::Config => format!("{} (from config)", resolved.path.display()),
		PathSource::Env(var) => format!("{} (via ${var})", resolved.path.display()),
		PathSource::Home => resolved.path.display().to_string(),
	}
}

fn status_store<W>(
	ctx: &Context,
	header: &str,
	store: &Path,
	kind: StoreKind,
	args: &StatusArgs,
	color: bool,
	out: &mut W,
) -> Result<()>
where
	W: Write,
{
	writeln!(out, "{}", jumper_cli::bold(&format!("{header}:"), color))?;

	let Some(stats) = store::stats(store, ctx.now, &ctx.frecency())? else {
		writeln!(out, "  File does not exist.")?;

		return Ok(());
	};

	writeln!(out, "  {} entries, {:.1} total visits", stats.entries, stats.total_visits)?;

	if args.max_results == 0 {
		return Ok(());
	}

	let mut options = SearchOptions::from_config(&ctx.config)?;

	options.query = args.query.join(" ");
	options.limit = args.max_results as usize;
	options.scores = true;

	if options.query.is_empty() {
		writeln!(out, "  Top {} entries:", args.max_results)?;
	} else {
		writeln!(out, "  Top {} entries matching {}:", args.max_results, options.query)?;
	}

	search(ctx, store, kind, &options, "  ", out)?;

	Ok(())
}

pub fn clean<W>(ctx: &Context, args: &CleanArgs, out: &mut W) -> Result<()>
where
	W: Write,
{
	if !args.store.is_unset() {
		let (store, kind) = ctx.select(&args.store);

		return clean_store(ctx, &store, kind, args.dry_run, out);
	}

	clean_store(ctx, ctx.store_path(StoreKind::Files), StoreKind::Files, args.dry_run, out)?;
	writeln!(out)?;
	clean_store(
		ctx,
		ctx.store_path(StoreKind::Directories),
		StoreKind::Directories,
		args.dry_run,
		out,
	)
}

fn clean_store<W>(
	ctx: &Context,
	store: &Path,
	kind: StoreKind,
	dry_run: bool,
	out: &mut W,
) -> Result<()>
where
	W: Write,
{
	let label = kind.label();

	writeln!(out, "Cleaning {label} store {}...", store.display())?;

	let keep = |record: &Record| {
		!ctx.filters.is_match(&record.path) && kind.exists(Path::new(&record.path))
	};
	let Some(report) = store::clean(store, keep, dry_run)? else {
		writeln!(out, "File does not exist.")?;

		return Ok(());
	};

	writeln!(out, "Cleaned {} {label} (kept {})", report.removed, report.kept)?;

	if let Some(staged) = report.staged {
		writeln!(out, "Dry run: filtered data saved to {}", staged.display())?;
		writeln!(out, "Original store unchanged: {}", store.display())?;
	}

	Ok(())
}
