pub mod commands;

use std::{
	env,
	io::{self, Write},
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use commands::Context;

#[derive(Debug, Parser)]
#[command(
	version = jumper_cli::VERSION,
	rename_all = "kebab",
	styles = jumper_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE", global = true)]
	pub config: Option<PathBuf>,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print the best matching paths of a store, best first.
	Find(FindArgs),
	/// Record a visit of a path.
	Update(UpdateArgs),
	/// Print the configuration and a summary of the stores.
	Status(StatusArgs),
	/// Drop records of paths that no longer exist or that match a filter.
	Clean(CleanArgs),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StoreKind {
	Directories,
	Files,
}
impl StoreKind {
	pub fn label(self) -> &'static str {
		match self {
			Self::Directories => "directories",
			Self::Files => "files",
		}
	}

	/// Whether `path` currently exists as this kind of entry, following symlinks.
	pub fn exists(self, path: &Path) -> bool {
		match self {
			Self::Directories => path.is_dir(),
			Self::Files => path.is_file(),
		}
	}
}

#[derive(Debug, Default, clap::Args)]
pub struct StoreArgs {
	/// Store to use; also decides what counts as an existing path.
	#[arg(long = "type", short = 't', value_enum, value_name = "TYPE")]
	pub kind: Option<StoreKind>,
	/// Explicit store file, overriding the configured location.
	#[arg(long, short = 'f', value_name = "FILE")]
	pub file: Option<PathBuf>,
}
impl StoreArgs {
	pub fn is_unset(&self) -> bool {
		self.kind.is_none() && self.file.is_none()
	}
}

#[derive(Debug, Default, clap::Args)]
pub struct FindArgs {
	#[arg(value_name = "QUERY")]
	pub query: Vec<String>,
	#[command(flatten)]
	pub store: StoreArgs,
	#[arg(long, short = 'n', value_name = "N")]
	pub max_results: Option<u32>,
	/// Highlight matched characters.
	#[arg(long)]
	pub color: bool,
	/// Prefix each path with its score.
	#[arg(long, short = 's')]
	pub scores: bool,
	/// Weight of the text match against frecency.
	#[arg(long, short = 'b', value_name = "BETA")]
	pub beta: Option<f64>,
	/// Also try the query tokens in other orders.
	#[arg(long, short = 'o')]
	pub orderless: bool,
	#[arg(long, value_name = "SYNTAX")]
	pub syntax: Option<String>,
	#[arg(long, value_name = "MODE")]
	pub case_mode: Option<String>,
	/// Only list paths that still exist.
	#[arg(long, short = 'e')]
	pub existing: bool,
	/// Print paths under $HOME with a leading `~`.
	#[arg(long)]
	pub home_tilde: bool,
	/// Print paths under DIR relative to it.
	#[arg(long, value_name = "DIR")]
	pub relative_to: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
	#[arg(value_name = "PATH")]
	pub path: String,
	#[command(flatten)]
	pub store: StoreArgs,
	/// Weight credited for this visit.
	#[arg(long, short = 'w', value_name = "WEIGHT")]
	pub weight: Option<f64>,
}

#[derive(Debug, clap::Args)]
pub struct StatusArgs {
	#[arg(value_name = "QUERY")]
	pub query: Vec<String>,
	#[command(flatten)]
	pub store: StoreArgs,
	/// Number of top entries to list per store.
	#[arg(long, short = 'n', value_name = "N", default_value_t = 5)]
	pub max_results: u32,
}

#[derive(Debug, clap::Args)]
pub struct CleanArgs {
	#[command(flatten)]
	pub store: StoreArgs,
	/// Keep the store and leave the filtered copy next to it.
	#[arg(long)]
	pub dry_run: bool,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let config = jumper_config::load_or_default(args.config.as_deref())?;

	init_tracing(&config.service.log_level);

	let paths = jumper_config::store_paths(&config)?;
	let now = OffsetDateTime::now_utc().unix_timestamp();
	let home = env::var("HOME").ok().filter(|home| !home.is_empty());
	let ctx = Context::new(config, args.config, paths, now, home)?;
	let stdout = io::stdout();
	let mut out = stdout.lock();

	commands::dispatch(&ctx, &args.command, &mut out)?;

	out.flush()?;

	Ok(())
}

fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
