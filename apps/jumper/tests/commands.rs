use std::path::{Path, PathBuf};

use jumper::{
	CleanArgs, FindArgs, StatusArgs, StoreArgs, StoreKind, UpdateArgs,
	commands::{self, Context},
};
use jumper_config::{Config, PathSource, ResolvedPath, StorePaths};
use jumper_domain::{matching::HIGHLIGHT_START, record::Record};
use jumper_testkit::{TestStore, path_string};

const NOW: i64 = 1_700_000_000;

fn resolved(path: PathBuf) -> ResolvedPath {
	ResolvedPath { path, source: PathSource::Config }
}

fn context(test_store: &TestStore, filters: Option<PathBuf>, home: Option<&Path>) -> Context {
	let paths = StorePaths {
		directories: resolved(test_store.path().to_path_buf()),
		files: resolved(test_store.dir().join("files")),
		filters: filters.map(resolved),
	};

	Context::new(Config::default(), None, paths, NOW, home.map(path_string))
		.expect("Context should build.")
}

fn find_args(query: &str) -> FindArgs {
	FindArgs {
		query: query.split_whitespace().map(str::to_string).collect(),
		..FindArgs::default()
	}
}

fn run_find(ctx: &Context, args: &FindArgs) -> Vec<String> {
	let mut out = Vec::new();

	commands::find(ctx, args, &mut out).expect("Find should succeed.");

	String::from_utf8(out).expect("Output should be UTF-8.").lines().map(str::to_string).collect()
}

#[test]
fn find_orders_by_score_and_honors_limit() {
	let test_store = TestStore::with_records(&[
		Record::new("/srv/www", 2.0, NOW - 86_400),
		Record::new("/home/user/jumper", 30.0, NOW - 60),
		Record::new("/home/user/jumper/src", 1.0, NOW - 30 * 86_400),
	])
	.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);

	assert_eq!(
		run_find(&ctx, &find_args("jumper")),
		["/home/user/jumper", "/home/user/jumper/src"]
	);

	let mut args = find_args("");

	args.max_results = Some(1);

	assert_eq!(run_find(&ctx, &args), ["/home/user/jumper"]);
}

#[test]
fn find_prints_scores_with_three_decimals() {
	let test_store = TestStore::with_records(&[Record::new("/tmp", 1.0, NOW)])
		.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);
	let mut args = find_args("tmp");

	args.scores = true;

	let lines = run_find(&ctx, &args);
	let (score, path) = lines[0].split_once("  ").expect("Score should precede the path.");

	assert_eq!(path, "/tmp");
	assert_eq!(score.split_once('.').map(|(_, decimals)| decimals.len()), Some(3));
}

#[test]
fn find_skips_filtered_and_missing_paths() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let present = test_store.create_dir("projects/app").expect("Failed to create dir.");
	let hidden = test_store.create_dir("projects/.cache").expect("Failed to create dir.");
	let present = path_string(&present);
	let hidden = path_string(&hidden);
	let missing = path_string(&test_store.dir().join("projects/gone"));

	test_store
		.write_records(&[
			Record::new(present.as_str(), 2.0, NOW),
			Record::new(missing.as_str(), 1.0, NOW),
			Record::new(hidden.as_str(), 1.0, NOW),
		])
		.expect("Failed to write records.");

	let filters = test_store.write_filters(&["**/.cache"]).expect("Failed to write filters.");
	let ctx = context(&test_store, Some(filters), None);
	let mut args = find_args("projects");

	assert_eq!(run_find(&ctx, &args), [present.clone(), missing]);

	args.existing = true;

	assert_eq!(run_find(&ctx, &args), [present]);
}

#[test]
fn find_shortens_home_and_relative_paths() {
	let test_store = TestStore::with_records(&[
		Record::new("/home/user/code", 3.0, NOW),
		Record::new("/home/user", 2.0, NOW),
		Record::new("/opt/tool", 1.0, NOW),
	])
	.expect("Failed to create test store.");
	let ctx = context(&test_store, None, Some(Path::new("/home/user")));
	let mut args = find_args("");

	args.home_tilde = true;

	assert_eq!(run_find(&ctx, &args), ["~/code", "~", "/opt/tool"]);

	args.home_tilde = false;
	args.relative_to = Some(PathBuf::from("/home/user/"));

	assert_eq!(run_find(&ctx, &args), ["code", ".", "/opt/tool"]);
}

#[test]
fn find_highlights_after_shortening() {
	let test_store = TestStore::with_records(&[Record::new("/home/user/jumper", 1.0, NOW)])
		.expect("Failed to create test store.");
	let ctx = context(&test_store, None, Some(Path::new("/home/user")));
	let mut args = find_args("jumper");

	args.color = true;
	args.home_tilde = true;

	assert_eq!(run_find(&ctx, &args), [format!("~/{HIGHLIGHT_START}jumper\x1b[0m")]);
}

#[test]
fn find_on_missing_store_prints_nothing() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);

	assert!(run_find(&ctx, &find_args("x")).is_empty());
}

#[test]
fn find_rejects_invalid_query() {
	let test_store = TestStore::with_records(&[Record::new("/tmp", 1.0, NOW)])
		.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);
	let mut out = Vec::new();

	assert!(commands::find(&ctx, &find_args("a ^b"), &mut out).is_err());
}

#[test]
fn update_records_visits_and_respects_filters() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let filters = test_store.write_filters(&["/tmp/**"]).expect("Failed to write filters.");
	let ctx = context(&test_store, Some(filters), None);
	let update = |path: &str| UpdateArgs {
		path: path.to_string(),
		store: StoreArgs::default(),
		weight: Some(2.0),
	};

	commands::update(&ctx, &update("/home/user")).expect("Update should succeed.");
	commands::update(&ctx, &update("/tmp/scratch")).expect("Filtered update should succeed.");

	assert_eq!(
		test_store.read_lines().expect("Store should be readable."),
		["/home/user|2.000000|1700000000"]
	);
	assert!(commands::update(&ctx, &update("")).is_err());
	assert!(commands::update(&ctx, &update("/a\n/b")).is_err());
}

#[test]
fn status_reports_config_and_both_stores() {
	let test_store =
		TestStore::with_records(&[Record::new("/a", 2.0, NOW), Record::new("/b", 1.0, NOW)])
			.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);
	let args = StatusArgs { query: Vec::new(), store: StoreArgs::default(), max_results: 1 };
	let mut out = Vec::new();

	commands::status(&ctx, &args, false, &mut out).expect("Status should succeed.");

	let text = String::from_utf8(out).expect("Output should be UTF-8.");

	assert!(text.starts_with("CONFIG:\n  config: (defaults)\n"));
	assert!(text.contains("  filters: (disabled)\n"));
	assert!(text.contains("DIRECTORIES:\n  2 entries, 3.0 total visits\n  Top 1 entries:\n  "));
	assert!(text.ends_with("FILES:\n  File does not exist.\n"));
	assert_eq!(text.lines().filter(|line| line.ends_with("  /a")).count(), 1);
	assert!(!text.contains("  /b"));
}

#[test]
fn status_of_one_store_uses_its_path_as_header() {
	let test_store = TestStore::with_records(&[Record::new("/a", 1.0, NOW)])
		.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);
	let args = StatusArgs {
		query: vec!["a".to_string()],
		store: StoreArgs { kind: Some(StoreKind::Directories), file: None },
		max_results: 5,
	};
	let mut out = Vec::new();

	commands::status(&ctx, &args, false, &mut out).expect("Status should succeed.");

	let text = String::from_utf8(out).expect("Output should be UTF-8.");

	assert!(text.starts_with(&format!("{}:\n  1 entries", test_store.path().display())));
	assert!(text.contains("  Top 5 entries matching a:\n"));
	assert!(!text.contains("CONFIG:"));
}

#[test]
fn clean_drops_missing_and_filtered_paths() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let kept = test_store.create_dir("kept").expect("Failed to create dir.");
	let filtered = test_store.create_dir("node_modules").expect("Failed to create dir.");
	let file = test_store.create_file("notes.txt").expect("Failed to create file.");
	let (kept, filtered, file) = (path_string(&kept), path_string(&filtered), path_string(&file));

	test_store
		.write_records(&[
			Record::new(kept.as_str(), 1.0, NOW),
			Record::new(filtered.as_str(), 1.0, NOW),
			Record::new(file.as_str(), 1.0, NOW),
			Record::new("/definitely/not/here", 1.0, NOW),
		])
		.expect("Failed to write records.");

	let filters = test_store.write_filters(&["**/node_modules"]).expect("Failed to write filters.");
	let ctx = context(&test_store, Some(filters), None);
	let args = CleanArgs {
		store: StoreArgs { kind: Some(StoreKind::Directories), file: None },
		dry_run: false,
	};
	let mut out = Vec::new();

	commands::clean(&ctx, &args, &mut out).expect("Clean should succeed.");

	let text = String::from_utf8(out).expect("Output should be UTF-8.");

	assert!(text.contains("Cleaned 3 directories (kept 1)\n"));
	assert_eq!(
		test_store.read_lines().expect("Store should be readable."),
		[format!("{kept}|1.000000|{NOW}")]
	);
}

#[test]
fn clean_without_store_arguments_visits_both_stores() {
	let test_store = TestStore::with_records(&[Record::new("/definitely/not/here", 1.0, NOW)])
		.expect("Failed to create test store.");
	let ctx = context(&test_store, None, None);
	let args = CleanArgs { store: StoreArgs::default(), dry_run: true };
	let mut out = Vec::new();

	commands::clean(&ctx, &args, &mut out).expect("Clean should succeed.");

	let text = String::from_utf8(out).expect("Output should be UTF-8.");

	assert!(text.contains("Cleaning files store"));
	assert!(text.contains("File does not exist.\n"));
	assert!(text.contains("Cleaned 1 directories (kept 0)\n"));
	assert!(text.contains("Dry run: filtered data saved to "));
	assert_eq!(test_store.read_lines().expect("Store should be readable.").len(), 1);
}
