use jumper_domain::{frecency::FrecencyModel, record::Record};
use jumper_storage::{CleanReport, Error, Filters, RecordReader, store};
use jumper_testkit::TestStore;

const NOW: i64 = 1_700_000_000;

#[test]
fn missing_store_reads_as_none() {
	let test_store = TestStore::new().expect("Failed to create test store.");

	assert!(RecordReader::open(test_store.path()).expect("Open should succeed.").is_none());
	assert!(
		store::stats(test_store.path(), NOW, &FrecencyModel::default())
			.expect("Stats should succeed.")
			.is_none()
	);
	assert!(
		store::clean(test_store.path(), |_| true, false).expect("Clean should succeed.").is_none()
	);
}

#[test]
fn reader_streams_records_in_order() {
	let records = vec![Record::new("/a", 1.0, NOW - 10), Record::new("/b", 2.5, NOW - 20)];
	let test_store = TestStore::with_records(&records).expect("Failed to create test store.");
	let reader = RecordReader::open(test_store.path())
		.expect("Open should succeed.")
		.expect("Store should exist.");
	let read: Vec<Record> = reader.collect::<Result<_, _>>().expect("Every line should parse.");

	assert_eq!(read, records);
}

#[test]
fn reader_reports_corrupt_line_number() {
	let test_store = TestStore::with_lines(&["/a|1.000000|10", "/b|oops|20"])
		.expect("Failed to create test store.");
	let results: Vec<_> = RecordReader::open(test_store.path())
		.expect("Open should succeed.")
		.expect("Store should exist.")
		.collect();

	assert!(results[0].is_ok());

	match &results[1] {
		Err(Error::CorruptRecord { line, .. }) => assert_eq!(*line, 2),
		other => panic!("Unexpected result: {other:?}."),
	}
}

#[test]
fn visit_creates_store_and_appends_new_path() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let model = FrecencyModel::default();
	let record = store::visit(test_store.path(), "/home/user", 1.0, NOW, &model)
		.expect("Visit should succeed.");

	assert_eq!(record, Record::new("/home/user", 1.0, NOW));

	store::visit(test_store.path(), "/tmp", 2.0, NOW, &model).expect("Visit should succeed.");

	assert_eq!(
		test_store.read_lines().expect("Store should be readable."),
		vec!["/home/user|1.000000|1700000000", "/tmp|2.000000|1700000000"]
	);
}

#[test]
fn visit_decays_and_increments_existing_record() {
	let model = FrecencyModel::default();
	let test_store = TestStore::with_records(&[
		Record::new("/a", 3.0, NOW - 1_000),
		Record::new("/b", 4.0, NOW - 86_400),
		Record::new("/c", 5.0, NOW - 60),
	])
	.expect("Failed to create test store.");
	let record =
		store::visit(test_store.path(), "/b", 1.0, NOW, &model).expect("Visit should succeed.");
	let expected = model.record_visit(4.0, 86_400.0, 1.0);

	assert_eq!(record.last_visit, NOW);
	assert!((record.visit_weight - expected).abs() < 1e-12);

	let lines = test_store.read_lines().expect("Store should be readable.");

	assert_eq!(lines.len(), 3);
	assert_eq!(lines[0], "/a|3.000000|1699999000");
	assert_eq!(lines[1], format!("/b|{expected:.6}|{NOW}"));
	assert_eq!(lines[2], "/c|5.000000|1699999940");
	assert_eq!(test_store.entries().expect("Directory should list."), vec!["store"]);
}

#[test]
fn visit_does_not_match_path_prefixes() {
	let model = FrecencyModel::default();
	let test_store = TestStore::with_records(&[Record::new("/a/b", 3.0, NOW)])
		.expect("Failed to create test store.");

	store::visit(test_store.path(), "/a", 1.0, NOW, &model).expect("Visit should succeed.");

	assert_eq!(test_store.read_lines().expect("Store should be readable.").len(), 2);
}

#[test]
fn clean_removes_rejected_records() {
	let test_store = TestStore::with_records(&[
		Record::new("/keep", 1.0, NOW),
		Record::new("/drop", 1.0, NOW),
		Record::new("/keep/too", 1.0, NOW),
	])
	.expect("Failed to create test store.");
	let report = store::clean(test_store.path(), |record| record.path.starts_with("/keep"), false)
		.expect("Clean should succeed.")
		.expect("Store should exist.");

	assert_eq!(report, CleanReport { kept: 2, removed: 1, staged: None });
	assert_eq!(
		test_store.read_lines().expect("Store should be readable."),
		vec!["/keep|1.000000|1700000000", "/keep/too|1.000000|1700000000"]
	);
	assert_eq!(test_store.entries().expect("Directory should list."), vec!["store"]);
}

#[test]
fn clean_dry_run_keeps_store_and_stages_copy() {
	let test_store =
		TestStore::with_records(&[Record::new("/keep", 1.0, NOW), Record::new("/drop", 1.0, NOW)])
			.expect("Failed to create test store.");
	let before = test_store.read_lines().expect("Store should be readable.");
	let report = store::clean(test_store.path(), |record| record.path == "/keep", true)
		.expect("Clean should succeed.")
		.expect("Store should exist.");
	let staged = report.staged.expect("Dry run should keep the filtered copy.");

	assert_eq!((report.kept, report.removed), (1, 1));
	assert_eq!(test_store.read_lines().expect("Store should be readable."), before);
	assert_eq!(staged.parent(), Some(test_store.dir()));
	assert_eq!(
		std::fs::read_to_string(&staged).expect("Staged copy should be readable."),
		"/keep|1.000000|1700000000\n"
	);
}

#[test]
fn clean_without_removals_writes_nothing() {
	let test_store = TestStore::with_lines(&["/a|1.5|10   "]).expect("Failed to create test store.");
	let report = store::clean(test_store.path(), |_| true, true)
		.expect("Clean should succeed.")
		.expect("Store should exist.");

	assert_eq!(report, CleanReport { kept: 1, removed: 0, staged: None });
	assert_eq!(test_store.read_lines().expect("Store should be readable."), vec!["/a|1.5|10   "]);
	assert_eq!(test_store.entries().expect("Directory should list."), vec!["store"]);
}

#[test]
fn stats_sum_decayed_visits() {
	let model = FrecencyModel::default();
	let test_store = TestStore::with_records(&[
		Record::new("/a", 2.0, NOW),
		Record::new("/b", 4.0, NOW - 1_000_000),
	])
	.expect("Failed to create test store.");
	let stats = store::stats(test_store.path(), NOW, &model)
		.expect("Stats should succeed.")
		.expect("Store should exist.");
	let expected = 2.0 + model.decay_visits(4.0, 1_000_000.0);

	assert_eq!(stats.entries, 2);
	assert!((stats.total_visits - expected).abs() < 1e-9);
	assert!(stats.total_visits < 6.0);
}

#[test]
fn filters_load_skips_comments_and_invalid_patterns() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let path = test_store
		.write_filters(&["# caches", "", "/tmp/*", "**/.git/**", "/bad|pattern", "/x/***"])
		.expect("Failed to write filters.");
	let filters = Filters::load(&path).expect("Filters should load.");

	assert_eq!(filters.patterns(), ["/tmp/*", "**/.git/**"]);
	assert_eq!(filters.source(), Some(path.as_path()));
	assert!(filters.is_match("/tmp/scratch"));
	assert!(!filters.is_match("/tmp/scratch/deeper"));
	assert!(filters.is_match("/home/user/repo/.git/objects"));
	assert!(!filters.is_match("/home/user/repo"));
}

#[test]
fn missing_filters_file_means_no_filters() {
	let test_store = TestStore::new().expect("Failed to create test store.");
	let filters =
		Filters::load(&test_store.dir().join("absent")).expect("Missing filters should load.");

	assert!(filters.is_empty());
	assert!(!filters.is_match("/tmp"));
}

#[cfg(unix)]
#[test]
fn rewrite_preserves_permissions() {
	use std::{fs, os::unix::fs::PermissionsExt};

	let model = FrecencyModel::default();
	let test_store = TestStore::with_records(&[Record::new("/a", 1.0, NOW)])
		.expect("Failed to create test store.");

	fs::set_permissions(test_store.path(), fs::Permissions::from_mode(0o640))
		.expect("Failed to set permissions.");
	store::visit(test_store.path(), "/a", 1.0, NOW, &model).expect("Visit should succeed.");

	let mode = fs::metadata(test_store.path()).expect("Store should exist.").permissions().mode();

	assert_eq!(mode & 0o777, 0o640);
}
