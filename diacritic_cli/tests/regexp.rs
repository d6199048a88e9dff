mod common;

use diacritic_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn regexp_prints_equivalents() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("T(\u{00E9}|e\u{0301})st\n");

	Ok(())
}

#[test]
fn regexp_reports_test_inputs() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--test")
		.arg("Te\u{0301}st")
		.arg("--test")
		.arg("Test")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("match: Te\u{0301}st"))
		.stdout(predicates::str::contains("no match: Test"));

	Ok(())
}

#[test]
fn regexp_uses_config_defaults() -> AnyEmptyResult {
	let tmp = common::project("\n[regexp]\ncase_sensitive = false\n");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--test")
		.arg("T\u{00C9}st")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("\u{00C9}"))
		.stdout(predicates::str::contains("no match").not());

	Ok(())
}

#[test]
fn regexp_without_diacritics() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--no-diacritics")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("T\\S{1,2}st\n");

	Ok(())
}

#[test]
fn regexp_only_diacritics() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st \u{00FC}")
		.arg("--only-diacritics")
		.arg("--no-equivalents")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("(\u{00E9}\u{00FC})\n");

	Ok(())
}

#[test]
fn regexp_rejects_unknown_flag() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--flags")
		.arg("gz")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("diacritic::invalid_flag"));

	Ok(())
}

#[test]
fn regexp_loads_records_from_data_flag() -> AnyEmptyResult {
	let records = common::project("");
	let empty = tempfile::tempdir()?;

	common::diacritic_cmd()
		.arg("regexp")
		.arg("\u{00F1}")
		.arg("--path")
		.arg(empty.path())
		.arg("--data")
		.arg(records.path().join("diacritics.json"))
		.assert()
		.success()
		.stdout("(\u{00F1}|n\u{0303})\n");

	Ok(())
}

#[test]
fn regexp_requires_records() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::diacritic_cmd()
		.arg("regexp")
		.arg("T\u{00E9}st")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no record file"));

	Ok(())
}
