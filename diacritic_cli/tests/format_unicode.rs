mod common;

use diacritic_core::AnyEmptyResult;

#[test]
fn format_unicode_decodes_argument() -> AnyEmptyResult {
	common::diacritic_cmd()
		.arg("format-unicode")
		.arg("\\u00FC and u\\u0308")
		.assert()
		.success()
		.stdout("\u{00FC} and u\u{0308}\n");

	Ok(())
}

#[test]
fn format_unicode_keeps_incomplete_escapes() -> AnyEmptyResult {
	common::diacritic_cmd()
		.arg("format-unicode")
		.arg("\\u00F")
		.assert()
		.success()
		.stdout("\\u00F\n");

	Ok(())
}

#[test]
fn format_unicode_reads_stdin() -> AnyEmptyResult {
	common::diacritic_cmd()
		.arg("format-unicode")
		.write_stdin("unicode = \\u00FC\nunicode = u\\u0308\n")
		.assert()
		.success()
		.stdout("unicode = \u{00FC}\nunicode = u\u{0308}\n");

	Ok(())
}

#[test]
fn format_unicode_ignores_the_project() -> AnyEmptyResult {
	let tmp = common::project("[regexp]\nflags = \"gz\"\n");

	common::diacritic_cmd()
		.arg("format-unicode")
		.arg("\\u00DF")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("\u{00DF}"));

	Ok(())
}

#[test]
fn format_unicode_needs_no_records() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::diacritic_cmd()
		.arg("format-unicode")
		.arg("\\u00DF")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("\u{00DF}\n");

	Ok(())
}
