mod common;

use diacritic_core::AnyEmptyResult;

#[test]
fn transliterate_to_base() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("\u{00BF}Qu\u{00E9}?")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("?Que?\n");

	Ok(())
}

#[test]
fn transliterate_to_decompose() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("Stra\u{00DF}e")
		.arg("--kind")
		.arg("decompose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("Strasse\n");

	Ok(())
}

#[test]
fn transliterate_with_variant() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("\u{00F1}-\u{00DF}")
		.arg("--kind")
		.arg("decompose")
		.arg("--variant")
		.arg("de")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("\u{00F1}-ss\n");

	Ok(())
}

#[test]
fn transliterate_reads_stdin() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("--kind")
		.arg("decompose")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("Mu\u{0308}ller\n")
		.assert()
		.success()
		.stdout("Mueller\n");

	Ok(())
}

#[test]
fn transliterate_rejects_unknown_kind() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("\u{00FC}")
		.arg("--kind")
		.arg("other")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid value 'other'"));

	Ok(())
}
