mod common;

use diacritic_core::AnyEmptyResult;

const README: &str = "# Umlauts\n\nDecomposed: <% diacritics: language=de;decompose %>\n";
const README_REPLACED: &str = "# Umlauts\n\nDecomposed: ue, UE, oe, OE, ae, AE, ss\n";

#[test]
fn replace_prints_result() -> AnyEmptyResult {
	let tmp = common::project("");
	std::fs::write(tmp.path().join("readme.md"), README)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg(tmp.path().join("readme.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(README_REPLACED);

	// Printing leaves the file alone.
	assert_eq!(std::fs::read_to_string(tmp.path().join("readme.md"))?, README);

	Ok(())
}

#[test]
fn replace_reads_stdin() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("Native: <% diacritics: variant=es;native %>")
		.assert()
		.success()
		.stdout("Native: Espa\u{00F1}ol");

	Ok(())
}

#[test]
fn replace_write_updates_file() -> AnyEmptyResult {
	let tmp = common::project("");
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg(&readme)
		.arg("--write")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated"));

	assert_eq!(std::fs::read_to_string(&readme)?, README_REPLACED);

	common::diacritic_cmd()
		.arg("replace")
		.arg(&readme)
		.arg("--write")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn replace_check_fails_with_diff() -> AnyEmptyResult {
	let tmp = common::project("");
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg(&readme)
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("Check failed"))
		.stderr(predicates::str::contains("-Decomposed: <% diacritics"))
		.stderr(predicates::str::contains("+Decomposed: ue, UE"));

	assert_eq!(std::fs::read_to_string(&readme)?, README);

	Ok(())
}

#[test]
fn replace_check_passes_without_placeholders() -> AnyEmptyResult {
	let tmp = common::project("");
	let readme = tmp.path().join("readme.md");
	std::fs::write(&readme, README_REPLACED)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg(&readme)
		.arg("--check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn replace_warns_about_unresolved_placeholders() -> AnyEmptyResult {
	let tmp = common::project("");
	let input = "<% diacritics: bas3=u;raw %> <% diacritics: language=xx;alphabet %>";

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin(input)
		.assert()
		.success()
		.stdout(input)
		.stderr(predicates::str::contains("warning: invalid placeholder"))
		.stderr(predicates::str::contains("Language 'xx' was not found"));

	Ok(())
}

#[test]
fn replace_flags_override_config() -> AnyEmptyResult {
	let tmp = common::project("\n[placeholder]\njoiner = \" / \"\n");

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("<% diacritics: variant=de;countries[0,1] %>")
		.assert()
		.success()
		.stdout("AT / BE");

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.arg("--joiner")
		.arg(" | ")
		.arg("--exclude")
		.arg("\u{00F6},\u{00D6},\u{00DF}")
		.write_stdin("<% diacritics: language=de;decompose %>")
		.assert()
		.success()
		.stdout("ue | UE | ae | AE");

	Ok(())
}

#[test]
fn replace_uses_configured_template() -> AnyEmptyResult {
	let tmp = common::project("\n[placeholder]\ntemplate = \"{{ {data} }}\"\n");

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("{{ language=de;alphabet }} <% diacritics: language=de;alphabet %>")
		.assert()
		.success()
		.stdout("Latn <% diacritics: language=de;alphabet %>");

	Ok(())
}

#[test]
fn replace_rejects_invalid_utf8() -> AnyEmptyResult {
	let tmp = common::project("");

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin(vec![0x66, 0x6f, 0xff])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("diacritic::invalid_input"))
		.stdout(predicates::str::is_empty());

	Ok(())
}
