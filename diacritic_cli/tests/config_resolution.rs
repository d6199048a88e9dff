mod common;

use diacritic_core::AnyEmptyResult;

#[test]
fn resolves_dot_config_diacritic_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join("records.json"), common::DIACRITICS_JSON)?;
	std::fs::write(
		tmp.path().join(".config/diacritic.toml"),
		"data = \"records.json\"\n\n[placeholder]\njoiner = \"+\"\n",
	)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("<% diacritics: variant=es;continent %>")
		.assert()
		.success()
		.stdout("NA+SA+EU");

	Ok(())
}

#[test]
fn root_config_wins_over_dot_config() -> AnyEmptyResult {
	let tmp = common::project("\n[placeholder]\njoiner = \";\"\n");
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/diacritic.toml"),
		"data = \"diacritics.json\"\n\n[placeholder]\njoiner = \"+\"\n",
	)?;

	common::diacritic_cmd()
		.arg("replace")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("<% diacritics: variant=es;continent %>")
		.assert()
		.success()
		.stdout("NA;SA;EU");

	Ok(())
}

#[test]
fn malformed_config_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("diacritic.toml"), "data = [unclosed")?;

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("\u{00FC}")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("diacritic::config_parse"));

	Ok(())
}

#[test]
fn missing_record_file_is_reported() -> AnyEmptyResult {
	let tmp = common::project("");
	std::fs::remove_file(tmp.path().join("diacritics.json"))?;

	common::diacritic_cmd()
		.arg("transliterate")
		.arg("\u{00FC}")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("diacritic::data_file"));

	Ok(())
}
