use assert_cmd::Command;
use tempfile::TempDir;

pub const DIACRITICS_JSON: &str =
	include_str!("../../diacritic_core/tests/fixtures/diacritics.json");

pub fn diacritic_cmd() -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_diacritic"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// A project root holding the record file and a config that points at it.
pub fn project(config: &str) -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(tmp.path().join("diacritics.json"), DIACRITICS_JSON)
		.unwrap_or_else(|e| panic!("write records: {e}"));
	std::fs::write(
		tmp.path().join("diacritic.toml"),
		format!("data = \"diacritics.json\"\n{config}"),
	)
	.unwrap_or_else(|e| panic!("write config: {e}"));
	tmp
}
