mod common;

use gb2mint_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

const GUIDE: &str = "# Guide\n\n{% hint style=\"warning\" %}\nBack up first.\n{% endhint %}\n\n{% \
                     embed url=\"https://www.youtube.com/embed/abc\" %}\n";

#[test]
fn convert_rewrites_files_in_place() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;
	std::fs::write(tmp.path().join("plain.md"), "Nothing to see.\n")?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Converted 1 file(s)"));

	let guide = std::fs::read_to_string(tmp.path().join("guide.md"))?;
	assert!(guide.contains("<Warning>Back up first.</Warning>"));
	assert!(guide.contains("src=\"https://www.youtube.com/embed/abc\""));
	assert!(!guide.contains("{%"));
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("plain.md"))?,
		"Nothing to see.\n"
	);

	Ok(())
}

#[test]
fn convert_twice_is_a_no_op() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();
	let first = std::fs::read_to_string(tmp.path().join("guide.md"))?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("guide.md"))?, first);

	Ok(())
}

#[test]
fn dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would write 1 file(s)"))
		.stdout(predicates::str::contains("guide.md -> guide.md"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("guide.md"))?, GUIDE);

	Ok(())
}

#[test]
fn diff_shows_removed_and_added_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--dry-run")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("-{% endhint %}"))
		.stderr(predicates::str::contains("+<Warning>Back up first.</Warning>"));

	Ok(())
}

#[test]
fn out_dir_mirrors_tree() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("docs/setup"))?;
	std::fs::write(tmp.path().join("docs/setup/guide.md"), GUIDE)?;
	std::fs::write(tmp.path().join("docs/plain.md"), "Plain.\n")?;
	std::fs::write(
		tmp.path().join("gb2mint.toml"),
		"[output]\nextension = \"mdx\"\n",
	)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--out-dir")
		.arg("mintlify")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Converted 2 file(s)"));

	let mirrored = std::fs::read_to_string(tmp.path().join("mintlify/docs/setup/guide.mdx"))?;
	assert!(mirrored.contains("<Warning>"));
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("mintlify/docs/plain.mdx"))?,
		"Plain.\n"
	);
	assert_eq!(
		std::fs::read_to_string(tmp.path().join("docs/setup/guide.md"))?,
		GUIDE
	);

	Ok(())
}

#[test]
fn convert_explicit_files_only() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), GUIDE)?;
	std::fs::write(tmp.path().join("b.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg(tmp.path().join("a.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Converted 1 file(s)"));

	assert!(std::fs::read_to_string(tmp.path().join("a.md"))?.contains("<Warning>"));
	assert_eq!(std::fs::read_to_string(tmp.path().join("b.md"))?, GUIDE);

	Ok(())
}

#[test]
fn relative_path_with_file_arguments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("docs"))?;
	std::fs::write(tmp.path().join("docs/a.md"), GUIDE)?;

	common::gb2mint_cmd()
		.current_dir(tmp.path())
		.arg("--path")
		.arg("docs")
		.arg("convert")
		.arg("docs/a.md")
		.arg("--out-dir")
		.arg("out")
		.assert()
		.success()
		.stdout(predicates::str::contains("Converted 1 file(s)"));

	let mirrored = std::fs::read_to_string(tmp.path().join("docs/out/a.md"))?;
	assert!(mirrored.contains("<Warning>Back up first.</Warning>"));
	assert_eq!(std::fs::read_to_string(tmp.path().join("docs/a.md"))?, GUIDE);

	Ok(())
}

#[test]
fn convert_rejects_non_markdown_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.txt"), "{% hint style=\"info\" %}x{% endhint %}")?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg(tmp.path().join("notes.txt"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("gb2mint::not_markdown"));

	Ok(())
}

#[test]
fn invalid_config_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("gb2mint.toml"), "stages = [\"sparkles\"]\n")?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("gb2mint::config_parse"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("guide.md"))?, GUIDE);

	Ok(())
}

#[test]
fn configured_stages_limit_conversion() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("gb2mint.toml"), "stages = [\"videos\"]\n")?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("unconverted directive `hint`"))
		.stderr(predicates::str::contains("unconverted directive `endhint`"));

	let guide = std::fs::read_to_string(tmp.path().join("guide.md"))?;
	assert!(guide.contains("<iframe"));
	assert!(guide.contains("{% hint style=\"warning\" %}"));

	Ok(())
}

#[test]
fn verbose_lists_written_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("  guide.md"))
		.stderr(predicates::str::contains("wrote converted file"));

	Ok(())
}

#[test]
fn quiet_by_default() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("guide.md"), GUIDE)?;

	common::gb2mint_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("wrote converted file").not());

	Ok(())
}
