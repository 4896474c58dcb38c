//! End-to-end tests driving the built binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BUILD: &str = r#"[build-system]
requires = [
    "hatchling",
]
build-backend = "hatchling.build"

"#;

fn validate() -> Command {
    let mut cmd = Command::cargo_bin("pyproject-validate").expect("pyproject-validate binary");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn project_dir(body: &str) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(td.path().join("pyproject.toml"), format!("{BUILD}{body}")).unwrap();
    td
}

fn read(dir: &Path) -> String {
    fs::read_to_string(dir.join("pyproject.toml")).unwrap()
}

fn string_list(doc: &toml::Table, key: &str) -> Vec<String> {
    doc["project"][key]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_valid_manifest_is_silent() {
    let td = project_dir("[project]\nname = \"foo\"\nversion = \"0.0.1\"\n");
    validate()
        .current_dir(td.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_manifest() {
    let td = tempfile::tempdir().unwrap();
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout("could not locate a `pyproject.toml` file\n");
}

#[test]
fn test_parent_directory_is_searched() {
    let td = project_dir("[project]\nname = \"foo\"\nversion = \"0.0.1\"\n");
    let sub = td.path().join("foo");
    fs::create_dir_all(&sub).unwrap();
    validate().current_dir(&sub).assert().success();
}

#[test]
fn test_explicit_config_path() {
    let td = tempfile::tempdir().unwrap();
    let sub = td.path().join("foo");
    fs::create_dir_all(&sub).unwrap();
    let path = sub.join("pyproject.toml");
    fs::write(
        &path,
        format!("{BUILD}[project]\nname = \"foo\"\nversion = \"0.0.1\"\n"),
    )
    .unwrap();
    validate()
        .current_dir(td.path())
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_toml_is_single_line_error() {
    let td = tempfile::tempdir().unwrap();
    fs::write(td.path().join("pyproject.toml"), "[project\nname = 1\n").unwrap();
    let out = validate().current_dir(td.path()).assert().code(1);
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("invalid TOML at line "));
}

#[test]
fn test_missing_version_is_unfixable() {
    let body = "[project]\nname = \"foo\"\n";
    let td = project_dir(body);
    let expected = "<<< specs >>>\nerror: project: missing field(s): version\n";
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout(expected);

    let before = read(td.path());
    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(expected);
    assert_eq!(read(td.path()), before);
}

#[test]
fn test_schema_error_stops_other_validators() {
    let td = project_dir("[project]\nname = \"Foo.bAr\"\nversion = 1\ndependencies = [\"b\", \"a\"]\n");
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout("<<< specs >>>\nerror: project -> version: string expected\n");
}

#[test]
fn test_name_invalid_characters() {
    let td = project_dir("[project]\nname = \"foo bar\"\nversion = \"0.0.1\"\n");
    let expected = "<<< naming >>>\nerror: must only contain ASCII letters/digits, underscores, hyphens, and periods\n";
    validate().current_dir(td.path()).assert().code(1).stdout(expected);
    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(expected);
}

#[test]
fn test_name_normalization_fix() {
    let td = project_dir("[project]\nname = \"Foo.bAr\"\nversion = \"0.0.1\"\n");
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout("<<< naming >>>\nerror: should be foo-bar\n");

    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let doc: toml::Table = toml::from_str(&read(td.path())).unwrap();
    assert_eq!(doc["project"]["name"].as_str(), Some("foo-bar"));
    assert_eq!(doc["project"]["version"].as_str(), Some("0.0.1"));

    validate()
        .current_dir(td.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_unparseable_dependency() {
    let body = "[project]\nname = \"foo\"\nversion = \"0.0.1\"\ndependencies = [\"foo\", \"\"]\n";
    let td = project_dir(body);
    let before = read(td.path());
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout(
            "<<< dependencies >>>\nerror: dependencies #2: expected package name at column 1, found end of input\n",
        );
    assert_eq!(read(td.path()), before);
}

#[test]
fn test_unparseable_optional_dependency_cannot_fix() {
    let td = project_dir(
        "[project]\nname = \"foo\"\nversion = \"0.0.1\"\n\n[project.optional-dependencies]\nfoo = [\"foo\", \"bar^0.1\"]\n",
    );
    let before = read(td.path());
    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "<<< dependencies >>>\nerror: optional `foo` dependencies #2: expected",
        ));
    assert_eq!(read(td.path()), before);
}

#[test]
fn test_unsorted_dependencies_fix() {
    let td = project_dir("[project]\nname = \"foo\"\nversion = \"0.0.1\"\ndependencies = [\"foo\", \"bar\"]\n");
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout("<<< dependencies >>>\nerror: dependencies are not sorted\n");

    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let doc: toml::Table = toml::from_str(&read(td.path())).unwrap();
    assert_eq!(string_list(&doc, "dependencies"), vec!["bar", "foo"]);
}

#[test]
fn test_dependency_normalization_fix_is_idempotent() {
    let td = project_dir(
        "[project]\nname = \"foo\"\nversion = \"0.0.1\"\ndependencies = [\n    \"python-dateutil\",\n    \"bAr.Baz[TLS]   >=1.2RC5\",\n    'Foo;python_version<\"3.8\"',\n]\n",
    );
    validate()
        .current_dir(td.path())
        .assert()
        .code(1)
        .stdout(
            "<<< dependencies >>>\nerror: dependencies #2 should be: bar-baz[tls]>=1.2rc5\nerror: dependencies #3 should be: foo; python_version < '3.8'\n",
        );

    validate().current_dir(td.path()).arg("--fix").assert().success();
    let doc: toml::Table = toml::from_str(&read(td.path())).unwrap();
    assert_eq!(
        string_list(&doc, "dependencies"),
        vec![
            "bar-baz[tls]>=1.2rc5",
            "foo; python_version < '3.8'",
            "python-dateutil",
        ]
    );

    validate()
        .current_dir(td.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_unfixable_error_blocks_all_fixes() {
    let body = "[project]\nname = \"Foo.bAr\"\nversion = \"0.0.1\"\ndependencies = [\"foo\", \"\"]\n";
    let td = project_dir(body);
    let before = read(td.path());
    validate()
        .current_dir(td.path())
        .arg("--fix")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("<<< dependencies >>>\n"))
        .stdout(predicate::str::contains("naming").not());
    assert_eq!(read(td.path()), before);
}

#[test]
fn test_json_output() {
    let td = project_dir("[project]\nname = \"Foo.bAr\"\nversion = \"0.0.1\"\n");
    let out = validate()
        .current_dir(td.path())
        .args(["--output", "json"])
        .assert()
        .code(1);
    let v: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(v["validators"][0]["name"], "naming");
    assert_eq!(v["validators"][0]["errors"][0], "should be foo-bar");
    assert_eq!(v["summary"]["exit_code"], 1);
}

#[test]
fn test_tool_table_enables_fix() {
    let td = project_dir(
        "[project]\nname = \"Foo\"\nversion = \"0.0.1\"\n\n[tool.pyproject-validate]\nfix = true\n",
    );
    validate()
        .current_dir(td.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let doc: toml::Table = toml::from_str(&read(td.path())).unwrap();
    assert_eq!(doc["project"]["name"].as_str(), Some("foo"));
    assert_eq!(doc["tool"]["pyproject-validate"]["fix"].as_bool(), Some(true));
}

#[test]
fn test_version_flag() {
    validate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
