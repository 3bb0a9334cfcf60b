//! Integration tests for the `leandoc` binary: the CLI boundary's exit-code
//! contract (0 success, 1 parse/generator error, 2 usage/I/O error) and its
//! two modes, `--ast` and `--typst`.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn leandoc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_leandoc"))
}

fn write_input(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create scratch input file");
    f.write_all(content.as_bytes()).unwrap();
    f
}

#[test]
fn ast_dump_succeeds_and_prints_tree() {
    let input = write_input("== Heading\nBody.\n");
    let out = leandoc()
        .args(["--ast", input.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Section \"Heading\""));
}

#[test]
fn ast_dump_json_format_is_valid_json() {
    let input = write_input("NOTE: careful\n");
    let out = leandoc()
        .args(["--ast", input.path().to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["children"][0]["name"], "NOTE");
}

#[test]
fn typst_mode_writes_output_file() {
    let input = write_input("== Title\nSome body text.\n");
    let output = NamedTempFile::new().unwrap();
    let status = leandoc()
        .args([
            "--typst",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(status.success());
    let written = std::fs::read_to_string(output.path()).unwrap();
    assert!(written.contains("= Title"));
}

#[test]
fn typst_mode_respects_template_flag() {
    let input = write_input("Body.\n");
    let output = NamedTempFile::new().unwrap();
    let status = leandoc()
        .args([
            "--typst",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
            "--template",
            "report",
        ])
        .status()
        .unwrap();
    assert!(status.success());
    let written = std::fs::read_to_string(output.path()).unwrap();
    assert!(written.contains("\"1.1.\""));
}

#[test]
fn malformed_document_exits_with_code_one() {
    let input = write_input("[[orphan]]\n");
    let output = NamedTempFile::new().unwrap();
    let status = leandoc()
        .args([
            "--typst",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn unrepresentable_construct_exits_with_code_one() {
    let input = write_input("include::chapter.adoc[]\n");
    let output = NamedTempFile::new().unwrap();
    let status = leandoc()
        .args([
            "--typst",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn typst_without_output_flag_is_a_usage_error() {
    let input = write_input("Body.\n");
    let status = leandoc()
        .args(["--typst", input.path().to_str().unwrap()])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let status = leandoc()
        .args(["--ast", "/nonexistent/path/does-not-exist.adoc"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn no_mode_flag_is_a_usage_error() {
    let status = leandoc().status().unwrap();
    assert_eq!(status.code(), Some(2));
}
