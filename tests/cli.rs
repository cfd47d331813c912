//! Integration tests for the ps2rfp binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn run_ps2rfp(args: &[&str], stdin: &str, rules_dir: &Path) -> (String, String, i32) {
    // Tests must not depend on a user's ~/.config/ps2rfp/rules.toml.
    let rules = rules_dir.join("rules.toml");
    if !rules.exists() {
        std::fs::write(&rules, "").expect("Failed to write rules file");
    }
    let mut child = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .arg("--rules")
        .arg(&rules)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn write_price_sheet(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let cover = book.get_sheet_by_name_mut("Sheet1").unwrap();
    cover.set_name("COVER");
    cover.get_cell_mut("A1").set_value_string("Confidential");

    let ps = book.new_sheet("PS").unwrap();
    ps.get_cell_mut("B3").set_value_string("EGLINTON PJT");
    ps.get_cell_mut("G4").set_value_string("DDP TORONTO");
    ps.get_cell_mut("H4").set_value_number(1250);
    ps.get_cell_mut("J4").set_value_string("unit cost");
    ps.get_cell_mut("K8").set_value_string("margin");
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

#[test]
fn test_help() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_ps2rfp(&["--help"], "", dir.path());
    assert!(stderr.contains("Usage: ps2rfp"));
    assert_eq!(code, 0);
}

#[test]
fn test_missing_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("250826 PS-A.xlsx");
    let (stdout, _, code) = run_ps2rfp(&[missing.to_str().unwrap()], "", dir.path());
    assert!(stdout.contains("[ERROR] File not found"));
    assert_eq!(code, 1);
}

#[test]
fn test_wrong_extension_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("250826 PS-A.csv");
    std::fs::write(&csv, "a,b\n").unwrap();
    let (stdout, _, code) = run_ps2rfp(&[csv.to_str().unwrap()], "", dir.path());
    assert!(stdout.contains("[ERROR] Expected .xlsx or .xlsm file. Got: .csv"));
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_option_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_ps2rfp(&["--frobnicate"], "", dir.path());
    assert!(stderr.contains("Unknown option: --frobnicate"));
    assert_eq!(code, 1);
}

#[test]
fn test_converts_workbook_from_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("250826 PS-USA-2444 EGLINTON PJT-A.xlsx");
    write_price_sheet(&input);

    let pasted = format!("  \"{}\"\n", input.display());
    let (stdout, _, code) = run_ps2rfp(&[], &pasted, dir.path());
    assert_eq!(code, 0, "stdout: {}", stdout);
    assert!(stdout.starts_with("COPY AND PASTE EXCEL FILEPATH HERE: "));
    assert!(stdout.contains("[SUCCESS] Saved edited file to:"));

    let output = dir.path().join("250826 RFP-USA-2444 EGLINTON PJT-A.xlsx");
    assert!(stdout.trim_end().ends_with(output.to_str().unwrap()));

    let book = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
    assert!(book.get_sheet_by_name("COVER").is_none());
    let ps = book.get_sheet_by_name("PS").unwrap();
    assert_eq!(ps.get_value("G4"), "CIF TORONTO");
    assert_eq!(ps.get_value("H4"), "1250");
    assert!(ps.get_cell("J4").is_none());
    assert!(ps.get_cell("K8").is_none());

    let source = umya_spreadsheet::reader::xlsx::read(&input).unwrap();
    assert!(source.get_sheet_by_name("COVER").is_some());
}

#[test]
fn test_missing_ps_sheet_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("250826 PS-A.xlsx");
    let book = umya_spreadsheet::new_file();
    umya_spreadsheet::writer::xlsx::write(&book, &input).unwrap();

    let (stdout, _, code) = run_ps2rfp(&[input.to_str().unwrap()], "", dir.path());
    assert!(stdout.contains("[ERROR] 'PS' worksheet not found."));
    assert_eq!(code, 1);
    assert!(!dir.path().join("250826 RFP-A.xlsx").exists());
}
