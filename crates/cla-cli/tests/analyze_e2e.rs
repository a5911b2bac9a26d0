//! End-to-end integration tests for the analyze command.
//!
//! Runs the built binary against real ADIF files on disk and checks the
//! rendered report and JSON output.

use std::process::Command;

use tempfile::TempDir;

fn cla_binary() -> String {
    env!("CARGO_BIN_EXE_cla").to_string()
}

const LOG: &str = "\
<ADIF_VER:5>3.1.4<PROGRAMID:5>N3FJP<eoh>
<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:4>1800<FREQ:6>14.025<BAND:3>20M<MODE:2>CW<OPERATOR:4>K9CT<N3FJP_COMPUTERNAME:5>ALPHA<eor>
<CALL:4>N1XX<QSO_DATE:8>20250628<TIME_ON:4>1803<FREQ:6>14.025<BAND:3>20M<MODE:2>CW<OPERATOR:4>K9CT<N3FJP_COMPUTERNAME:5>ALPHA<eor>
<CALL:5>K5ZZZ<QSO_DATE:8>20250628<TIME_ON:4>1806<FREQ:6>14.025<BAND:3>20M<MODE:2>CW<OPERATOR:4>K9CT<N3FJP_COMPUTERNAME:5>ALPHA<eor>
<CALL:4>W9RE<QSO_DATE:8>20250628<TIME_ON:4>1930<FREQ:5>7.200<BAND:3>40M<MODE:3>SSB<OPERATOR:4>N4OG<N3FJP_COMPUTERNAME:5>BRAVO<eor>
";

fn write_log(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("contest.adi");
    std::fs::write(&path, LOG).unwrap();
    path
}

#[test]
fn test_analyze_text_report() {
    let temp = TempDir::new().unwrap();
    let log = write_log(&temp);

    let output = Command::new(cla_binary())
        .arg("analyze")
        .arg(&log)
        .output()
        .expect("failed to run cla analyze");
    assert!(
        output.status.success(),
        "cla analyze should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CONTEST LOG ANALYSIS"));
    assert!(stdout.contains("Total QSOs: 4"));
    assert!(stdout.contains("Operator: K9CT"));
    assert!(stdout.contains("Operator: N4OG"));
    assert!(stdout.contains("OPERATOR SESSIONS:"));
    // 84 minutes of silence between 18:06 and 19:30.
    assert!(stdout.contains("Gap 1: 84 minutes"));
}

#[test]
fn test_analyze_json_output() {
    let temp = TempDir::new().unwrap();
    let log = write_log(&temp);

    let output = Command::new(cla_binary())
        .arg("analyze")
        .arg(&log)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(value["total_qsos"], 4);
    assert_eq!(value["operators"].as_array().unwrap().len(), 2);
    assert_eq!(value["gaps"].as_array().unwrap().len(), 1);
}

#[test]
fn test_analyze_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let log = write_log(&temp);
    let report_path = temp.path().join("report.txt");

    let output = Command::new(cla_binary())
        .arg("analyze")
        .arg(&log)
        .arg("--output")
        .arg(&report_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("CONTEST LOG ANALYSIS"));
}

#[test]
fn test_analyze_session_gap_override() {
    let temp = TempDir::new().unwrap();
    let log = write_log(&temp);

    // With a 2-minute threshold every 3-minute step breaks the session.
    let output = Command::new(cla_binary())
        .arg("analyze")
        .arg(&log)
        .arg("--session-gap")
        .arg("2")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MULTI-STATION OPERATION DETECTED:"));
}

#[test]
fn test_analyze_missing_file_fails() {
    let output = Command::new(cla_binary())
        .arg("analyze")
        .arg("/nonexistent/contest.adi")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_no_subcommand_prints_help() {
    let output = Command::new(cla_binary()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
}
