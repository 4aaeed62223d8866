//! CLI integration tests
//!
//! Exit code contract: 0 on success, non-zero when loading, layout, or
//! rendering fails.

use std::io::Write;
use std::process::Command;

const VALID_SCHEDULE: &str = "\
Task,Description,Plan-Start,Plan-End,Actual-Start,Actual-End,Predecessor
1.0,Site survey,01.07.2024,05.07.2024,01.07.2024,06.07.2024,
2.0,Foundations,08.07.2024,19.07.2024,,,1.0
3.0,Framing,22.07.2024,02.08.2024,,,2.0
";

const DANGLING_SCHEDULE: &str = "\
Task,Description,Plan-Start,Plan-End,Actual-Start,Actual-End,Predecessor
1.0,Survey,01.07.2024,05.07.2024,,,ghost
";

fn write_schedule(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn ganttplot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ganttplot"))
}

#[test]
fn check_accepts_a_valid_schedule() {
    let file = write_schedule(VALID_SCHEDULE);
    let output = ganttplot().arg("check").arg(file.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("tasks:        3"));
    assert!(stdout.contains("dependencies: 2"));
}

#[test]
fn check_rejects_a_dangling_predecessor() {
    let file = write_schedule(DANGLING_SCHEDULE);
    let output = ganttplot().arg("check").arg(file.path()).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ghost"));
}

#[test]
fn render_writes_an_svg_file() {
    let file = write_schedule(VALID_SCHEDULE);
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("chart.svg");

    let output = ganttplot()
        .arg("render")
        .arg(file.path())
        .arg("--output")
        .arg(&out_path)
        .arg("--title")
        .arg("Project A")
        .output()
        .unwrap();
    assert!(output.status.success());

    let svg = std::fs::read_to_string(&out_path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Project A"));
}

#[test]
fn render_json_is_a_primitive_list() {
    let file = write_schedule(VALID_SCHEDULE);
    let output = ganttplot()
        .arg("render")
        .arg(file.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let primitives: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(primitives.as_array().unwrap().len() > 5);
}

#[test]
fn render_rejects_unknown_formats() {
    let file = write_schedule(VALID_SCHEDULE);
    let output = ganttplot()
        .arg("render")
        .arg(file.path())
        .arg("--format")
        .arg("png")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn missing_file_fails_cleanly() {
    let output = ganttplot()
        .arg("check")
        .arg("/no/such/schedule.csv")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
