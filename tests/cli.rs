use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

fn reference_csv() -> &'static str {
    "\
Location,Location Code,Department,Department Code
Riverside,110,Leisure Ops,501
Hill Street,120,Catering,620
"
}

#[test]
fn run_hourly_journal_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("extract.csv");
    let reference = dir.path().join("cost_centres.csv");
    let output = dir.path().join("journal.csv");

    write(
        &input,
        "\
Hours Worked ,Rate of Pay Per Hour,Memo,Account,Location,Department,Description,Entry Type
10,12.50,Bar staff,4100,Riverside,Catering,P03 2025,Debit
8,11.00,Kitchen,4100,Hill Street,Catering,,Debit
17.04,12.50,Net Wages,2200,Riverside,Leisure Ops,,Credit
",
    );
    write(&reference, reference_csv());

    Command::cargo_bin("payrun")
        .unwrap()
        .args([
            "run",
            "hourly",
            "--input",
            input.to_str().unwrap(),
            "--month",
            "June",
            "--year",
            "2025",
            "--cost-centres",
            reference.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("journal balanced"));

    let content = std::fs::read_to_string(&output).unwrap();
    let header = content.lines().next().unwrap();
    assert!(header.starts_with("DONOTIMPORT,LINE_NO,DOCUMENT,JOURNAL"));
    // Description fill-down reaches the lines that arrived without one.
    assert_eq!(content.matches("P03 2025").count(), 3);
}

#[test]
fn check_reports_balance_of_written_journal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("extract.csv");
    let reference = dir.path().join("cost_centres.csv");
    let output = dir.path().join("journal.csv");

    write(
        &input,
        "\
Hours Worked,Rate of Pay Per Hour,Memo,Account,Location,Department,Description,Entry Type
4,25.00,Bar staff,4100,Riverside,Catering,P03 2025,Debit
4,25.00,Net Wages,2200,Riverside,Leisure Ops,,Credit
",
    );
    write(&reference, reference_csv());

    Command::cargo_bin("payrun")
        .unwrap()
        .args([
            "run",
            "hourly",
            "--input",
            input.to_str().unwrap(),
            "--month",
            "June",
            "--year",
            "2025",
            "--cost-centres",
            reference.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("payrun")
        .unwrap()
        .args(["check", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("balanced"));
}

#[test]
fn unsupported_journal_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("extract.csv");
    write(&input, "A,B\n1,2\n");

    Command::cargo_bin("payrun")
        .unwrap()
        .args([
            "run",
            "bonusRun",
            "--input",
            input.to_str().unwrap(),
            "--month",
            "June",
            "--year",
            "2025",
            "--output",
            dir.path().join("out.csv").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported journal type: bonusRun"));
}

#[test]
fn types_lists_every_journal_kind() {
    Command::cargo_bin("payrun")
        .unwrap()
        .arg("types")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("hourlyAccrual")
                .and(predicate::str::contains("apLevy"))
                .and(predicate::str::contains("crossCharge")),
        );
}
