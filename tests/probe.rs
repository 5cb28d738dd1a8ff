use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

mod common;
use common::{TestWorkspace, sample_table};

fn region_sql() -> Command {
    Command::cargo_bin("region-sql").expect("binary exists")
}

#[test]
fn probe_json_reports_detection_and_level_counts() {
    let ws = TestWorkspace::new();
    let input = ws.write("regions.tsv", &sample_table());

    let output = region_sql()
        .args(["probe", "-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).expect("parse probe JSON");
    assert_eq!(report["encoding"], "UTF-8");
    assert_eq!(report["delimiter"], "\\t");
    assert_eq!(report["code_column"], "법정동코드");
    assert_eq!(report["name_column"], "법정동명");
    assert_eq!(report["status_column"], "폐지일자");
    // Four active rows within the default depth; 청학리 is over-depth and
    // 부산광역시 is retired.
    assert_eq!(report["accepted"], 4);
    assert_eq!(report["skipped_retired"], 1);
    assert_eq!(report["skipped_depth_limit"], 1);
    assert_eq!(report["level_counts"]["1"], 2);
    assert_eq!(report["level_counts"]["2"], 1);
    assert_eq!(report["level_counts"]["3"], 1);
}

#[test]
fn probe_json_reports_euc_kr_detection() {
    let ws = TestWorkspace::new();
    let table = sample_table();
    let (encoded, _, _) = encoding_rs::EUC_KR.encode(&table);
    let input = ws.write_bytes("regions_euckr.tsv", &encoded);

    let output = region_sql()
        .args(["probe", "-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).expect("parse probe JSON");
    assert_eq!(report["encoding"], "EUC-KR");
    assert_eq!(report["accepted"], 4);
}

#[test]
fn probe_honors_an_explicit_encoding_override() {
    let ws = TestWorkspace::new();
    let input = ws.write("regions.tsv", &sample_table());

    let output = region_sql()
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "utf-8",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).expect("parse probe JSON");
    assert_eq!(report["encoding"], "UTF-8");
}

#[test]
fn probe_rejects_an_unknown_encoding_label() {
    let ws = TestWorkspace::new();
    let input = ws.write("regions.tsv", &sample_table());

    region_sql()
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "klingon-8",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding"));
}

#[test]
fn probe_fails_when_the_code_role_is_missing() {
    let ws = TestWorkspace::new();
    let input = ws.write("regions.tsv", "법정동명\t폐지일자\n서울특별시\t존재\n");

    region_sql()
        .args(["probe", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("'code'"));
}
