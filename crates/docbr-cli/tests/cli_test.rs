use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CPF_CARD: &str = r#"[[["CPF", 0.9], ["123.456.789-09", 0.88]]]"#;

const IDENTITY_CARD: &str = r#"[
    [{"text": "REGISTRO GERAL", "confidence": 0.95}, {"text": "12.345.678-9", "confidence": 0.9}],
    [{"text": "NOME", "confidence": 0.96}],
    [{"text": "MARIA OLIVEIRA COSTA", "confidence": 0.93}],
    [{"text": "DATA DE NASCIMENTO", "confidence": 0.9}, {"text": "15/05/1985", "confidence": 0.89}]
]"#;

const PADDLE_PAGE: &str = r#"[[
    [[[10, 10], [90, 10], [90, 30], [10, 30]], ["CARTEIRA NACIONAL DE HABILITAÇÃO", 0.97]],
    [[[10, 40], [190, 40], [190, 60], [10, 60]], ["CNH 98765432109", 0.91]]
]]"#;

/// Workspace with an isolated config file, so a user config never leaks in.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("docbr").unwrap();
        cmd.arg("--config").arg(self.path("config.json"));
        cmd
    }
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn process_lines_file() {
    let ws = Workspace::new();
    let input = ws.write("cpf.json", CPF_CARD);

    let output = ws.cmd().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["document_type"], "cpf");
    assert_eq!(record["cpf_number"], "123.456.789-09");
    assert_eq!(record["is_valid"], true);
    assert!(record["cnh_category"].is_null());
    assert_eq!(record["validation_errors"], serde_json::json!([]));
}

#[test]
fn process_identity_card() {
    let ws = Workspace::new();
    let input = ws.write("rg.json", IDENTITY_CARD);

    let output = ws.cmd().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["document_type"], "rg");
    assert_eq!(record["rg_number"], "123456789");
    assert_eq!(record["name"], "Maria Oliveira Costa");
    assert_eq!(record["birth_date"], "15/05/1985");
}

#[test]
fn process_paddle_output() {
    let ws = Workspace::new();
    let input = ws.write("cnh.json", PADDLE_PAGE);

    let output = ws
        .cmd()
        .args(["process", "--input-format", "paddle"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["document_type"], "cnh");
    assert_eq!(record["cnh_number"], "98765432109");
}

#[test]
fn process_text_from_stdin() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["process", "-", "--input-format", "text"])
        .write_stdin("NOME\nPEDRO SANTOS LIMA\nCPF 529.982.247-25\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["name"], "Pedro Santos Lima");
    assert_eq!(record["cpf_number"], "529.982.247-25");
    assert_eq!(record["confidence"], 1.0);
}

#[test]
fn process_document_type_override() {
    let ws = Workspace::new();
    let input = ws.write("cpf.json", CPF_CARD);

    let output = ws
        .cmd()
        .args(["process", "--document-type", "rg"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["document_type"], "rg");
    assert_eq!(record["cpf_number"], "123.456.789-09");
}

#[test]
fn process_csv_output_to_file() {
    let ws = Workspace::new();
    let input = ws.write("cpf.json", CPF_CARD);
    let out = ws.path("record.csv");

    ws.cmd()
        .args(["process", "-f", "csv", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("document_type,name,birth_date,rg_number,cpf_number"));
    assert!(csv.contains("123.456.789-09"));
}

#[test]
fn process_empty_input_fails() {
    let ws = Workspace::new();
    let input = ws.write("empty.json", "[]");

    ws.cmd()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text found in OCR input"));
}

#[test]
fn process_empty_input_allowed_by_config() {
    let ws = Workspace::new();
    ws.write("config.json", r#"{"input": {"reject_empty": false}}"#);
    let input = ws.write("empty.json", "[[]]");

    let output = ws.cmd().arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["document_type"], "unknown");
    assert_eq!(record["confidence"], 0.0);
    assert_eq!(record["is_valid"], false);
}

#[test]
fn process_rejects_invalid_confidence() {
    let ws = Workspace::new();
    let input = ws.write("bad.json", r#"[[["CPF", 1.5]]]"#);

    ws.cmd()
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn process_missing_file() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("process")
        .arg(ws.path("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn validate_valid_cpf() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["validate", "cpf", "52998224725"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome = stdout_json(&output);
    assert_eq!(outcome["is_valid"], true);
    assert_eq!(outcome["formatted"], "529.982.247-25");
}

#[test]
fn validate_invalid_cnpj_exits_non_zero() {
    let ws = Workspace::new();

    let output = ws
        .cmd()
        .args(["validate", "cnpj", "11.222.333/0001-80"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let outcome = stdout_json(&output);
    assert_eq!(outcome["cleaned"], "11222333000180");
    assert!(outcome["formatted"].is_null());
}

#[test]
fn validate_unknown_kind() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["validate", "passport", "123"])
        .assert()
        .failure();
}

#[test]
fn batch_writes_outputs_and_summary() {
    let ws = Workspace::new();
    ws.write("in/a.json", CPF_CARD);
    ws.write("in/b.json", IDENTITY_CARD);
    let out_dir = ws.path("out");

    ws.cmd()
        .arg("batch")
        .arg(format!("{}/in/*.json", ws.dir.path().display()))
        .arg("-o")
        .arg(&out_dir)
        .args(["--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let a: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("a.json")).unwrap()).unwrap();
    assert_eq!(a["cpf_number"], "123.456.789-09");

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("filename,status,document_type,document_number"));
    assert!(rows[1].starts_with("a.json,success,cpf,123.456.789-09"));
    assert!(rows[2].starts_with("b.json,success,rg,123456789"));
}

#[test]
fn batch_stops_on_error() {
    let ws = Workspace::new();
    ws.write("in/a.json", CPF_CARD);
    ws.write("in/b.json", "not json");

    ws.cmd()
        .arg("batch")
        .arg(format!("{}/in/*.json", ws.dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_continue_on_error() {
    let ws = Workspace::new();
    ws.write("in/a.json", CPF_CARD);
    ws.write("in/b.json", "not json");
    let out_dir = ws.path("out");

    ws.cmd()
        .arg("batch")
        .arg(format!("{}/in/*.json", ws.dir.path().display()))
        .arg("-o")
        .arg(&out_dir)
        .args(["--continue-on-error", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out_dir.join("a.json").exists());
    assert!(!out_dir.join("b.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("b.json,error"));
}

#[test]
fn config_init_and_get() {
    let ws = Workspace::new();
    let config = ws.path("nested/config.json");

    Command::cargo_bin("docbr")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    Command::cargo_bin("docbr")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "batch.jobs", "8"])
        .assert()
        .success();

    Command::cargo_bin("docbr")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "batch.jobs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("8\n"));
}
