//! Integration tests for document commands

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn docportal_cmd() -> Command {
    Command::cargo_bin("docportal").unwrap()
}

fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        kids.push(
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            })
            .into(),
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_save_document() {
    let input = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let pdf = input.path().join("Report.PDF");
    write_pdf(&pdf, &["Hello"]);

    let mut cmd = docportal_cmd();
    cmd.arg("save")
        .arg(&pdf)
        .arg("--data-dir")
        .arg(data.path())
        .arg("--session")
        .arg("session_cli");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("session_cli"))
        .stdout(predicate::str::contains("Report.PDF"));

    assert!(data.path().join("session_cli").join("Report.PDF").is_file());
}

#[test]
fn test_save_json_output() {
    let input = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let pdf = input.path().join("doc.pdf");
    write_pdf(&pdf, &["Hello"]);

    let output = docportal_cmd()
        .args(["--format", "json", "save"])
        .arg(&pdf)
        .arg("--data-dir")
        .arg(data.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let session_id = value["session_id"].as_str().unwrap();
    assert!(session_id.starts_with("session_"));
    assert!(value["path"].as_str().unwrap().ends_with("doc.pdf"));
}

#[test]
fn test_save_rejects_non_pdf() {
    let input = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let txt = input.path().join("notes.txt");
    fs::write(&txt, "plain text").unwrap();

    let mut cmd = docportal_cmd();
    cmd.arg("save").arg(&txt).arg("--data-dir").arg(data.path());

    cmd.assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Only PDF files are allowed"));
}

#[test]
fn test_save_missing_file() {
    let data = TempDir::new().unwrap();

    let mut cmd = docportal_cmd();
    cmd.arg("save")
        .arg(data.path().join("absent.pdf"))
        .arg("--data-dir")
        .arg(data.path());

    cmd.assert().failure().code(2);
}

#[test]
fn test_read_all_pages() {
    let input = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let pdf = input.path().join("three.pdf");
    write_pdf(&pdf, &["First", "Second", "Third"]);

    let mut cmd = docportal_cmd();
    cmd.arg("read").arg(&pdf).arg("--data-dir").arg(data.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--- Page 1 ---"))
        .stdout(predicate::str::contains("--- Page 2 ---"))
        .stdout(predicate::str::contains("--- Page 3 ---"))
        .stdout(predicate::str::contains("Third"));
}

#[test]
fn test_read_invalid_pdf() {
    let input = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let fake = input.path().join("fake.pdf");
    fs::write(&fake, "not really a pdf").unwrap();

    let mut cmd = docportal_cmd();
    cmd.arg("read").arg(&fake).arg("--data-dir").arg(data.path());

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not a valid PDF"));
}

#[test]
fn test_dotenv_configures_logging() {
    let cwd = TempDir::new().unwrap();
    let pdf = cwd.path().join("doc.pdf");
    write_pdf(&pdf, &["Hello"]);
    fs::write(cwd.path().join(".env"), "RUST_LOG=docportal_core=info\n").unwrap();

    let mut cmd = docportal_cmd();
    cmd.current_dir(cwd.path())
        .env_remove("RUST_LOG")
        .arg("save")
        .arg("doc.pdf")
        .arg("--data-dir")
        .arg(cwd.path().join("data"));

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("PDF saved successfully"));
}
