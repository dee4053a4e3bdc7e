use std::fs;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

const SCAN_TEXT: &str =
    "Nom: Dupont\nPrénom: Marie\nRef: AB-1234\nDate: 12/05/2023\nEmail: marie.dupont@example.fr\n";

fn docfields() -> Command {
    Command::cargo_bin("docfields").unwrap()
}

fn write_scan(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

/// One-page PDF whose content selects font `/F1` without declaring it.
fn pdf_without_fonts(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let resources_id = doc.add_object(dictionary! {});
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let kids: Vec<Object> = vec![page_id.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[test]
fn extract_text_file_to_json() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);

    let output = docfields()
        .arg("extract")
        .arg(&input)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(record["source_filename"], "scan.txt");
    assert_eq!(record["validation_status"], "validated");
    assert_eq!(record["fields"]["last_name"], "Dupont");
    assert_eq!(record["fields"]["reference_number"], "AB-1234");
    assert!(record["fields"]["phone"].is_null());
}

#[test]
fn extract_applies_corrections() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);

    docfields()
        .arg("extract")
        .arg(&input)
        .args(["--format", "csv", "--set", "last_name=Durand", "--set", "email="])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "reference_number,last_name,first_name,date,amount,tax_id,address,phone,email",
        ))
        .stdout(predicate::str::contains("AB-1234,Durand,Marie,12/05/2023"))
        .stdout(predicate::str::contains("marie.dupont").not());
}

#[test]
fn extract_reports_confidence() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);

    docfields()
        .arg("extract")
        .arg(&input)
        .arg("--show-confidence")
        .assert()
        .success()
        .stderr(predicate::str::contains("60% (5/9 champs)"));
}

#[test]
fn extract_empty_text_yields_absent_fields() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "blank.txt", "");

    docfields()
        .arg("extract")
        .arg(&input)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nom: Non trouvé"))
        .stdout(predicate::str::contains("Completeness: 0% (0/9 champs)"));
}

#[test]
fn extract_writes_into_output_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    docfields()
        .arg("extract")
        .arg(&input)
        .arg("--output")
        .arg(&out_dir)
        .args(["--format", "json"])
        .assert()
        .success();

    let written: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("extraction_"));
    assert!(written[0].ends_with(".json"));
}

#[test]
fn extract_rejects_unknown_field_correction() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);

    docfields()
        .arg("extract")
        .arg(&input)
        .args(["--set", "surname=Durand"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field: surname"));
}

#[test]
fn extract_rejects_raster_image() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.png", "not really a png");

    docfields()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Run OCR on it first"));
}

#[test]
fn extract_unreadable_pdf_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "broken.pdf", "%PDF-1.4 garbage");

    let output = docfields()
        .arg("extract")
        .arg(&input)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let fields = record["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 9);
    assert!(fields.values().all(|v| v.is_null()));
}

#[test]
fn extract_pdf_with_undeclared_font_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nofont.pdf");
    fs::write(&input, pdf_without_fonts("Ref: AAA")).unwrap();

    let output = docfields()
        .arg("extract")
        .arg(&input)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(record["source_filename"], "nofont.pdf");
    assert!(record["fields"]["reference_number"].is_null());
}

#[test]
fn extract_missing_input_fails() {
    docfields()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_records_and_summary() {
    let dir = TempDir::new().unwrap();
    write_scan(&dir, "one.txt", SCAN_TEXT);
    write_scan(&dir, "two.txt", "Ref: AAA\nRef: BBB\n");
    write_scan(&dir, "three.png", "raster");
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*", dir.path().display());

    docfields()
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--format", "json", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping"))
        .stdout(predicate::str::contains("Processed 2/2 files"))
        .stdout(predicate::str::contains("Skipped 1 raster images"));

    let two: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("two.json")).unwrap()).unwrap();
    assert_eq!(two["fields"]["reference_number"], "AAA");
    assert!(out_dir.join("one.json").exists());
    assert!(!out_dir.join("three.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("60,5"));
}

#[test]
fn batch_records_failures_when_continuing() {
    let dir = TempDir::new().unwrap();
    write_scan(&dir, "one.txt", SCAN_TEXT);
    write_scan(&dir, "two.txt", "Ref: AAA\n");
    fs::write(dir.path().join("broken.pdf"), pdf_without_fonts("Ref: ZZZ")).unwrap();
    let out_dir = dir.path().join("out");
    // A directory where the record file should go makes the write fail.
    fs::create_dir_all(out_dir.join("one.json")).unwrap();
    let pattern = format!("{}/*", dir.path().display());

    docfields()
        .arg("batch")
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--format", "json", "--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2/3 files"))
        .stdout(predicate::str::contains("failed to write"));

    assert!(out_dir.join("two.json").exists());
    let broken: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("broken.json")).unwrap()).unwrap();
    assert!(broken["fields"]["reference_number"].is_null());
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("scan.txt"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let pattern = format!("{}/*", dir.path().display());

    docfields()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_with_only_raster_images_fails() {
    let dir = TempDir::new().unwrap();
    write_scan(&dir, "scan.png", "raster");
    let pattern = format!("{}/*", dir.path().display());

    docfields()
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No processable files"));
}

#[test]
fn config_file_drives_output_format() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(&dir, "scan.txt", SCAN_TEXT);
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"export": {"format": "csv"}}"#).unwrap();

    docfields()
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("reference_number,"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    docfields()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    docfields()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
