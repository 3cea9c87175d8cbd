mod common;

use climalog_core::archive::{extract_archive, extract_archive_to, ExtractOutcome};
use common::{write_logger_export, zip_files, Workspace};

#[test]
fn archive_members_land_in_raw_dir() {
    let ws = Workspace::new();
    let a = ws.staging("AC1.xlsx");
    let b = ws.staging("AC2.xlsx");
    write_logger_export(&a, &[("2024-01-05 08:00:00", 1.0)]);
    write_logger_export(&b, &[("2024-01-05 08:00:00", 0.0)]);
    zip_files(&ws.raw("Aires Acondicionados.zip"), &[a, b]);

    let outcome = extract_archive(&ws.config, "Aires Acondicionados.zip");
    assert_eq!(
        outcome,
        ExtractOutcome::Extracted {
            archive: "Aires Acondicionados.zip".to_string(),
            entries: 2,
        }
    );
    assert!(ws.raw("AC1.xlsx").is_file());
    assert!(ws.raw("AC2.xlsx").is_file());
}

#[test]
fn missing_archive_is_reported_not_raised() {
    let ws = Workspace::new();
    let outcome = extract_archive(&ws.config, "Energia.zip");
    assert_eq!(
        outcome,
        ExtractOutcome::Missing {
            path: ws.raw("Energia.zip"),
        }
    );
    assert!(!outcome.is_extracted());
}

#[test]
fn corrupt_archive_reports_the_cause() {
    let ws = Workspace::new();
    std::fs::write(ws.raw("Energia.zip"), b"this is not a zip file").expect("write");

    match extract_archive(&ws.config, "Energia.zip") {
        ExtractOutcome::Failed { archive, reason } => {
            assert_eq!(archive, "Energia.zip");
            assert!(!reason.is_empty());
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn explicit_destination_is_created() {
    let ws = Workspace::new();
    let member = ws.staging("Temp Ext.xlsx");
    write_logger_export(&member, &[("2024-01-05 08:00:00", 21.0)]);
    zip_files(&ws.raw("Energia.zip"), &[member]);

    let destination = ws.root.path().join("unpacked/energy");
    let outcome = extract_archive_to(&ws.config.raw_dir, "Energia.zip", &destination);
    assert!(outcome.is_extracted());
    assert!(destination.join("Temp Ext.xlsx").is_file());
}
