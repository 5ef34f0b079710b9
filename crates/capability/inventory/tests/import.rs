mod common;

use common::{admin, service};
use vss_inventory::{DEMO_CAMERA_COUNT, InventoryError};

const HEADER: &str = "name,model,ipAddress,location,macAddress,serialNumber,firmware,resolution,fps";

#[tokio::test]
async fn rows_are_imported_or_skipped_individually() {
    let (service, _stores) = service();
    let csv = format!(
        "{HEADER}\n\
         R1,X1,10.9.0.1,Dock,00:14:22:09:00:01,SN-R1,v1,1920x1080,30\n\
         R2,X1,10.9.0.2,Dock,,SN-R2,v1,1920x1080,30\n\
         R3,X1,10.9.0.1,Dock,00:14:22:09:00:03,SN-R3,v1,1920x1080,30\n\
         R4,X1,10.9.0.4,Dock,00:14:22:09:00:04,SN-R4,,,\n\
         R5,X1,10.9.0.5,Dock,00:14:22:09:00:05,SN-R5,v2,1280x720,15\n"
    );

    let report = service
        .import_cameras(csv.as_bytes(), &admin())
        .await
        .expect("import");

    assert_eq!(report.imported_count(), 3);
    assert_eq!(report.skipped_count(), 2);
    let names: Vec<&str> = report.cameras.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["R1", "R4", "R5"]);
    let lines: Vec<u64> = report.skipped.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert_eq!(report.cameras[1].fps, None);
    assert_eq!(report.cameras[2].fps, Some(15));
    assert_eq!(service.list_cameras().await.expect("list").len(), 3);
}

#[tokio::test]
async fn missing_required_column_fails_whole_file() {
    let (service, _stores) = service();
    let csv = "name,model,ipAddress,location,macAddress,serialNumber\n\
               R1,X1,10.9.0.1,Dock,00:14:22:09:00:01,SN-R1\n";
    let err = service
        .import_cameras(csv.as_bytes(), &admin())
        .await
        .expect_err("columns missing");
    assert!(matches!(err, InventoryError::InvalidFormat(_)));
    assert!(service.list_cameras().await.expect("list").is_empty());
}

#[tokio::test]
async fn nothing_imported_is_an_error() {
    let (service, _stores) = service();
    let csv = format!("{HEADER}\nR1,X1,10.9.0.1,Dock,,,v1,1920x1080,30\n");
    let err = service
        .import_cameras(csv.as_bytes(), &admin())
        .await
        .expect_err("empty import");
    assert!(matches!(err, InventoryError::EmptyImport));

    let err = service
        .import_cameras(HEADER.as_bytes(), &admin())
        .await
        .expect_err("header only");
    assert!(matches!(err, InventoryError::EmptyImport));
}

#[tokio::test]
async fn existing_ip_is_skipped() {
    let (service, _stores) = service();
    let first = format!("{HEADER}\nR1,X1,10.9.0.1,Dock,00:14:22:09:00:01,SN-R1,v1,1920x1080,30\n");
    service
        .import_cameras(first.as_bytes(), &admin())
        .await
        .expect("first import");

    let second = format!(
        "{HEADER}\n\
         again,X1,10.9.0.1,Dock,00:14:22:09:00:11,SN-R11,v1,1920x1080,30\n\
         fresh,X1,10.9.0.2,Dock,00:14:22:09:00:12,SN-R12,v1,1920x1080,30\n"
    );
    let report = service
        .import_cameras(second.as_bytes(), &admin())
        .await
        .expect("second import");
    assert_eq!(report.imported_count(), 1);
    assert!(report.skipped[0].reason.contains("10.9.0.1"));
}

#[tokio::test]
async fn undecodable_row_is_skipped_and_import_continues() {
    let (service, _stores) = service();
    let mut csv = format!(
        "{HEADER}\nR1,X1,10.9.0.1,Dock,00:14:22:09:00:01,SN-R1,v1,1920x1080,30\n"
    )
    .into_bytes();
    csv.extend_from_slice(b"C\xe1mara,X1,10.9.0.2,Dock,00:14:22:09:00:02,SN-R2,v1,1920x1080,30\n");
    csv.extend_from_slice(b"R3,X1,10.9.0.3,Dock,00:14:22:09:00:03,SN-R3,v1,1920x1080,30\n");

    let report = service
        .import_cameras(&csv, &admin())
        .await
        .expect("import");

    assert_eq!(report.imported_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].line, 3);
    let names: Vec<&str> = report.cameras.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["R1", "R3"]);
    assert_eq!(service.list_cameras().await.expect("list").len(), 2);
}

#[tokio::test]
async fn demo_seed_is_idempotent() {
    let (service, _stores) = service();
    let actor = admin();
    assert_eq!(
        service.seed_demo_cameras(&actor).await.expect("seed"),
        DEMO_CAMERA_COUNT
    );
    assert_eq!(service.seed_demo_cameras(&actor).await.expect("reseed"), 0);
    assert_eq!(
        service.list_cameras().await.expect("list").len(),
        DEMO_CAMERA_COUNT
    );
}
