use domain::Role;
use vss_storage::{
    CameraRecord, CameraStore, DEFAULT_ADMIN_EMAIL, InMemoryCameraStore, InMemoryNvrStore,
    InMemoryProjectStore, InMemoryUserStore, NvrRecord, NvrStore, ProjectRecord, ProjectStore,
    UserRecord, UserStore,
};

fn camera(id: &str, mac: &str, serial: &str) -> CameraRecord {
    CameraRecord {
        camera_id: id.to_string(),
        name: format!("Camera {id}"),
        model: "IPC-1".to_string(),
        ip_address: format!("10.0.0.{}", id.len()),
        location: "Lobby".to_string(),
        mac_address: mac.to_string(),
        serial_number: serial.to_string(),
        username: None,
        password: None,
        firmware: None,
        resolution: None,
        fps: None,
        current_nvr: None,
        current_project: None,
        assigned_date_ms: None,
        reassignment_history: Vec::new(),
        change_log: Vec::new(),
        created_by: None,
        updated_by: None,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

fn nvr(id: &str, ip: &str, mac: &str) -> NvrRecord {
    NvrRecord {
        nvr_id: id.to_string(),
        name: format!("NVR {id}"),
        ip_address: ip.to_string(),
        mac_address: mac.to_string(),
        ip_address_secondary: None,
        mac_address_secondary: None,
        model: "NVR-16".to_string(),
        max_channels: 16,
        capacity: 4000,
        location: "Rack".to_string(),
        branch: "North".to_string(),
        platform: None,
        username: None,
        password: None,
        cameras: Vec::new(),
        project: None,
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

#[tokio::test]
async fn find_default_admin() {
    let store = InMemoryUserStore::with_default_admin();
    let user = store
        .find_by_email("ADMIN@example.com")
        .await
        .expect("query")
        .expect("admin");
    assert_eq!(user.email, DEFAULT_ADMIN_EMAIL);
    assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn user_email_is_unique() {
    let store = InMemoryUserStore::with_default_admin();
    let err = store
        .create_user(UserRecord {
            user_id: "user-2".to_string(),
            name: "Other".to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password: "secret1".to_string(),
            role: Role::Junior,
            created_at_ms: 1,
        })
        .await
        .expect_err("duplicate");
    assert_eq!(err.duplicate_field(), Some("email"));
}

#[tokio::test]
async fn camera_mac_and_serial_are_unique() {
    let store = InMemoryCameraStore::new();
    store
        .create_camera(camera("a", "00:14:22:01:23:01", "SN1"))
        .await
        .expect("create");

    let err = store
        .create_camera(camera("b", "00:14:22:01:23:01", "SN2"))
        .await
        .expect_err("mac taken");
    assert_eq!(err.duplicate_field(), Some("macAddress"));

    let err = store
        .create_camera(camera("c", "00:14:22:01:23:03", "SN1"))
        .await
        .expect_err("serial taken");
    assert_eq!(err.duplicate_field(), Some("serialNumber"));
}

#[tokio::test]
async fn camera_replace_excludes_itself_from_uniqueness() {
    let store = InMemoryCameraStore::new();
    let mut record = store
        .create_camera(camera("a", "00:14:22:01:23:01", "SN1"))
        .await
        .expect("create");
    record.name = "Renamed".to_string();
    let replaced = store
        .replace_camera(record)
        .await
        .expect("replace")
        .expect("exists");
    assert_eq!(replaced.name, "Renamed");

    let missing = store
        .replace_camera(camera("ghost", "00:14:22:01:23:09", "SN9"))
        .await
        .expect("replace");
    assert!(missing.is_none());
}

#[tokio::test]
async fn camera_lookup_by_ip_and_batch() {
    let store = InMemoryCameraStore::new();
    store
        .create_camera(camera("a", "00:14:22:01:23:01", "SN1"))
        .await
        .expect("create");
    store
        .create_camera(camera("bb", "00:14:22:01:23:02", "SN2"))
        .await
        .expect("create");

    let found = store.find_camera_by_ip("10.0.0.2").await.expect("query");
    assert_eq!(found.map(|c| c.camera_id), Some("bb".to_string()));

    let batch = store
        .find_cameras(&["a".to_string(), "missing".to_string()])
        .await
        .expect("batch");
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn nvr_ip_and_mac_are_unique() {
    let store = InMemoryNvrStore::new();
    store
        .create_nvr(nvr("n1", "10.1.0.1", "AA:BB:CC:DD:EE:01"))
        .await
        .expect("create");
    let err = store
        .create_nvr(nvr("n2", "10.1.0.1", "AA:BB:CC:DD:EE:02"))
        .await
        .expect_err("ip taken");
    assert_eq!(err.duplicate_field(), Some("ipAddress"));
    let err = store
        .create_nvr(nvr("n3", "10.1.0.3", "aa:bb:cc:dd:ee:01"))
        .await
        .expect_err("mac taken");
    assert_eq!(err.duplicate_field(), Some("macAddress"));
}

#[tokio::test]
async fn nvr_channel_occupancy_is_derived() {
    let mut record = nvr("n1", "10.1.0.1", "AA:BB:CC:DD:EE:01");
    record.max_channels = 2;
    record.cameras = vec!["a".to_string()];
    assert_eq!(record.channels_occupied(), 1);
    assert!(record.has_free_channel());
    record.cameras.push("b".to_string());
    assert!(!record.has_free_channel());
}

#[tokio::test]
async fn project_name_is_unique_and_deletable() {
    let store = InMemoryProjectStore::new();
    let project = ProjectRecord {
        project_id: "p1".to_string(),
        name: "Warehouse".to_string(),
        description: None,
        cameras: Vec::new(),
        nvrs: Vec::new(),
        created_by: None,
        updated_by: None,
        created_at_ms: 0,
        updated_at_ms: 0,
    };
    store.create_project(project.clone()).await.expect("create");
    let err = store
        .create_project(ProjectRecord {
            project_id: "p2".to_string(),
            ..project
        })
        .await
        .expect_err("name taken");
    assert_eq!(err.duplicate_field(), Some("name"));

    assert!(store.delete_project("p1").await.expect("delete"));
    assert!(!store.delete_project("p1").await.expect("delete again"));
}

#[test]
fn schema_migration_seeds_no_users() {
    let sql = include_str!("../migrations/0001_init.sql").to_ascii_lowercase();
    assert!(sql.contains("create table if not exists users"));
    assert!(!sql.contains("insert into users"));
    assert!(!sql.contains(DEFAULT_ADMIN_EMAIL));
}
