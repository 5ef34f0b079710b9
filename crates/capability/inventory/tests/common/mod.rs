#![allow(dead_code)]

use domain::{Role, UserContext};
use std::sync::Arc;
use vss_inventory::{InventoryService, InventoryStores, NewCamera, NewNvr, NewProject};
use vss_storage::{
    CameraRecord, InMemoryCameraStore, InMemoryNvrStore, InMemoryProjectStore, InMemoryUserStore,
    NvrRecord, ProjectRecord,
};

pub fn stores() -> InventoryStores {
    InventoryStores {
        cameras: Arc::new(InMemoryCameraStore::new()),
        nvrs: Arc::new(InMemoryNvrStore::new()),
        projects: Arc::new(InMemoryProjectStore::new()),
        users: Arc::new(InMemoryUserStore::with_default_admin()),
    }
}

pub fn service() -> (InventoryService, InventoryStores) {
    let stores = stores();
    (InventoryService::new(stores.clone()), stores)
}

pub fn admin() -> UserContext {
    UserContext::new(vss_storage::DEFAULT_ADMIN_ID, "Admin", Role::Admin)
}

pub fn new_camera(index: u32) -> NewCamera {
    NewCamera {
        name: format!("Cam {index}"),
        model: "X1".to_string(),
        ip_address: format!("10.0.1.{index}"),
        location: "Yard".to_string(),
        mac_address: format!("00:14:22:01:24:{index:02}"),
        serial_number: format!("SER{index}"),
        ..NewCamera::default()
    }
}

pub fn new_nvr(index: u32, max_channels: i32) -> NewNvr {
    NewNvr {
        name: format!("NVR {index}"),
        ip_address: format!("10.0.2.{index}"),
        mac_address: format!("00:14:22:02:00:{index:02}"),
        model: "N8".to_string(),
        max_channels,
        capacity: 4096,
        location: "Rack".to_string(),
        branch: "Main".to_string(),
        ..NewNvr::default()
    }
}

pub fn new_project(name: &str) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: None,
    }
}

pub async fn camera(stores: &InventoryStores, camera_id: &str) -> CameraRecord {
    stores
        .cameras
        .find_camera(camera_id)
        .await
        .expect("find camera")
        .expect("camera exists")
}

pub async fn nvr(stores: &InventoryStores, nvr_id: &str) -> NvrRecord {
    stores
        .nvrs
        .find_nvr(nvr_id)
        .await
        .expect("find nvr")
        .expect("nvr exists")
}

pub async fn project(stores: &InventoryStores, project_id: &str) -> ProjectRecord {
    stores
        .projects
        .find_project(project_id)
        .await
        .expect("find project")
        .expect("project exists")
}
