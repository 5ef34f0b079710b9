//! 摄像头内存存储实现
//!
//! 唯一约束：macAddress、serialNumber（替换时排除自身）。

use crate::error::StorageError;
use crate::models::CameraRecord;
use crate::traits::CameraStore;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemoryCameraStore {
    cameras: RwLock<HashMap<String, CameraRecord>>,
}

impl InMemoryCameraStore {
    pub fn new() -> Self {
        Self {
            cameras: RwLock::new(HashMap::new()),
        }
    }

    fn find_by<F>(&self, predicate: F) -> Result<Option<CameraRecord>, StorageError>
    where
        F: Fn(&CameraRecord) -> bool,
    {
        let map = self
            .cameras
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.values().find(|camera| predicate(camera)).cloned())
    }
}

impl Default for InMemoryCameraStore {
    fn default() -> Self {
        Self::new()
    }
}

fn conflicting_field(
    map: &HashMap<String, CameraRecord>,
    record: &CameraRecord,
) -> Option<&'static str> {
    let others = map
        .values()
        .filter(|camera| camera.camera_id != record.camera_id);
    for camera in others {
        if camera.mac_address.eq_ignore_ascii_case(&record.mac_address) {
            return Some("macAddress");
        }
        if camera.serial_number == record.serial_number {
            return Some("serialNumber");
        }
    }
    None
}

#[async_trait::async_trait]
impl CameraStore for InMemoryCameraStore {
    async fn list_cameras(&self) -> Result<Vec<CameraRecord>, StorageError> {
        let map = self
            .cameras
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut cameras: Vec<CameraRecord> = map.values().cloned().collect();
        cameras.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(cameras)
    }

    async fn find_camera(&self, camera_id: &str) -> Result<Option<CameraRecord>, StorageError> {
        let map = self
            .cameras
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(camera_id).cloned())
    }

    async fn find_cameras(&self, camera_ids: &[String]) -> Result<Vec<CameraRecord>, StorageError> {
        let map = self
            .cameras
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(camera_ids
            .iter()
            .filter_map(|camera_id| map.get(camera_id).cloned())
            .collect())
    }

    async fn find_camera_by_ip(
        &self,
        ip_address: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        self.find_by(|camera| camera.ip_address == ip_address)
    }

    async fn find_camera_by_mac(
        &self,
        mac_address: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        self.find_by(|camera| camera.mac_address.eq_ignore_ascii_case(mac_address))
    }

    async fn find_camera_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        self.find_by(|camera| camera.serial_number == serial_number)
    }

    async fn create_camera(&self, record: CameraRecord) -> Result<CameraRecord, StorageError> {
        let mut map = self
            .cameras
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.camera_id) {
            return Err(StorageError::new("camera exists"));
        }
        if let Some(field) = conflicting_field(&map, &record) {
            return Err(StorageError::duplicate(field));
        }
        map.insert(record.camera_id.clone(), record.clone());
        Ok(record)
    }

    async fn replace_camera(
        &self,
        record: CameraRecord,
    ) -> Result<Option<CameraRecord>, StorageError> {
        let mut map = self
            .cameras
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(&record.camera_id) {
            return Ok(None);
        }
        if let Some(field) = conflicting_field(&map, &record) {
            return Err(StorageError::duplicate(field));
        }
        map.insert(record.camera_id.clone(), record.clone());
        Ok(Some(record))
    }

    async fn delete_camera(&self, camera_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .cameras
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(camera_id).is_some())
    }
}
