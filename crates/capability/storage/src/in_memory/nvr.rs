//! NVR 内存存储实现
//!
//! 唯一约束：ipAddress、macAddress。

use crate::error::StorageError;
use crate::models::NvrRecord;
use crate::traits::NvrStore;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemoryNvrStore {
    nvrs: RwLock<HashMap<String, NvrRecord>>,
}

impl InMemoryNvrStore {
    pub fn new() -> Self {
        Self {
            nvrs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryNvrStore {
    fn default() -> Self {
        Self::new()
    }
}

fn conflicting_field(map: &HashMap<String, NvrRecord>, record: &NvrRecord) -> Option<&'static str> {
    map.values()
        .filter(|nvr| nvr.nvr_id != record.nvr_id)
        .find_map(|nvr| {
            if nvr.ip_address == record.ip_address {
                Some("ipAddress")
            } else if nvr.mac_address.eq_ignore_ascii_case(&record.mac_address) {
                Some("macAddress")
            } else {
                None
            }
        })
}

#[async_trait::async_trait]
impl NvrStore for InMemoryNvrStore {
    async fn list_nvrs(&self) -> Result<Vec<NvrRecord>, StorageError> {
        let map = self
            .nvrs
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut nvrs: Vec<NvrRecord> = map.values().cloned().collect();
        nvrs.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(nvrs)
    }

    async fn find_nvr(&self, nvr_id: &str) -> Result<Option<NvrRecord>, StorageError> {
        let map = self
            .nvrs
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(nvr_id).cloned())
    }

    async fn find_nvrs(&self, nvr_ids: &[String]) -> Result<Vec<NvrRecord>, StorageError> {
        let map = self
            .nvrs
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(nvr_ids
            .iter()
            .filter_map(|nvr_id| map.get(nvr_id).cloned())
            .collect())
    }

    async fn create_nvr(&self, record: NvrRecord) -> Result<NvrRecord, StorageError> {
        let mut map = self
            .nvrs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.nvr_id) {
            return Err(StorageError::new("nvr exists"));
        }
        if let Some(field) = conflicting_field(&map, &record) {
            return Err(StorageError::duplicate(field));
        }
        map.insert(record.nvr_id.clone(), record.clone());
        Ok(record)
    }

    async fn replace_nvr(&self, record: NvrRecord) -> Result<Option<NvrRecord>, StorageError> {
        let mut map = self
            .nvrs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(&record.nvr_id) {
            return Ok(None);
        }
        if let Some(field) = conflicting_field(&map, &record) {
            return Err(StorageError::duplicate(field));
        }
        map.insert(record.nvr_id.clone(), record.clone());
        Ok(Some(record))
    }

    async fn delete_nvr(&self, nvr_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .nvrs
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(nvr_id).is_some())
    }
}
