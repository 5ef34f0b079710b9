//! 项目内存存储实现
//!
//! 功能：
//! - 项目 CRUD 操作
//! - 名称唯一

use crate::error::StorageError;
use crate::models::ProjectRecord;
use crate::traits::ProjectStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 项目内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<String, ProjectRecord>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(map: &HashMap<String, ProjectRecord>, record: &ProjectRecord) -> bool {
    map.values()
        .any(|project| project.project_id != record.project_id && project.name == record.name)
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    /// 列出所有项目（按创建时间）
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        let map = self
            .projects
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut projects: Vec<ProjectRecord> = map.values().cloned().collect();
        projects.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(projects)
    }

    /// 查找指定项目
    async fn find_project(&self, project_id: &str) -> Result<Option<ProjectRecord>, StorageError> {
        let project = self
            .projects
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .get(project_id)
            .cloned();
        Ok(project)
    }

    async fn find_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<ProjectRecord>, StorageError> {
        let map = self
            .projects
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(project_ids
            .iter()
            .filter_map(|project_id| map.get(project_id).cloned())
            .collect())
    }

    /// 创建新项目
    async fn create_project(&self, record: ProjectRecord) -> Result<ProjectRecord, StorageError> {
        let mut map = self
            .projects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.project_id) {
            return Err(StorageError::new("project exists"));
        }
        if name_taken(&map, &record) {
            return Err(StorageError::duplicate("name"));
        }
        map.insert(record.project_id.clone(), record.clone());
        Ok(record)
    }

    /// 整条替换项目
    async fn replace_project(
        &self,
        record: ProjectRecord,
    ) -> Result<Option<ProjectRecord>, StorageError> {
        let mut map = self
            .projects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(&record.project_id) {
            return Ok(None);
        }
        if name_taken(&map, &record) {
            return Err(StorageError::duplicate("name"));
        }
        map.insert(record.project_id.clone(), record.clone());
        Ok(Some(record))
    }

    /// 删除项目
    async fn delete_project(&self, project_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .projects
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(project_id).is_some())
    }
}
