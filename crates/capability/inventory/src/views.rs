//! 读投影：引用字段展开为 `{id, name}` 摘要。
//!
//! 列表接口按 ID 批量查找被引用实体，避免逐条查询。
//! 引用指向已不存在的实体时保留 ID，名称为空。

use crate::{InventoryError, InventoryService};
use domain::ChangeLogEntry;
use std::collections::HashMap;
use vss_storage::{CameraRecord, NvrRecord, ProjectRecord};

/// 引用摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CameraView {
    pub camera: CameraRecord,
    pub nvr: Option<RefSummary>,
    pub project: Option<RefSummary>,
    pub created_by: Option<RefSummary>,
    pub updated_by: Option<RefSummary>,
}

#[derive(Debug, Clone)]
pub struct NvrView {
    pub nvr: NvrRecord,
    pub cameras: Vec<RefSummary>,
    pub project: Option<RefSummary>,
}

#[derive(Debug, Clone)]
pub struct ProjectView {
    pub project: ProjectRecord,
    pub cameras: Vec<RefSummary>,
    pub nvrs: Vec<RefSummary>,
    pub created_by: Option<RefSummary>,
    pub updated_by: Option<RefSummary>,
}

/// 重分配历史中的一条，NVR 展开为名称与通道数。
#[derive(Debug, Clone)]
pub struct HistoryItem {
    pub nvr: RefSummary,
    pub max_channels: Option<i32>,
    pub date_ms: i64,
}

#[derive(Debug, Clone)]
pub struct HistoryView {
    pub camera_id: String,
    pub camera_name: String,
    pub entries: Vec<HistoryItem>,
}

type Names = HashMap<String, String>;

fn summary(names: &Names, id: &str) -> RefSummary {
    RefSummary {
        id: id.to_string(),
        name: names.get(id).cloned().unwrap_or_default(),
    }
}

fn summaries(names: &Names, ids: &[String]) -> Vec<RefSummary> {
    ids.iter().map(|id| summary(names, id)).collect()
}

fn distinct<'a>(ids: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().cloned().collect();
    ids.sort();
    ids.dedup();
    ids
}

impl InventoryService {
    async fn camera_names(&self, ids: Vec<String>) -> Result<Names, InventoryError> {
        let cameras = self.stores.cameras.find_cameras(&ids).await?;
        Ok(cameras
            .into_iter()
            .map(|camera| (camera.camera_id, camera.name))
            .collect())
    }

    async fn nvr_names(&self, ids: Vec<String>) -> Result<Names, InventoryError> {
        let nvrs = self.stores.nvrs.find_nvrs(&ids).await?;
        Ok(nvrs.into_iter().map(|nvr| (nvr.nvr_id, nvr.name)).collect())
    }

    async fn project_names(&self, ids: Vec<String>) -> Result<Names, InventoryError> {
        let projects = self.stores.projects.find_projects(&ids).await?;
        Ok(projects
            .into_iter()
            .map(|project| (project.project_id, project.name))
            .collect())
    }

    async fn user_names(&self, ids: Vec<String>) -> Result<Names, InventoryError> {
        let users = self.stores.users.find_users(&ids).await?;
        Ok(users.into_iter().map(|user| (user.user_id, user.name)).collect())
    }

    async fn camera_views(&self, cameras: Vec<CameraRecord>) -> Result<Vec<CameraView>, InventoryError> {
        let nvrs = self
            .nvr_names(distinct(cameras.iter().filter_map(|c| c.current_nvr.as_ref())))
            .await?;
        let projects = self
            .project_names(distinct(
                cameras.iter().filter_map(|c| c.current_project.as_ref()),
            ))
            .await?;
        let users = self
            .user_names(distinct(cameras.iter().flat_map(|c| {
                c.created_by.iter().chain(c.updated_by.iter())
            })))
            .await?;
        Ok(cameras
            .into_iter()
            .map(|camera| CameraView {
                nvr: camera.current_nvr.as_deref().map(|id| summary(&nvrs, id)),
                project: camera
                    .current_project
                    .as_deref()
                    .map(|id| summary(&projects, id)),
                created_by: camera.created_by.as_deref().map(|id| summary(&users, id)),
                updated_by: camera.updated_by.as_deref().map(|id| summary(&users, id)),
                camera,
            })
            .collect())
    }

    async fn nvr_views(&self, nvrs: Vec<NvrRecord>) -> Result<Vec<NvrView>, InventoryError> {
        let cameras = self
            .camera_names(distinct(nvrs.iter().flat_map(|nvr| nvr.cameras.iter())))
            .await?;
        let projects = self
            .project_names(distinct(nvrs.iter().filter_map(|nvr| nvr.project.as_ref())))
            .await?;
        Ok(nvrs
            .into_iter()
            .map(|nvr| NvrView {
                cameras: summaries(&cameras, &nvr.cameras),
                project: nvr.project.as_deref().map(|id| summary(&projects, id)),
                nvr,
            })
            .collect())
    }

    async fn project_views(
        &self,
        projects: Vec<ProjectRecord>,
    ) -> Result<Vec<ProjectView>, InventoryError> {
        let cameras = self
            .camera_names(distinct(projects.iter().flat_map(|p| p.cameras.iter())))
            .await?;
        let nvrs = self
            .nvr_names(distinct(projects.iter().flat_map(|p| p.nvrs.iter())))
            .await?;
        let users = self
            .user_names(distinct(projects.iter().flat_map(|p| {
                p.created_by.iter().chain(p.updated_by.iter())
            })))
            .await?;
        Ok(projects
            .into_iter()
            .map(|project| ProjectView {
                cameras: summaries(&cameras, &project.cameras),
                nvrs: summaries(&nvrs, &project.nvrs),
                created_by: project.created_by.as_deref().map(|id| summary(&users, id)),
                updated_by: project.updated_by.as_deref().map(|id| summary(&users, id)),
                project,
            })
            .collect())
    }

    pub async fn camera_view(&self, camera: CameraRecord) -> Result<CameraView, InventoryError> {
        let mut views = self.camera_views(vec![camera]).await?;
        views.pop().ok_or(InventoryError::NotFound("camera"))
    }

    pub async fn nvr_view(&self, nvr: NvrRecord) -> Result<NvrView, InventoryError> {
        let mut views = self.nvr_views(vec![nvr]).await?;
        views.pop().ok_or(InventoryError::NotFound("nvr"))
    }

    pub async fn project_view(&self, project: ProjectRecord) -> Result<ProjectView, InventoryError> {
        let mut views = self.project_views(vec![project]).await?;
        views.pop().ok_or(InventoryError::NotFound("project"))
    }

    pub async fn list_cameras(&self) -> Result<Vec<CameraView>, InventoryError> {
        let cameras = self.stores.cameras.list_cameras().await?;
        self.camera_views(cameras).await
    }

    pub async fn get_camera(&self, camera_id: &str) -> Result<CameraView, InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        self.camera_view(camera).await
    }

    /// 摄像头的重分配历史（按时间顺序）。
    pub async fn camera_history(&self, camera_id: &str) -> Result<HistoryView, InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        let ids = distinct(camera.reassignment_history.iter().map(|entry| &entry.nvr_id));
        let nvrs: HashMap<String, NvrRecord> = self
            .stores
            .nvrs
            .find_nvrs(&ids)
            .await?
            .into_iter()
            .map(|nvr| (nvr.nvr_id.clone(), nvr))
            .collect();
        let entries = camera
            .reassignment_history
            .iter()
            .map(|entry| {
                let nvr = nvrs.get(&entry.nvr_id);
                HistoryItem {
                    nvr: RefSummary {
                        id: entry.nvr_id.clone(),
                        name: nvr.map(|nvr| nvr.name.clone()).unwrap_or_default(),
                    },
                    max_channels: nvr.map(|nvr| nvr.max_channels),
                    date_ms: entry.date_ms,
                }
            })
            .collect();
        Ok(HistoryView {
            camera_id: camera.camera_id,
            camera_name: camera.name,
            entries,
        })
    }

    /// 摄像头变更日志（按时间顺序）。
    pub async fn camera_changes(&self, camera_id: &str) -> Result<Vec<ChangeLogEntry>, InventoryError> {
        Ok(self.load_camera(camera_id).await?.change_log)
    }

    pub async fn list_nvrs(&self) -> Result<Vec<NvrView>, InventoryError> {
        let nvrs = self.stores.nvrs.list_nvrs().await?;
        self.nvr_views(nvrs).await
    }

    pub async fn get_nvr(&self, nvr_id: &str) -> Result<NvrView, InventoryError> {
        let nvr = self.load_nvr(nvr_id).await?;
        self.nvr_view(nvr).await
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectView>, InventoryError> {
        let projects = self.stores.projects.list_projects().await?;
        self.project_views(projects).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<ProjectView, InventoryError> {
        let project = self.load_project(project_id).await?;
        self.project_view(project).await
    }
}
