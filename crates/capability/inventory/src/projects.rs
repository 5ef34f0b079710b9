//! 项目写操作与成员管理。

use crate::input::{self, NewProject, ProjectChanges};
use crate::saga::Saga;
use crate::{InventoryError, InventoryService, now_epoch_ms};
use domain::UserContext;
use tracing::info;
use vss_storage::{CameraRecord, NvrRecord, ProjectRecord};

impl InventoryService {
    pub async fn create_project(
        &self,
        input: NewProject,
        actor: &UserContext,
    ) -> Result<ProjectRecord, InventoryError> {
        let now_ms = now_epoch_ms();
        let record = ProjectRecord {
            project_id: uuid::Uuid::new_v4().to_string(),
            name: input::required("name", &input.name)?,
            description: input::optional(input.description.as_deref()),
            cameras: Vec::new(),
            nvrs: Vec::new(),
            created_by: Some(actor.user_id.clone()),
            updated_by: Some(actor.user_id.clone()),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        let created = self.stores.projects.create_project(record).await?;
        info!(
            target: "vss.inventory",
            project_id = %created.project_id,
            actor = %actor.user_id,
            "project_created"
        );
        Ok(created)
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        changes: ProjectChanges,
        actor: &UserContext,
    ) -> Result<ProjectRecord, InventoryError> {
        let project = self.load_project(project_id).await?;
        let mut next = project.clone();
        if let Some(value) = changes.name.as_deref() {
            next.name = input::required("name", value)?;
        }
        if let Some(value) = changes.description.as_deref() {
            next.description = input::optional(Some(value));
        }
        if next == project {
            return Ok(project);
        }
        next.updated_by = Some(actor.user_id.clone());
        next.updated_at_ms = now_epoch_ms();
        self.stores
            .projects
            .replace_project(next)
            .await?
            .ok_or(InventoryError::NotFound("project"))
    }

    /// 删除项目：先清除成员摄像头与 NVR 的项目引用，再删除项目。
    pub async fn delete_project(&self, project_id: &str, actor: &UserContext) -> Result<(), InventoryError> {
        let project = self.load_project(project_id).await?;
        let now_ms = now_epoch_ms();
        let cameras: Vec<(CameraRecord, CameraRecord)> = self
            .stores
            .cameras
            .find_cameras(&project.cameras)
            .await?
            .into_iter()
            .filter(|camera| camera.current_project.as_deref() == Some(project_id))
            .map(|camera| {
                let mut after = camera.clone();
                after.current_project = None;
                after.updated_by = Some(actor.user_id.clone());
                after.updated_at_ms = now_ms;
                (camera, after)
            })
            .collect();
        let nvrs: Vec<(NvrRecord, NvrRecord)> = self
            .stores
            .nvrs
            .find_nvrs(&project.nvrs)
            .await?
            .into_iter()
            .filter(|nvr| nvr.project.as_deref() == Some(project_id))
            .map(|nvr| {
                let mut after = nvr.clone();
                after.project = None;
                after.updated_at_ms = now_ms;
                (nvr, after)
            })
            .collect();

        let mut saga = Saga::new(&self.stores, "delete_project");
        let result = async {
            for (before, after) in &cameras {
                saga.replace_camera(before, after.clone()).await?;
            }
            for (before, after) in &nvrs {
                saga.replace_nvr(before, after.clone()).await?;
            }
            saga.delete_project(&project.project_id).await
        }
        .await;
        saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            project_id = %project.project_id,
            detached_cameras = cameras.len(),
            detached_nvrs = nvrs.len(),
            actor = %actor.user_id,
            "project_deleted"
        );
        Ok(())
    }

    /// 将摄像头加入项目（会从原项目移出）；已是成员返回 Conflict。
    pub async fn add_camera_to_project(
        &self,
        project_id: &str,
        camera_id: &str,
        actor: &UserContext,
    ) -> Result<ProjectRecord, InventoryError> {
        let project = self.load_project(project_id).await?;
        self.load_camera(camera_id).await?;
        if project.cameras.iter().any(|id| id == camera_id) {
            return Err(InventoryError::Conflict(
                "camera already belongs to project".to_string(),
            ));
        }
        self.reassign_camera_project(camera_id, Some(project_id), actor)
            .await?;
        self.load_project(project_id).await
    }

    /// 将 NVR 加入项目（会从原项目移出）；已是成员返回 Conflict。
    pub async fn add_nvr_to_project(
        &self,
        project_id: &str,
        nvr_id: &str,
    ) -> Result<ProjectRecord, InventoryError> {
        let project = self.load_project(project_id).await?;
        self.load_nvr(nvr_id).await?;
        if project.nvrs.iter().any(|id| id == nvr_id) {
            return Err(InventoryError::Conflict(
                "nvr already belongs to project".to_string(),
            ));
        }
        self.reassign_nvr_project(nvr_id, Some(project_id)).await?;
        self.load_project(project_id).await
    }
}
