//! 重分配引擎。
//!
//! 摄像头 → NVR：容量按目标 NVR 当前负载校验（不先扣减原 NVR），
//! 写入顺序为 目标 NVR → 摄像头 → 原 NVR。
//! 摄像头/NVR → 项目：写入顺序为 新项目 → 实体 → 原项目。
//!
//! 已知竞态：同一摄像头的并发改派可能读到过期的原 NVR，
//! 存储层没有乐观锁，这里不做处理。

use crate::saga::Saga;
use crate::{InventoryError, InventoryService, now_epoch_ms};
use domain::{ReassignmentEntry, UserContext, push_reassignment};
use tracing::info;
use vss_storage::{CameraRecord, NvrRecord, ProjectRecord};
use vss_telemetry::{record_reassignment, record_reassignment_rejected};

pub(crate) fn add_member(list: &mut Vec<String>, id: &str) -> bool {
    if list.iter().any(|existing| existing == id) {
        return false;
    }
    list.push(id.to_string());
    true
}

pub(crate) fn remove_member(list: &mut Vec<String>, id: &str) -> bool {
    let before = list.len();
    list.retain(|existing| existing != id);
    list.len() != before
}

/// 将摄像头指向新 NVR：追加历史、更新当前引用与分配时间。
pub(crate) fn point_camera_at(camera: &mut CameraRecord, nvr_id: &str, now_ms: i64) {
    push_reassignment(
        &mut camera.reassignment_history,
        ReassignmentEntry {
            nvr_id: nvr_id.to_string(),
            date_ms: now_ms,
        },
    );
    camera.current_nvr = Some(nvr_id.to_string());
    camera.assigned_date_ms = Some(now_ms);
}

fn ensure_capacity(nvr: &NvrRecord) -> Result<(), InventoryError> {
    if nvr.has_free_channel() {
        return Ok(());
    }
    record_reassignment_rejected();
    info!(
        target: "vss.inventory",
        nvr_id = %nvr.nvr_id,
        max_channels = nvr.max_channels,
        "reassignment_rejected_capacity"
    );
    Err(InventoryError::CapacityExceeded(nvr.name.clone()))
}

/// 一条记录的新旧版本。
pub(crate) type Rewrite<T> = (T, T);

/// 摄像头换 NVR 时 NVR 侧的待写入变化。
#[derive(Default)]
pub(crate) struct NvrMove {
    pub(crate) target: Option<Rewrite<NvrRecord>>,
    pub(crate) previous: Option<Rewrite<NvrRecord>>,
}

impl NvrMove {
    pub(crate) async fn write_target(&self, saga: &mut Saga<'_>) -> Result<(), InventoryError> {
        if let Some((before, after)) = &self.target {
            saga.replace_nvr(before, after.clone()).await?;
        }
        Ok(())
    }

    pub(crate) async fn write_previous(&self, saga: &mut Saga<'_>) -> Result<(), InventoryError> {
        if let Some((before, after)) = &self.previous {
            saga.replace_nvr(before, after.clone()).await?;
        }
        Ok(())
    }
}

/// 项目成员类别。
#[derive(Debug, Clone, Copy)]
pub(crate) enum Member {
    Camera,
    Nvr,
}

impl Member {
    fn list(self, project: &mut ProjectRecord) -> &mut Vec<String> {
        match self {
            Member::Camera => &mut project.cameras,
            Member::Nvr => &mut project.nvrs,
        }
    }
}

/// 实体换项目时项目侧的待写入变化。
#[derive(Default)]
pub(crate) struct ProjectMove {
    pub(crate) joined: Option<Rewrite<ProjectRecord>>,
    pub(crate) left: Option<Rewrite<ProjectRecord>>,
}

impl ProjectMove {
    pub(crate) fn is_empty(&self) -> bool {
        self.joined.is_none() && self.left.is_none()
    }

    pub(crate) async fn write_joined(&self, saga: &mut Saga<'_>) -> Result<(), InventoryError> {
        if let Some((before, after)) = &self.joined {
            saga.replace_project(before, after.clone()).await?;
        }
        Ok(())
    }

    pub(crate) async fn write_left(&self, saga: &mut Saga<'_>) -> Result<(), InventoryError> {
        if let Some((before, after)) = &self.left {
            saga.replace_project(before, after.clone()).await?;
        }
        Ok(())
    }
}

impl InventoryService {
    pub(crate) async fn load_camera(&self, camera_id: &str) -> Result<CameraRecord, InventoryError> {
        self.stores
            .cameras
            .find_camera(camera_id)
            .await?
            .ok_or(InventoryError::NotFound("camera"))
    }

    pub(crate) async fn load_nvr(&self, nvr_id: &str) -> Result<NvrRecord, InventoryError> {
        self.stores
            .nvrs
            .find_nvr(nvr_id)
            .await?
            .ok_or(InventoryError::NotFound("nvr"))
    }

    pub(crate) async fn load_project(&self, project_id: &str) -> Result<ProjectRecord, InventoryError> {
        self.stores
            .projects
            .find_project(project_id)
            .await?
            .ok_or(InventoryError::NotFound("project"))
    }

    /// 计算摄像头迁到 `target`（None 为解除）时 NVR 侧的变化，容量在此校验。
    pub(crate) async fn plan_nvr_move(
        &self,
        camera: &CameraRecord,
        target: Option<&str>,
        now_ms: i64,
    ) -> Result<NvrMove, InventoryError> {
        let mut plan = NvrMove::default();
        if let Some(target_id) = target {
            let nvr = self.load_nvr(target_id).await?;
            if !nvr.cameras.contains(&camera.camera_id) {
                ensure_capacity(&nvr)?;
                let mut after = nvr.clone();
                add_member(&mut after.cameras, &camera.camera_id);
                after.updated_at_ms = now_ms;
                plan.target = Some((nvr, after));
            }
        }
        let previous_id = camera
            .current_nvr
            .as_deref()
            .filter(|previous| Some(*previous) != target);
        if let Some(previous_id) = previous_id {
            if let Some(nvr) = self.stores.nvrs.find_nvr(previous_id).await? {
                let mut after = nvr.clone();
                if remove_member(&mut after.cameras, &camera.camera_id) {
                    after.updated_at_ms = now_ms;
                    plan.previous = Some((nvr, after));
                }
            }
        }
        Ok(plan)
    }

    /// 计算实体从 `current` 项目迁到 `target` 项目时项目侧的变化。
    pub(crate) async fn plan_project_move(
        &self,
        member: Member,
        member_id: &str,
        current: Option<&str>,
        target: Option<&str>,
        now_ms: i64,
    ) -> Result<ProjectMove, InventoryError> {
        let mut plan = ProjectMove::default();
        if let Some(target_id) = target {
            let project = self.load_project(target_id).await?;
            let mut after = project.clone();
            if add_member(member.list(&mut after), member_id) {
                after.updated_at_ms = now_ms;
                plan.joined = Some((project, after));
            }
        }
        if let Some(current_id) = current.filter(|current| Some(*current) != target) {
            if let Some(project) = self.stores.projects.find_project(current_id).await? {
                let mut after = project.clone();
                if remove_member(member.list(&mut after), member_id) {
                    after.updated_at_ms = now_ms;
                    plan.left = Some((project, after));
                }
            }
        }
        Ok(plan)
    }

    /// 将摄像头分配到指定 NVR。
    ///
    /// 已在该 NVR 上返回 Conflict；目标已满返回 CapacityExceeded。
    /// 该操作不写变更日志，重分配历史即其记录。
    pub async fn assign_camera_to_nvr(
        &self,
        camera_id: &str,
        nvr_id: &str,
        actor: &UserContext,
    ) -> Result<CameraRecord, InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        if camera.current_nvr.as_deref() == Some(nvr_id) {
            self.load_nvr(nvr_id).await?;
            record_reassignment_rejected();
            return Err(InventoryError::Conflict(
                "camera is already assigned to this nvr".to_string(),
            ));
        }

        let now_ms = now_epoch_ms();
        let plan = self.plan_nvr_move(&camera, Some(nvr_id), now_ms).await?;
        let mut next = camera.clone();
        point_camera_at(&mut next, nvr_id, now_ms);
        next.updated_by = Some(actor.user_id.clone());
        next.updated_at_ms = now_ms;

        let mut saga = Saga::new(&self.stores, "assign_camera_to_nvr");
        let result = write_camera_with_nvr_move(&mut saga, &plan, &camera, next).await;
        let saved = saga.finish(result).await?;

        record_reassignment();
        info!(
            target: "vss.inventory",
            camera_id = %saved.camera_id,
            nvr_id = %nvr_id,
            previous_nvr = camera.current_nvr.as_deref().unwrap_or("-"),
            actor = %actor.user_id,
            "camera_reassigned"
        );
        Ok(saved)
    }

    /// 调整摄像头所属项目，`project_id` 为 None 表示移出当前项目。
    pub async fn reassign_camera_project(
        &self,
        camera_id: &str,
        project_id: Option<&str>,
        actor: &UserContext,
    ) -> Result<CameraRecord, InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        let now_ms = now_epoch_ms();
        let plan = self
            .plan_project_move(
                Member::Camera,
                &camera.camera_id,
                camera.current_project.as_deref(),
                project_id,
                now_ms,
            )
            .await?;
        if plan.is_empty() && camera.current_project.as_deref() == project_id {
            return Ok(camera);
        }
        let mut next = camera.clone();
        next.current_project = project_id.map(str::to_string);
        next.updated_by = Some(actor.user_id.clone());
        next.updated_at_ms = now_ms;

        let mut saga = Saga::new(&self.stores, "reassign_camera_project");
        let result = write_camera_with_project_move(&mut saga, &plan, &camera, next).await;
        let saved = saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            camera_id = %saved.camera_id,
            project_id = project_id.unwrap_or("-"),
            "camera_project_changed"
        );
        Ok(saved)
    }

    /// 调整 NVR 所属项目，`project_id` 为 None 表示移出当前项目。
    pub async fn reassign_nvr_project(
        &self,
        nvr_id: &str,
        project_id: Option<&str>,
    ) -> Result<NvrRecord, InventoryError> {
        let nvr = self.load_nvr(nvr_id).await?;
        let now_ms = now_epoch_ms();
        let plan = self
            .plan_project_move(
                Member::Nvr,
                &nvr.nvr_id,
                nvr.project.as_deref(),
                project_id,
                now_ms,
            )
            .await?;
        if plan.is_empty() && nvr.project.as_deref() == project_id {
            return Ok(nvr);
        }
        let mut next = nvr.clone();
        next.project = project_id.map(str::to_string);
        next.updated_at_ms = now_ms;

        let mut saga = Saga::new(&self.stores, "reassign_nvr_project");
        let result = write_nvr_with_project_move(&mut saga, &plan, &nvr, next).await;
        let saved = saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            nvr_id = %saved.nvr_id,
            project_id = project_id.unwrap_or("-"),
            "nvr_project_changed"
        );
        Ok(saved)
    }
}

async fn write_camera_with_nvr_move(
    saga: &mut Saga<'_>,
    plan: &NvrMove,
    before: &CameraRecord,
    after: CameraRecord,
) -> Result<CameraRecord, InventoryError> {
    plan.write_target(saga).await?;
    let saved = saga.replace_camera(before, after).await?;
    plan.write_previous(saga).await?;
    Ok(saved)
}

async fn write_camera_with_project_move(
    saga: &mut Saga<'_>,
    plan: &ProjectMove,
    before: &CameraRecord,
    after: CameraRecord,
) -> Result<CameraRecord, InventoryError> {
    plan.write_joined(saga).await?;
    let saved = saga.replace_camera(before, after).await?;
    plan.write_left(saga).await?;
    Ok(saved)
}

pub(crate) async fn write_nvr_with_project_move(
    saga: &mut Saga<'_>,
    plan: &ProjectMove,
    before: &NvrRecord,
    after: NvrRecord,
) -> Result<NvrRecord, InventoryError> {
    plan.write_joined(saga).await?;
    let saved = saga.replace_nvr(before, after).await?;
    plan.write_left(saga).await?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::MAX_REASSIGNMENT_HISTORY;

    fn camera() -> CameraRecord {
        CameraRecord {
            camera_id: "cam-1".to_string(),
            name: "Gate".to_string(),
            model: "X1".to_string(),
            ip_address: "10.0.0.1".to_string(),
            location: "North".to_string(),
            mac_address: "00:14:22:01:23:45".to_string(),
            serial_number: "SN1".to_string(),
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

    #[test]
    fn membership_helpers_are_idempotent() {
        let mut list = vec!["a".to_string()];
        assert!(!add_member(&mut list, "a"));
        assert!(add_member(&mut list, "b"));
        assert!(remove_member(&mut list, "a"));
        assert!(!remove_member(&mut list, "a"));
        assert_eq!(list, vec!["b".to_string()]);
    }

    #[test]
    fn pointing_at_nvr_updates_reference_and_history() {
        let mut record = camera();
        for step in 0..12 {
            point_camera_at(&mut record, &format!("nvr-{step}"), step);
        }
        assert_eq!(record.current_nvr.as_deref(), Some("nvr-11"));
        assert_eq!(record.assigned_date_ms, Some(11));
        assert_eq!(record.reassignment_history.len(), MAX_REASSIGNMENT_HISTORY);
        assert_eq!(record.reassignment_history[0].nvr_id, "nvr-2");
    }
}
