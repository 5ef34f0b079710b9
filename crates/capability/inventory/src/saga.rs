//! 多记录写入的补偿序列。
//!
//! 每次写入成功后登记一个撤销动作；后续写入失败时按登记的逆序执行撤销。
//! 撤销失败只记录日志与指标，调用方仍得到原始错误。

use crate::{InventoryError, InventoryStores};
use tracing::{info, warn};
use vss_storage::{CameraRecord, NvrRecord, ProjectRecord};
use vss_telemetry::{record_compensation, record_compensation_failure};

enum Undo {
    RestoreCamera(CameraRecord),
    RestoreNvr(NvrRecord),
    RestoreProject(ProjectRecord),
    RemoveCamera(String),
    RemoveNvr(String),
}

pub(crate) struct Saga<'a> {
    stores: &'a InventoryStores,
    operation: &'static str,
    undo: Vec<Undo>,
}

impl<'a> Saga<'a> {
    pub(crate) fn new(stores: &'a InventoryStores, operation: &'static str) -> Self {
        Self {
            stores,
            operation,
            undo: Vec::new(),
        }
    }

    pub(crate) async fn create_camera(
        &mut self,
        record: CameraRecord,
    ) -> Result<CameraRecord, InventoryError> {
        let created = self.stores.cameras.create_camera(record).await?;
        self.undo.push(Undo::RemoveCamera(created.camera_id.clone()));
        Ok(created)
    }

    pub(crate) async fn create_nvr(&mut self, record: NvrRecord) -> Result<NvrRecord, InventoryError> {
        let created = self.stores.nvrs.create_nvr(record).await?;
        self.undo.push(Undo::RemoveNvr(created.nvr_id.clone()));
        Ok(created)
    }

    /// 以 `after` 替换摄像头，`before` 作为撤销快照。
    pub(crate) async fn replace_camera(
        &mut self,
        before: &CameraRecord,
        after: CameraRecord,
    ) -> Result<CameraRecord, InventoryError> {
        let saved = self
            .stores
            .cameras
            .replace_camera(after)
            .await?
            .ok_or(InventoryError::NotFound("camera"))?;
        self.undo.push(Undo::RestoreCamera(before.clone()));
        Ok(saved)
    }

    pub(crate) async fn replace_nvr(
        &mut self,
        before: &NvrRecord,
        after: NvrRecord,
    ) -> Result<NvrRecord, InventoryError> {
        let saved = self
            .stores
            .nvrs
            .replace_nvr(after)
            .await?
            .ok_or(InventoryError::NotFound("nvr"))?;
        self.undo.push(Undo::RestoreNvr(before.clone()));
        Ok(saved)
    }

    pub(crate) async fn replace_project(
        &mut self,
        before: &ProjectRecord,
        after: ProjectRecord,
    ) -> Result<ProjectRecord, InventoryError> {
        let saved = self
            .stores
            .projects
            .replace_project(after)
            .await?
            .ok_or(InventoryError::NotFound("project"))?;
        self.undo.push(Undo::RestoreProject(before.clone()));
        Ok(saved)
    }

    /// 删除摄像头，只作为序列的最后一步。
    pub(crate) async fn delete_camera(&mut self, camera_id: &str) -> Result<(), InventoryError> {
        if !self.stores.cameras.delete_camera(camera_id).await? {
            return Err(InventoryError::NotFound("camera"));
        }
        Ok(())
    }

    /// 删除 NVR，只作为序列的最后一步。
    pub(crate) async fn delete_nvr(&mut self, nvr_id: &str) -> Result<(), InventoryError> {
        if !self.stores.nvrs.delete_nvr(nvr_id).await? {
            return Err(InventoryError::NotFound("nvr"));
        }
        Ok(())
    }

    /// 删除项目，只作为序列的最后一步。
    pub(crate) async fn delete_project(&mut self, project_id: &str) -> Result<(), InventoryError> {
        if !self.stores.projects.delete_project(project_id).await? {
            return Err(InventoryError::NotFound("project"));
        }
        Ok(())
    }

    /// 结束序列：成功直接返回，失败时先补偿再返回原始错误。
    pub(crate) async fn finish<T>(self, result: Result<T, InventoryError>) -> Result<T, InventoryError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.compensate(&err).await;
                Err(err)
            }
        }
    }

    async fn compensate(self, cause: &InventoryError) {
        if self.undo.is_empty() {
            return;
        }
        record_compensation();
        info!(
            target: "vss.inventory",
            operation = self.operation,
            steps = self.undo.len(),
            error = %cause,
            "saga_compensating"
        );
        for step in self.undo.into_iter().rev() {
            let outcome = match step {
                Undo::RestoreCamera(record) => self
                    .stores
                    .cameras
                    .replace_camera(record)
                    .await
                    .map(|_| ()),
                Undo::RestoreNvr(record) => {
                    self.stores.nvrs.replace_nvr(record).await.map(|_| ())
                }
                Undo::RestoreProject(record) => self
                    .stores
                    .projects
                    .replace_project(record)
                    .await
                    .map(|_| ()),
                Undo::RemoveCamera(camera_id) => self
                    .stores
                    .cameras
                    .delete_camera(&camera_id)
                    .await
                    .map(|_| ()),
                Undo::RemoveNvr(nvr_id) => {
                    self.stores.nvrs.delete_nvr(&nvr_id).await.map(|_| ())
                }
            };
            if let Err(err) = outcome {
                record_compensation_failure();
                warn!(
                    target: "vss.inventory",
                    operation = self.operation,
                    error = %err,
                    "saga_compensation_failed"
                );
            }
        }
    }
}
