//! 摄像头写操作：创建、更新（含审计）、删除（级联清理引用）。

use crate::audit::ChangeSet;
use crate::engine::{Member, NvrMove, ProjectMove, point_camera_at};
use crate::input::{self, CameraChanges, NewCamera};
use crate::saga::Saga;
use crate::{InventoryError, InventoryService, now_epoch_ms};
use domain::UserContext;
use tracing::info;
use vss_storage::CameraRecord;
use vss_telemetry::{record_camera_created, record_change_log_entry, record_reassignment};

impl InventoryService {
    /// 创建摄像头；给定 NVR 时按分配规则挂载，给定项目时加入项目。
    pub async fn create_camera(
        &self,
        input: NewCamera,
        actor: &UserContext,
    ) -> Result<CameraRecord, InventoryError> {
        let mut record = CameraRecord {
            camera_id: uuid::Uuid::new_v4().to_string(),
            name: input::required("name", &input.name)?,
            model: input::required("model", &input.model)?,
            ip_address: input::required("ipAddress", &input.ip_address)?,
            location: input::required("location", &input.location)?,
            mac_address: input::mac("macAddress", &input.mac_address)?,
            serial_number: input::required("serialNumber", &input.serial_number)?,
            username: input::optional(input.username.as_deref()),
            password: input::optional(input.password.as_deref()),
            firmware: input::optional(input.firmware.as_deref()),
            resolution: input::optional(input.resolution.as_deref()),
            fps: input.fps.map(input::fps).transpose()?,
            current_nvr: None,
            current_project: None,
            assigned_date_ms: None,
            reassignment_history: Vec::new(),
            change_log: Vec::new(),
            created_by: Some(actor.user_id.clone()),
            updated_by: Some(actor.user_id.clone()),
            created_at_ms: 0,
            updated_at_ms: 0,
        };
        self.ensure_unique_identity(
            &record.camera_id,
            Some(&record.mac_address),
            Some(&record.serial_number),
        )
        .await?;

        let now_ms = now_epoch_ms();
        record.created_at_ms = now_ms;
        record.updated_at_ms = now_ms;
        let nvr_id = input::optional(input.nvr.as_deref());
        let project_id = input::optional(input.project.as_deref());
        let nvr_plan = self.plan_nvr_move(&record, nvr_id.as_deref(), now_ms).await?;
        let project_plan = self
            .plan_project_move(Member::Camera, &record.camera_id, None, project_id.as_deref(), now_ms)
            .await?;
        if let Some(nvr_id) = nvr_id.as_deref() {
            point_camera_at(&mut record, nvr_id, now_ms);
        }
        record.current_project = project_id;

        let mut saga = Saga::new(&self.stores, "create_camera");
        let result = write_new_camera(&mut saga, record, &nvr_plan, &project_plan).await;
        let created = saga.finish(result).await?;

        record_camera_created();
        if created.current_nvr.is_some() {
            record_reassignment();
        }
        info!(
            target: "vss.inventory",
            camera_id = %created.camera_id,
            nvr_id = created.current_nvr.as_deref().unwrap_or("-"),
            project_id = created.current_project.as_deref().unwrap_or("-"),
            actor = %actor.user_id,
            "camera_created"
        );
        Ok(created)
    }

    /// 更新摄像头字段，逐字段记录变更描述。
    ///
    /// 所有校验在任何写入之前完成；没有实际变化时不写入。
    pub async fn update_camera(
        &self,
        camera_id: &str,
        changes: CameraChanges,
        actor: &UserContext,
    ) -> Result<CameraRecord, InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        let mut next = camera.clone();
        let mut log = ChangeSet::default();

        let mac_address = changes
            .mac_address
            .as_deref()
            .map(|value| input::mac("macAddress", value))
            .transpose()?;
        let serial_number = changes
            .serial_number
            .as_deref()
            .map(|value| input::required("serialNumber", value))
            .transpose()?;
        let new_mac = mac_address
            .as_deref()
            .filter(|value| !value.eq_ignore_ascii_case(&camera.mac_address));
        let new_serial = serial_number
            .as_deref()
            .filter(|value| *value != camera.serial_number);
        self.ensure_unique_identity(&camera.camera_id, new_mac, new_serial)
            .await?;

        if let Some(value) = changes.name.as_deref() {
            log.text("name", &mut next.name, input::required("name", value)?);
        }
        if let Some(value) = changes.model.as_deref() {
            log.text("model", &mut next.model, input::required("model", value)?);
        }
        if let Some(value) = changes.ip_address.as_deref() {
            log.text("ipAddress", &mut next.ip_address, input::required("ipAddress", value)?);
        }
        if let Some(value) = changes.location.as_deref() {
            log.text("location", &mut next.location, input::required("location", value)?);
        }
        if let Some(value) = mac_address {
            log.text("macAddress", &mut next.mac_address, value);
        }
        if let Some(value) = serial_number {
            log.text("serialNumber", &mut next.serial_number, value);
        }
        if let Some(value) = changes.username.as_deref() {
            log.optional_text("username", &mut next.username, input::optional(Some(value)));
        }
        if let Some(value) = changes.password.as_deref() {
            log.secret("password", &mut next.password, input::optional(Some(value)));
        }
        if let Some(value) = changes.firmware.as_deref() {
            log.optional_text("firmware", &mut next.firmware, input::optional(Some(value)));
        }
        if let Some(value) = changes.resolution.as_deref() {
            log.optional_text("resolution", &mut next.resolution, input::optional(Some(value)));
        }
        if let Some(value) = changes.fps {
            log.number("fps", &mut next.fps, input::fps(value)?);
        }

        let now_ms = now_epoch_ms();
        let mut nvr_plan = NvrMove::default();
        let mut reassigned = false;
        if let Some(target) = input::reference(changes.nvr) {
            if target != camera.current_nvr {
                nvr_plan = self.plan_nvr_move(&camera, target.as_deref(), now_ms).await?;
                match target.as_deref() {
                    Some(nvr_id) => {
                        point_camera_at(&mut next, nvr_id, now_ms);
                        reassigned = true;
                    }
                    None => {
                        next.current_nvr = None;
                        next.assigned_date_ms = None;
                    }
                }
                log.reference("nvr", camera.current_nvr.as_deref(), target.as_deref());
            }
        }

        let mut project_plan = ProjectMove::default();
        if let Some(target) = input::reference(changes.project) {
            if target != camera.current_project {
                project_plan = self
                    .plan_project_move(
                        Member::Camera,
                        &camera.camera_id,
                        camera.current_project.as_deref(),
                        target.as_deref(),
                        now_ms,
                    )
                    .await?;
                log.reference("project", camera.current_project.as_deref(), target.as_deref());
                next.current_project = target;
            }
        }

        if log.is_empty() {
            return Ok(camera);
        }
        next.change_log.push(log.into_entry(&actor.user_id, now_ms));
        next.updated_by = Some(actor.user_id.clone());
        next.updated_at_ms = now_ms;

        let mut saga = Saga::new(&self.stores, "update_camera");
        let result = write_updated_camera(&mut saga, &camera, next, &nvr_plan, &project_plan).await;
        let saved = saga.finish(result).await?;

        record_change_log_entry();
        if reassigned {
            record_reassignment();
        }
        info!(
            target: "vss.inventory",
            camera_id = %saved.camera_id,
            nvr_id = saved.current_nvr.as_deref().unwrap_or("-"),
            actor = %actor.user_id,
            "camera_updated"
        );
        Ok(saved)
    }

    /// 删除摄像头，并从其 NVR 与项目的成员列表中移除。
    pub async fn delete_camera(&self, camera_id: &str, actor: &UserContext) -> Result<(), InventoryError> {
        let camera = self.load_camera(camera_id).await?;
        let now_ms = now_epoch_ms();
        let nvr_plan = self.plan_nvr_move(&camera, None, now_ms).await?;
        let project_plan = self
            .plan_project_move(
                Member::Camera,
                &camera.camera_id,
                camera.current_project.as_deref(),
                None,
                now_ms,
            )
            .await?;

        let mut saga = Saga::new(&self.stores, "delete_camera");
        let result = remove_camera(&mut saga, &camera.camera_id, &nvr_plan, &project_plan).await;
        saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            camera_id = %camera.camera_id,
            actor = %actor.user_id,
            "camera_deleted"
        );
        Ok(())
    }

    /// MAC 与序列号唯一性预检，`camera_id` 为自身时不算冲突。
    async fn ensure_unique_identity(
        &self,
        camera_id: &str,
        mac_address: Option<&str>,
        serial_number: Option<&str>,
    ) -> Result<(), InventoryError> {
        if let Some(mac_address) = mac_address {
            let existing = self.stores.cameras.find_camera_by_mac(mac_address).await?;
            if existing.is_some_and(|other| other.camera_id != camera_id) {
                return Err(InventoryError::DuplicateKey("macAddress".to_string()));
            }
        }
        if let Some(serial_number) = serial_number {
            let existing = self
                .stores
                .cameras
                .find_camera_by_serial(serial_number)
                .await?;
            if existing.is_some_and(|other| other.camera_id != camera_id) {
                return Err(InventoryError::DuplicateKey("serialNumber".to_string()));
            }
        }
        Ok(())
    }
}

async fn write_new_camera(
    saga: &mut Saga<'_>,
    record: CameraRecord,
    nvr_plan: &NvrMove,
    project_plan: &ProjectMove,
) -> Result<CameraRecord, InventoryError> {
    let created = saga.create_camera(record).await?;
    nvr_plan.write_target(saga).await?;
    project_plan.write_joined(saga).await?;
    Ok(created)
}

async fn write_updated_camera(
    saga: &mut Saga<'_>,
    before: &CameraRecord,
    after: CameraRecord,
    nvr_plan: &NvrMove,
    project_plan: &ProjectMove,
) -> Result<CameraRecord, InventoryError> {
    nvr_plan.write_target(saga).await?;
    project_plan.write_joined(saga).await?;
    let saved = saga.replace_camera(before, after).await?;
    nvr_plan.write_previous(saga).await?;
    project_plan.write_left(saga).await?;
    Ok(saved)
}

async fn remove_camera(
    saga: &mut Saga<'_>,
    camera_id: &str,
    nvr_plan: &NvrMove,
    project_plan: &ProjectMove,
) -> Result<(), InventoryError> {
    nvr_plan.write_previous(saga).await?;
    project_plan.write_left(saga).await?;
    saga.delete_camera(camera_id).await
}
