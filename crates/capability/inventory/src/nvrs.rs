//! NVR 写操作。

use crate::engine::{Member, ProjectMove, write_nvr_with_project_move};
use crate::input::{self, NewNvr, NvrChanges};
use crate::saga::Saga;
use crate::{InventoryError, InventoryService, now_epoch_ms};
use domain::UserContext;
use tracing::info;
use vss_storage::NvrRecord;

impl InventoryService {
    /// 创建 NVR，给定项目时同时加入项目。
    pub async fn create_nvr(&self, input: NewNvr, actor: &UserContext) -> Result<NvrRecord, InventoryError> {
        let now_ms = now_epoch_ms();
        let record = NvrRecord {
            nvr_id: uuid::Uuid::new_v4().to_string(),
            name: input::required("name", &input.name)?,
            ip_address: input::required("ipAddress", &input.ip_address)?,
            mac_address: input::mac("macAddress", &input.mac_address)?,
            ip_address_secondary: input::optional(input.ip_address_secondary.as_deref()),
            mac_address_secondary: input::optional_mac(
                "macAddressSecondary",
                input.mac_address_secondary.as_deref(),
            )?,
            model: input::required("model", &input.model)?,
            max_channels: input::max_channels(input.max_channels)?,
            capacity: input::capacity(input.capacity)?,
            location: input::required("location", &input.location)?,
            branch: input::required("branch", &input.branch)?,
            platform: input::optional(input.platform.as_deref()),
            username: input::optional(input.username.as_deref()),
            password: input::optional(input.password.as_deref()),
            cameras: Vec::new(),
            project: input::optional(input.project.as_deref()),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        let plan = self
            .plan_project_move(Member::Nvr, &record.nvr_id, None, record.project.as_deref(), now_ms)
            .await?;

        let mut saga = Saga::new(&self.stores, "create_nvr");
        let result = async {
            let created = saga.create_nvr(record).await?;
            plan.write_joined(&mut saga).await?;
            Ok::<_, InventoryError>(created)
        }
        .await;
        let created = saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            nvr_id = %created.nvr_id,
            max_channels = created.max_channels,
            actor = %actor.user_id,
            "nvr_created"
        );
        Ok(created)
    }

    /// 更新 NVR；`max_channels` 不得低于当前已占用通道数。
    pub async fn update_nvr(
        &self,
        nvr_id: &str,
        changes: NvrChanges,
        actor: &UserContext,
    ) -> Result<NvrRecord, InventoryError> {
        let nvr = self.load_nvr(nvr_id).await?;
        let mut next = nvr.clone();
        if let Some(value) = changes.name.as_deref() {
            next.name = input::required("name", value)?;
        }
        if let Some(value) = changes.ip_address.as_deref() {
            next.ip_address = input::required("ipAddress", value)?;
        }
        if let Some(value) = changes.mac_address.as_deref() {
            next.mac_address = input::mac("macAddress", value)?;
        }
        if let Some(value) = changes.ip_address_secondary.as_deref() {
            next.ip_address_secondary = input::optional(Some(value));
        }
        if let Some(value) = changes.mac_address_secondary.as_deref() {
            next.mac_address_secondary = input::optional_mac("macAddressSecondary", Some(value))?;
        }
        if let Some(value) = changes.model.as_deref() {
            next.model = input::required("model", value)?;
        }
        if let Some(value) = changes.max_channels {
            let value = input::max_channels(value)?;
            if value < nvr.channels_occupied() {
                return Err(InventoryError::Validation(format!(
                    "maxChannels cannot be lower than occupied channels ({})",
                    nvr.channels_occupied()
                )));
            }
            next.max_channels = value;
        }
        if let Some(value) = changes.capacity {
            next.capacity = input::capacity(value)?;
        }
        if let Some(value) = changes.location.as_deref() {
            next.location = input::required("location", value)?;
        }
        if let Some(value) = changes.branch.as_deref() {
            next.branch = input::required("branch", value)?;
        }
        if let Some(value) = changes.platform.as_deref() {
            next.platform = input::optional(Some(value));
        }
        if let Some(value) = changes.username.as_deref() {
            next.username = input::optional(Some(value));
        }
        if let Some(value) = changes.password.as_deref() {
            next.password = input::optional(Some(value));
        }

        let now_ms = now_epoch_ms();
        let mut plan = ProjectMove::default();
        if let Some(target) = input::reference(changes.project) {
            if target != nvr.project {
                plan = self
                    .plan_project_move(
                        Member::Nvr,
                        &nvr.nvr_id,
                        nvr.project.as_deref(),
                        target.as_deref(),
                        now_ms,
                    )
                    .await?;
                next.project = target;
            }
        }
        if next == nvr {
            return Ok(nvr);
        }
        next.updated_at_ms = now_ms;

        let mut saga = Saga::new(&self.stores, "update_nvr");
        let result = write_nvr_with_project_move(&mut saga, &plan, &nvr, next).await;
        let saved = saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            nvr_id = %saved.nvr_id,
            actor = %actor.user_id,
            "nvr_updated"
        );
        Ok(saved)
    }

    /// 删除 NVR；仍挂有摄像头时返回 Conflict。
    pub async fn delete_nvr(&self, nvr_id: &str, actor: &UserContext) -> Result<(), InventoryError> {
        let nvr = self.load_nvr(nvr_id).await?;
        if !nvr.cameras.is_empty() {
            return Err(InventoryError::Conflict(format!(
                "nvr still has {} assigned cameras",
                nvr.cameras.len()
            )));
        }
        let plan = self
            .plan_project_move(
                Member::Nvr,
                &nvr.nvr_id,
                nvr.project.as_deref(),
                None,
                now_epoch_ms(),
            )
            .await?;

        let mut saga = Saga::new(&self.stores, "delete_nvr");
        let result = async {
            plan.write_left(&mut saga).await?;
            saga.delete_nvr(&nvr.nvr_id).await
        }
        .await;
        saga.finish(result).await?;
        info!(
            target: "vss.inventory",
            nvr_id = %nvr.nvr_id,
            actor = %actor.user_id,
            "nvr_deleted"
        );
        Ok(())
    }
}
