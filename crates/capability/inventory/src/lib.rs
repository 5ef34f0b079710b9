//! 库存能力：摄像头、NVR、项目的一致性维护。
//!
//! - 重分配引擎：摄像头 ↔ NVR 双向引用、容量校验、重分配历史（上限 10 条）
//! - 项目成员：摄像头/NVR 的项目迁移
//! - 变更日志：摄像头字段级审计
//! - 批量导入：CSV 逐行创建摄像头
//!
//! 存储没有跨记录事务，多记录写入按固定顺序执行，失败时按快照逆序补偿。

mod audit;
mod cameras;
mod engine;
mod error;
mod import;
mod input;
mod nvrs;
mod projects;
mod saga;
mod seed;
mod views;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use vss_storage::{CameraStore, NvrStore, ProjectStore, UserStore};

pub use error::InventoryError;
pub use import::{ImportReport, REQUIRED_COLUMNS, SkippedRow};
pub use input::{
    CameraChanges, MAX_FPS, NewCamera, NewNvr, NewProject, NvrChanges, ProjectChanges,
};
pub use seed::{DEMO_CAMERA_COUNT, demo_cameras};
pub use views::{CameraView, HistoryItem, HistoryView, NvrView, ProjectView, RefSummary};

/// 库存服务依赖的存储集合。
#[derive(Clone)]
pub struct InventoryStores {
    pub cameras: Arc<dyn CameraStore>,
    pub nvrs: Arc<dyn NvrStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub users: Arc<dyn UserStore>,
}

/// 库存服务。
pub struct InventoryService {
    stores: InventoryStores,
}

impl InventoryService {
    pub fn new(stores: InventoryStores) -> Self {
        Self { stores }
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
