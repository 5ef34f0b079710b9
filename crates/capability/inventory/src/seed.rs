//! 演示数据：20 台摄像头。

use crate::input::NewCamera;
use crate::{InventoryError, InventoryService};
use domain::UserContext;
use tracing::info;

pub const DEMO_CAMERA_COUNT: usize = 20;

/// 生成演示摄像头输入，每 5 台共用一个位置。
pub fn demo_cameras() -> Vec<NewCamera> {
    (1..=DEMO_CAMERA_COUNT)
        .map(|index| NewCamera {
            name: format!("Camera {index}"),
            model: format!("Model X{index}"),
            ip_address: format!("192.168.1.{}", 100 + index),
            location: format!("Location {}", index.div_ceil(5)),
            mac_address: format!("00:14:22:01:23:{index:02}"),
            serial_number: format!("SN{}", 1000 + index),
            firmware: Some(format!("v1.0.{index}")),
            resolution: Some("1920x1080".to_string()),
            fps: Some(30),
            ..NewCamera::default()
        })
        .collect()
}

impl InventoryService {
    /// 写入演示摄像头，已存在（MAC/序列号冲突）的跳过；返回新建数量。
    pub async fn seed_demo_cameras(&self, actor: &UserContext) -> Result<usize, InventoryError> {
        let mut created = 0;
        for camera in demo_cameras() {
            match self.create_camera(camera, actor).await {
                Ok(_) => created += 1,
                Err(InventoryError::DuplicateKey(_)) => {}
                Err(err) => return Err(err),
            }
        }
        info!(target: "vss.inventory", created, "demo_cameras_seeded");
        Ok(created)
    }
}
