//! 数据模型
//!
//! 存储层记录结构：
//! - UserRecord：用户（口令为 argon2 哈希，遗留数据可能为明文）
//! - CameraRecord：摄像头（含 NVR/项目反向引用、重分配历史、变更日志）
//! - NvrRecord：录像机（含摄像头集合、所属项目）
//! - ProjectRecord：项目（含摄像头/NVR 成员列表）
//!
//! 时间统一为毫秒时间戳。引用字段保存对方 ID，一致性由 inventory 能力维护。

use domain::{ChangeLogEntry, ReassignmentEntry, Role, UserContext};

/// 用户记录。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at_ms: i64,
}

impl UserRecord {
    /// 将用户记录转换为 UserContext。
    pub fn to_user_context(&self) -> UserContext {
        UserContext::new(self.user_id.clone(), self.name.clone(), self.role)
    }
}

/// 摄像头记录。
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRecord {
    pub camera_id: String,
    pub name: String,
    pub model: String,
    pub ip_address: String,
    pub location: String,
    pub mac_address: String,
    pub serial_number: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub firmware: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<i32>,
    pub current_nvr: Option<String>,
    pub current_project: Option<String>,
    pub assigned_date_ms: Option<i64>,
    pub reassignment_history: Vec<ReassignmentEntry>,
    pub change_log: Vec<ChangeLogEntry>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// NVR 记录。
///
/// 已占用通道数不单独存储，等于 `cameras.len()`。
#[derive(Debug, Clone, PartialEq)]
pub struct NvrRecord {
    pub nvr_id: String,
    pub name: String,
    pub ip_address: String,
    pub mac_address: String,
    pub ip_address_secondary: Option<String>,
    pub mac_address_secondary: Option<String>,
    pub model: String,
    pub max_channels: i32,
    pub capacity: i64,
    pub location: String,
    pub branch: String,
    pub platform: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub cameras: Vec<String>,
    pub project: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl NvrRecord {
    pub fn channels_occupied(&self) -> i32 {
        i32::try_from(self.cameras.len()).unwrap_or(i32::MAX)
    }

    pub fn has_free_channel(&self) -> bool {
        self.channels_occupied() < self.max_channels
    }
}

/// 项目记录。
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub cameras: Vec<String>,
    pub nvrs: Vec<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
