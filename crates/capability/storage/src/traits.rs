//! 存储接口 Trait 定义
//!
//! - UserStore：用户存储
//! - CameraStore：摄像头存储
//! - NvrStore：NVR 存储
//! - ProjectStore：项目存储
//!
//! 设计原则：
//! - 写入以整条记录替换（`replace_*`）为原语，跨实体一致性在 inventory 层维护
//! - 唯一字段冲突返回 `StorageError::duplicate`
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{CameraRecord, NvrRecord, ProjectRecord, UserRecord};
use async_trait::async_trait;

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 批量查找（用于引用展开），不存在的 ID 被忽略
    async fn find_users(&self, user_ids: &[String]) -> Result<Vec<UserRecord>, StorageError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// 创建用户，邮箱重复返回 duplicate
    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    /// 更新口令哈希（登录时升级遗留口令）
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError>;
}

/// 摄像头存储接口
#[async_trait]
pub trait CameraStore: Send + Sync {
    async fn list_cameras(&self) -> Result<Vec<CameraRecord>, StorageError>;

    async fn find_camera(&self, camera_id: &str) -> Result<Option<CameraRecord>, StorageError>;

    async fn find_cameras(&self, camera_ids: &[String]) -> Result<Vec<CameraRecord>, StorageError>;

    async fn find_camera_by_ip(&self, ip_address: &str)
    -> Result<Option<CameraRecord>, StorageError>;

    async fn find_camera_by_mac(
        &self,
        mac_address: &str,
    ) -> Result<Option<CameraRecord>, StorageError>;

    async fn find_camera_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<CameraRecord>, StorageError>;

    /// 创建摄像头，MAC/序列号重复返回 duplicate
    async fn create_camera(&self, record: CameraRecord) -> Result<CameraRecord, StorageError>;

    /// 整条替换，记录不存在返回 None
    async fn replace_camera(
        &self,
        record: CameraRecord,
    ) -> Result<Option<CameraRecord>, StorageError>;

    async fn delete_camera(&self, camera_id: &str) -> Result<bool, StorageError>;
}

/// NVR 存储接口
#[async_trait]
pub trait NvrStore: Send + Sync {
    async fn list_nvrs(&self) -> Result<Vec<NvrRecord>, StorageError>;

    async fn find_nvr(&self, nvr_id: &str) -> Result<Option<NvrRecord>, StorageError>;

    async fn find_nvrs(&self, nvr_ids: &[String]) -> Result<Vec<NvrRecord>, StorageError>;

    /// 创建 NVR，IP/MAC 重复返回 duplicate
    async fn create_nvr(&self, record: NvrRecord) -> Result<NvrRecord, StorageError>;

    async fn replace_nvr(&self, record: NvrRecord) -> Result<Option<NvrRecord>, StorageError>;

    async fn delete_nvr(&self, nvr_id: &str) -> Result<bool, StorageError>;
}

/// 项目存储接口
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StorageError>;

    async fn find_project(&self, project_id: &str) -> Result<Option<ProjectRecord>, StorageError>;

    async fn find_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<ProjectRecord>, StorageError>;

    /// 创建项目，名称重复返回 duplicate
    async fn create_project(&self, record: ProjectRecord) -> Result<ProjectRecord, StorageError>;

    async fn replace_project(
        &self,
        record: ProjectRecord,
    ) -> Result<Option<ProjectRecord>, StorageError>;

    async fn delete_project(&self, project_id: &str) -> Result<bool, StorageError>;
}
