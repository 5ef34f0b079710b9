//! 稳定的 DTO 与 API 响应契约。
//!
//! JSON 字段统一 camelCase；时间为毫秒时间戳。
//! 创建请求的必填字段缺省为空串，由服务层统一返回校验错误。

use serde::{Deserialize, Deserializer, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 区分字段缺省与显式 `null`：缺省为 `None`，`null` 为 `Some(None)`。
///
/// 需配合 `#[serde(default, deserialize_with = "nullable")]` 使用。
pub fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// 过期时间（Unix 毫秒时间戳）。
    pub expires: u64,
    pub user: UserDto,
}

/// 注册请求体；`role` 缺省为 junior。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub token: String,
    pub expires: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: i64,
}

/// 引用摘要。
#[derive(Debug, Serialize)]
pub struct RefDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentEntryDto {
    pub nvr: String,
    pub date: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogEntryDto {
    pub actor: String,
    pub date: i64,
    pub changes: String,
}

/// 摄像头返回结构（不含口令）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDto {
    pub id: String,
    pub name: String,
    pub model: String,
    pub ip_address: String,
    pub location: String,
    pub mac_address: String,
    pub serial_number: String,
    pub username: Option<String>,
    pub firmware: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<i32>,
    pub current_nvr: Option<RefDto>,
    pub current_project: Option<RefDto>,
    pub assigned_date: Option<i64>,
    pub reassignment_history: Vec<ReassignmentEntryDto>,
    pub change_log: Vec<ChangeLogEntryDto>,
    pub created_by: Option<RefDto>,
    pub updated_by: Option<RefDto>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCameraRequest {
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
    pub nvr: Option<String>,
    pub project: Option<String>,
}

/// 摄像头更新请求体；`nvr`/`project` 为 `null` 表示解除关联。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCameraRequest {
    pub name: Option<String>,
    pub model: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub firmware: Option<String>,
    pub resolution: Option<String>,
    pub fps: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub nvr: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub project: Option<Option<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryNvrDto {
    pub id: String,
    pub name: String,
    pub max_channels: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub nvr: HistoryNvrDto,
    pub date: i64,
}

/// 摄像头重分配历史。
#[derive(Debug, Serialize)]
pub struct CameraHistoryDto {
    pub message: String,
    pub history: Vec<HistoryEntryDto>,
}

/// NVR 返回结构（不含口令）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvrDto {
    pub id: String,
    pub name: String,
    pub ip_address: String,
    pub mac_address: String,
    pub ip_address_secondary: Option<String>,
    pub mac_address_secondary: Option<String>,
    pub model: String,
    pub max_channels: i32,
    pub channels_occupied: i32,
    pub capacity: i64,
    pub location: String,
    pub branch: String,
    pub platform: Option<String>,
    pub username: Option<String>,
    pub cameras: Vec<RefDto>,
    pub project: Option<RefDto>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateNvrRequest {
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
    pub project: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNvrRequest {
    pub name: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub ip_address_secondary: Option<String>,
    pub mac_address_secondary: Option<String>,
    pub model: Option<String>,
    pub max_channels: Option<i32>,
    pub capacity: Option<i64>,
    pub location: Option<String>,
    pub branch: Option<String>,
    pub platform: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub project: Option<Option<String>>,
}

/// 项目返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub cameras: Vec<RefDto>,
    pub nvrs: Vec<RefDto>,
    pub created_by: Option<RefDto>,
    pub updated_by: Option<RefDto>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// 项目创建请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

/// 项目更新请求体。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddCameraToProjectRequest {
    pub project_id: String,
    pub camera_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddNvrToProjectRequest {
    pub project_id: String,
    pub nvr_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRowDto {
    pub line: u64,
    pub reason: String,
}

/// 批量导入结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultDto {
    pub imported_count: usize,
    pub skipped_count: usize,
    pub cameras: Vec<CameraDto>,
    pub skipped: Vec<SkippedRowDto>,
}

/// 库存计数指标快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub cameras_created: u64,
    pub reassignments: u64,
    pub reassignments_rejected: u64,
    pub change_log_entries: u64,
    pub import_rows_imported: u64,
    pub import_rows_skipped: u64,
    pub compensations: u64,
    pub compensation_failures: u64,
}
