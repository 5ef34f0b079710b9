//! 写操作输入与字段校验。
//!
//! 更新输入中 `None` 表示不修改；`nvr`/`project` 为 `Some(None)` 表示解除关联。
//! 可选文本字段传入空串视为清空。

use crate::InventoryError;
use domain::is_valid_mac;

/// 帧率上限。
pub const MAX_FPS: i32 = 240;

#[derive(Debug, Clone, Default)]
pub struct NewCamera {
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

#[derive(Debug, Clone, Default)]
pub struct CameraChanges {
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
    pub nvr: Option<Option<String>>,
    pub project: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewNvr {
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

#[derive(Debug, Clone, Default)]
pub struct NvrChanges {
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
    pub project: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub(crate) fn required(field: &str, value: &str) -> Result<String, InventoryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InventoryError::Validation(format!("{field} required")));
    }
    Ok(value.to_string())
}

pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 关联引用：`Some(None)`/空串统一为解除关联。
pub(crate) fn reference(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(|inner| optional(inner.as_deref()))
}

pub(crate) fn mac(field: &str, value: &str) -> Result<String, InventoryError> {
    let value = required(field, value)?;
    if !is_valid_mac(&value) {
        return Err(InventoryError::Validation(format!("{field} format invalid")));
    }
    Ok(value)
}

pub(crate) fn optional_mac(field: &str, value: Option<&str>) -> Result<Option<String>, InventoryError> {
    optional(value).map(|value| mac(field, &value)).transpose()
}

pub(crate) fn fps(value: i32) -> Result<i32, InventoryError> {
    if !(1..=MAX_FPS).contains(&value) {
        return Err(InventoryError::Validation(format!(
            "fps must be between 1 and {MAX_FPS}"
        )));
    }
    Ok(value)
}

pub(crate) fn max_channels(value: i32) -> Result<i32, InventoryError> {
    if value < 1 {
        return Err(InventoryError::Validation(
            "maxChannels must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

pub(crate) fn capacity(value: i64) -> Result<i64, InventoryError> {
    if value < 0 {
        return Err(InventoryError::Validation(
            "capacity must not be negative".to_string(),
        ));
    }
    Ok(value)
}
