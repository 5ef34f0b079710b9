//! 存储层错误类型
//!
//! 统一封装底层错误：
//! - 唯一约束冲突（Duplicate，携带冲突字段名）
//! - SQL 执行与连接错误、锁错误（Internal）

/// 错误类别。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageErrorKind {
    Internal,
    Duplicate(String),
}

#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: StorageErrorKind::Internal,
            message: message.into(),
        }
    }

    /// 唯一字段冲突。
    pub fn duplicate(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            message: format!("duplicate value for {field}"),
            kind: StorageErrorKind::Duplicate(field),
        }
    }

    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }

    /// 冲突字段名（仅 Duplicate）。
    pub fn duplicate_field(&self) -> Option<&str> {
        match &self.kind {
            StorageErrorKind::Duplicate(field) => Some(field),
            StorageErrorKind::Internal => None,
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = db_err
                    .constraint()
                    .map(field_for_constraint)
                    .unwrap_or("unique key");
                return Self::duplicate(field);
            }
        }
        Self::new(err.to_string())
    }
}

/// 唯一索引名到 API 字段名（见 migrations/0001_init.sql）。
fn field_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        "users_email_key" => "email",
        "projects_name_key" => "name",
        "nvrs_ip_address_key" => "ipAddress",
        "nvrs_mac_address_key" => "macAddress",
        "cameras_mac_address_key" => "macAddress",
        "cameras_serial_number_key" => "serialNumber",
        _ => "unique key",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_carries_field() {
        let err = StorageError::duplicate("macAddress");
        assert_eq!(err.duplicate_field(), Some("macAddress"));
        assert_eq!(err.to_string(), "duplicate value for macAddress");
        assert_eq!(StorageError::new("lock failed").duplicate_field(), None);
    }

    #[test]
    fn unknown_constraint_falls_back() {
        assert_eq!(field_for_constraint("cameras_serial_number_key"), "serialNumber");
        assert_eq!(field_for_constraint("other_idx"), "unique key");
    }
}
