//! 用户内存存储实现
//!
//! 用于本地演示和测试。
//!
//! 功能：
//! - 可选内置 admin 账户（admin@example.com / admin123，明文遗留口令，首次登录升级）
//! - 邮箱唯一

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::Role;
use std::collections::HashMap;
use std::sync::RwLock;

pub const DEFAULT_ADMIN_ID: &str = "00000000-0000-4000-8000-000000000001";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// 用户内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，键为 user_id。
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// 内置 admin 账户
    pub fn with_default_admin() -> Self {
        let mut users = HashMap::new();
        users.insert(
            DEFAULT_ADMIN_ID.to_string(),
            UserRecord {
                user_id: DEFAULT_ADMIN_ID.to_string(),
                name: "Administrator".to_string(),
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password: "admin123".to_string(),
                role: Role::Admin,
                created_at_ms: 0,
            },
        );
        Self {
            users: RwLock::new(users),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(user_id).cloned())
    }

    async fn find_users(&self, user_ids: &[String]) -> Result<Vec<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(user_ids
            .iter()
            .filter_map(|user_id| map.get(user_id).cloned())
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut users: Vec<UserRecord> = map.values().cloned().collect();
        users.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then(a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.user_id) {
            return Err(StorageError::new("user exists"));
        }
        if map
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(&record.email))
        {
            return Err(StorageError::duplicate("email"));
        }
        map.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(user) = map.get_mut(user_id) else {
            return Ok(false);
        };
        user.password = password_hash.to_string();
        Ok(true)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(user_id).is_some())
    }
}
