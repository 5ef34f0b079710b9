//! Postgres 用户存储实现
//!
//! 设计要点：
//! - 邮箱唯一索引 `users_email_key`，按小写比较
//! - 角色以文本存储（admin/junior/readonly）

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::traits::UserStore;
use domain::Role;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, created_at_ms";

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|err| StorageError::new(err.to_string()))?;
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password_hash")?,
        role,
        created_at_ms: row.try_get("created_at_ms")?,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where lower(email) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_users(&self, user_ids: &[String]) -> Result<Vec<UserRecord>, StorageError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("select {USER_COLUMNS} from users where user_id = any($1)");
        let rows = sqlx::query(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users order by created_at_ms, email");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        sqlx::query(
            "insert into users (user_id, name, email, password_hash, role, created_at_ms) \
             values ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.user_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password)
        .bind(record.role.as_str())
        .bind(record.created_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set password_hash = $1 where user_id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from users where user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
