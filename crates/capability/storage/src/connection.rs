//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池（最大连接数 8）
//! - run_migrations：执行内嵌迁移（migrations/）

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

static MIGRATIONS: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// 建立 Postgres 连接池
///
/// # 参数
/// - `database_url`：Postgres 连接字符串
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// 执行未应用的迁移
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    MIGRATIONS
        .run(pool)
        .await
        .map_err(|err| StorageError::new(format!("migration failed: {err}")))
}
