//! Postgres 项目存储实现
//!
//! 成员列表（cameras、nvrs）存为 text[]，名称唯一索引 `projects_name_key`。

use crate::error::StorageError;
use crate::models::ProjectRecord;
use crate::traits::ProjectStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const PROJECT_COLUMNS: &str = "project_id, name, description, cameras, nvrs, created_by, \
     updated_by, created_at_ms, updated_at_ms";

pub struct PgProjectStore {
    pub pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn project_from_row(row: &PgRow) -> Result<ProjectRecord, StorageError> {
    Ok(ProjectRecord {
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        cameras: row.try_get("cameras")?,
        nvrs: row.try_get("nvrs")?,
        created_by: row.try_get("created_by")?,
        updated_by: row.try_get("updated_by")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl ProjectStore for PgProjectStore {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        let sql = format!("select {PROJECT_COLUMNS} from projects order by created_at_ms, name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn find_project(&self, project_id: &str) -> Result<Option<ProjectRecord>, StorageError> {
        let sql = format!("select {PROJECT_COLUMNS} from projects where project_id = $1");
        let row = sqlx::query(&sql)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn find_projects(
        &self,
        project_ids: &[String],
    ) -> Result<Vec<ProjectRecord>, StorageError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("select {PROJECT_COLUMNS} from projects where project_id = any($1)");
        let rows = sqlx::query(&sql)
            .bind(project_ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn create_project(&self, record: ProjectRecord) -> Result<ProjectRecord, StorageError> {
        sqlx::query(
            "insert into projects (project_id, name, description, cameras, nvrs, created_by, \
             updated_by, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&record.project_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.cameras)
        .bind(&record.nvrs)
        .bind(&record.created_by)
        .bind(&record.updated_by)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn replace_project(
        &self,
        record: ProjectRecord,
    ) -> Result<Option<ProjectRecord>, StorageError> {
        let row = sqlx::query(
            "update projects set name = $2, description = $3, cameras = $4, nvrs = $5, \
             updated_by = $6, updated_at_ms = $7 \
             where project_id = $1 \
             returning project_id, name, description, cameras, nvrs, created_by, updated_by, \
             created_at_ms, updated_at_ms",
        )
        .bind(&record.project_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.cameras)
        .bind(&record.nvrs)
        .bind(&record.updated_by)
        .bind(record.updated_at_ms)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn delete_project(&self, project_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from projects where project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
