//! Postgres NVR 存储实现
//!
//! 摄像头集合存为 text[]。

use crate::error::StorageError;
use crate::models::NvrRecord;
use crate::traits::NvrStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const NVR_COLUMNS: &str = "nvr_id, name, ip_address, mac_address, ip_address_secondary, \
     mac_address_secondary, model, max_channels, capacity, location, branch, platform, \
     username, password, cameras, project, created_at_ms, updated_at_ms";

pub struct PgNvrStore {
    pub pool: PgPool,
}

impl PgNvrStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn nvr_from_row(row: &PgRow) -> Result<NvrRecord, StorageError> {
    Ok(NvrRecord {
        nvr_id: row.try_get("nvr_id")?,
        name: row.try_get("name")?,
        ip_address: row.try_get("ip_address")?,
        mac_address: row.try_get("mac_address")?,
        ip_address_secondary: row.try_get("ip_address_secondary")?,
        mac_address_secondary: row.try_get("mac_address_secondary")?,
        model: row.try_get("model")?,
        max_channels: row.try_get("max_channels")?,
        capacity: row.try_get("capacity")?,
        location: row.try_get("location")?,
        branch: row.try_get("branch")?,
        platform: row.try_get("platform")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        cameras: row.try_get("cameras")?,
        project: row.try_get("project")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl NvrStore for PgNvrStore {
    async fn list_nvrs(&self) -> Result<Vec<NvrRecord>, StorageError> {
        let sql = format!("select {NVR_COLUMNS} from nvrs order by created_at_ms, name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(nvr_from_row).collect()
    }

    async fn find_nvr(&self, nvr_id: &str) -> Result<Option<NvrRecord>, StorageError> {
        let sql = format!("select {NVR_COLUMNS} from nvrs where nvr_id = $1");
        let row = sqlx::query(&sql)
            .bind(nvr_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(nvr_from_row).transpose()
    }

    async fn find_nvrs(&self, nvr_ids: &[String]) -> Result<Vec<NvrRecord>, StorageError> {
        if nvr_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("select {NVR_COLUMNS} from nvrs where nvr_id = any($1)");
        let rows = sqlx::query(&sql)
            .bind(nvr_ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(nvr_from_row).collect()
    }

    async fn create_nvr(&self, record: NvrRecord) -> Result<NvrRecord, StorageError> {
        sqlx::query(
            "insert into nvrs (nvr_id, name, ip_address, mac_address, ip_address_secondary, \
             mac_address_secondary, model, max_channels, capacity, location, branch, platform, \
             username, password, cameras, project, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18)",
        )
        .bind(&record.nvr_id)
        .bind(&record.name)
        .bind(&record.ip_address)
        .bind(&record.mac_address)
        .bind(&record.ip_address_secondary)
        .bind(&record.mac_address_secondary)
        .bind(&record.model)
        .bind(record.max_channels)
        .bind(record.capacity)
        .bind(&record.location)
        .bind(&record.branch)
        .bind(&record.platform)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.cameras)
        .bind(&record.project)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn replace_nvr(&self, record: NvrRecord) -> Result<Option<NvrRecord>, StorageError> {
        let result = sqlx::query(
            "update nvrs set name = $2, ip_address = $3, mac_address = $4, \
             ip_address_secondary = $5, mac_address_secondary = $6, model = $7, \
             max_channels = $8, capacity = $9, location = $10, branch = $11, platform = $12, \
             username = $13, password = $14, cameras = $15, project = $16, updated_at_ms = $17 \
             where nvr_id = $1",
        )
        .bind(&record.nvr_id)
        .bind(&record.name)
        .bind(&record.ip_address)
        .bind(&record.mac_address)
        .bind(&record.ip_address_secondary)
        .bind(&record.mac_address_secondary)
        .bind(&record.model)
        .bind(record.max_channels)
        .bind(record.capacity)
        .bind(&record.location)
        .bind(&record.branch)
        .bind(&record.platform)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.cameras)
        .bind(&record.project)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete_nvr(&self, nvr_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from nvrs where nvr_id = $1")
            .bind(nvr_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
