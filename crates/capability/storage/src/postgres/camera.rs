//! Postgres 摄像头存储实现
//!
//! 重分配历史与变更日志存为 jsonb，时间为 bigint 毫秒。

use crate::error::StorageError;
use crate::models::CameraRecord;
use crate::traits::CameraStore;
use domain::{ChangeLogEntry, ReassignmentEntry};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

const CAMERA_COLUMNS: &str = "camera_id, name, model, ip_address, location, mac_address, \
     serial_number, username, password, firmware, resolution, fps, current_nvr, \
     current_project, assigned_date_ms, reassignment_history, change_log, created_by, \
     updated_by, created_at_ms, updated_at_ms";

pub struct PgCameraStore {
    pub pool: PgPool,
}

impl PgCameraStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }

    async fn find_one_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        let sql = format!("select {CAMERA_COLUMNS} from cameras where {column} = $1 limit 1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(camera_from_row).transpose()
    }
}

fn camera_from_row(row: &PgRow) -> Result<CameraRecord, StorageError> {
    let history: Json<Vec<ReassignmentEntry>> = row.try_get("reassignment_history")?;
    let change_log: Json<Vec<ChangeLogEntry>> = row.try_get("change_log")?;
    Ok(CameraRecord {
        camera_id: row.try_get("camera_id")?,
        name: row.try_get("name")?,
        model: row.try_get("model")?,
        ip_address: row.try_get("ip_address")?,
        location: row.try_get("location")?,
        mac_address: row.try_get("mac_address")?,
        serial_number: row.try_get("serial_number")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        firmware: row.try_get("firmware")?,
        resolution: row.try_get("resolution")?,
        fps: row.try_get("fps")?,
        current_nvr: row.try_get("current_nvr")?,
        current_project: row.try_get("current_project")?,
        assigned_date_ms: row.try_get("assigned_date_ms")?,
        reassignment_history: history.0,
        change_log: change_log.0,
        created_by: row.try_get("created_by")?,
        updated_by: row.try_get("updated_by")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl CameraStore for PgCameraStore {
    async fn list_cameras(&self) -> Result<Vec<CameraRecord>, StorageError> {
        let sql = format!("select {CAMERA_COLUMNS} from cameras order by created_at_ms, name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(camera_from_row).collect()
    }

    async fn find_camera(&self, camera_id: &str) -> Result<Option<CameraRecord>, StorageError> {
        self.find_one_by("camera_id", camera_id).await
    }

    async fn find_cameras(&self, camera_ids: &[String]) -> Result<Vec<CameraRecord>, StorageError> {
        if camera_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("select {CAMERA_COLUMNS} from cameras where camera_id = any($1)");
        let rows = sqlx::query(&sql)
            .bind(camera_ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(camera_from_row).collect()
    }

    async fn find_camera_by_ip(
        &self,
        ip_address: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        self.find_one_by("ip_address", ip_address).await
    }

    async fn find_camera_by_mac(
        &self,
        mac_address: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        let sql =
            format!("select {CAMERA_COLUMNS} from cameras where lower(mac_address) = lower($1)");
        let row = sqlx::query(&sql)
            .bind(mac_address)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(camera_from_row).transpose()
    }

    async fn find_camera_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<CameraRecord>, StorageError> {
        self.find_one_by("serial_number", serial_number).await
    }

    async fn create_camera(&self, record: CameraRecord) -> Result<CameraRecord, StorageError> {
        sqlx::query(
            "insert into cameras (camera_id, name, model, ip_address, location, mac_address, \
             serial_number, username, password, firmware, resolution, fps, current_nvr, \
             current_project, assigned_date_ms, reassignment_history, change_log, created_by, \
             updated_by, created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21)",
        )
        .bind(&record.camera_id)
        .bind(&record.name)
        .bind(&record.model)
        .bind(&record.ip_address)
        .bind(&record.location)
        .bind(&record.mac_address)
        .bind(&record.serial_number)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.firmware)
        .bind(&record.resolution)
        .bind(record.fps)
        .bind(&record.current_nvr)
        .bind(&record.current_project)
        .bind(record.assigned_date_ms)
        .bind(Json(&record.reassignment_history))
        .bind(Json(&record.change_log))
        .bind(&record.created_by)
        .bind(&record.updated_by)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn replace_camera(
        &self,
        record: CameraRecord,
    ) -> Result<Option<CameraRecord>, StorageError> {
        let result = sqlx::query(
            "update cameras set name = $2, model = $3, ip_address = $4, location = $5, \
             mac_address = $6, serial_number = $7, username = $8, password = $9, \
             firmware = $10, resolution = $11, fps = $12, current_nvr = $13, \
             current_project = $14, assigned_date_ms = $15, reassignment_history = $16, \
             change_log = $17, created_by = $18, updated_by = $19, updated_at_ms = $20 \
             where camera_id = $1",
        )
        .bind(&record.camera_id)
        .bind(&record.name)
        .bind(&record.model)
        .bind(&record.ip_address)
        .bind(&record.location)
        .bind(&record.mac_address)
        .bind(&record.serial_number)
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.firmware)
        .bind(&record.resolution)
        .bind(record.fps)
        .bind(&record.current_nvr)
        .bind(&record.current_project)
        .bind(record.assigned_date_ms)
        .bind(Json(&record.reassignment_history))
        .bind(Json(&record.change_log))
        .bind(&record.created_by)
        .bind(&record.updated_by)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete_camera(&self, camera_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from cameras where camera_id = $1")
            .bind(camera_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
