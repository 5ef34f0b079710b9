//! 摄像头批量导入（CSV）。
//!
//! 表头必须包含全部必需列，缺列时整批失败；逐行处理：
//! - 缺少 MAC 或序列号、IP 已存在（含本批已导入的行）、创建校验失败：跳过并计数
//! - 存储错误：中止整批
//!
//! 一行也没有导入时返回 EmptyImport。

use crate::input::NewCamera;
use crate::{InventoryError, InventoryService};
use domain::UserContext;
use std::collections::HashSet;
use tracing::{info, warn};
use vss_storage::CameraRecord;
use vss_telemetry::record_import;

/// 必需列（区分大小写）。
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "name",
    "model",
    "ipAddress",
    "location",
    "macAddress",
    "serialNumber",
    "firmware",
    "resolution",
    "fps",
];

/// 被跳过的行。
#[derive(Debug, Clone)]
pub struct SkippedRow {
    /// 源文件行号（表头为第 1 行）。
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub cameras: Vec<CameraRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// 必需列在表头中的位置。
struct Columns([usize; REQUIRED_COLUMNS.len()]);

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, InventoryError> {
        let mut positions = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|header| header == column) {
                Some(position) => *slot = position,
                None => missing.push(column),
            }
        }
        if !missing.is_empty() {
            return Err(InventoryError::InvalidFormat(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }
        Ok(Self(positions))
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, column: usize) -> &'r str {
        record.get(self.0[column]).unwrap_or_default()
    }

    fn to_camera(&self, record: &csv::StringRecord) -> Result<NewCamera, InventoryError> {
        let optional = |column: usize| {
            let value = self.field(record, column);
            (!value.is_empty()).then(|| value.to_string())
        };
        let fps = match self.field(record, 8) {
            "" => None,
            value => Some(value.parse::<i32>().map_err(|_| {
                InventoryError::Validation(format!("fps '{value}' is not a number"))
            })?),
        };
        Ok(NewCamera {
            name: self.field(record, 0).to_string(),
            model: self.field(record, 1).to_string(),
            ip_address: self.field(record, 2).to_string(),
            location: self.field(record, 3).to_string(),
            mac_address: self.field(record, 4).to_string(),
            serial_number: self.field(record, 5).to_string(),
            firmware: optional(6),
            resolution: optional(7),
            fps,
            ..NewCamera::default()
        })
    }
}

/// 无法解码的行（非 UTF-8 等）按跳过处理。
fn unreadable_row(err: &csv::Error) -> SkippedRow {
    let reason = match err.kind() {
        csv::ErrorKind::Utf8 { .. } => "row is not valid UTF-8".to_string(),
        _ => err.to_string(),
    };
    SkippedRow {
        line: err.position().map(|position| position.line()).unwrap_or_default(),
        reason,
    }
}

impl InventoryService {
    /// 从 CSV 数据批量创建摄像头。
    pub async fn import_cameras(
        &self,
        data: &[u8],
        actor: &UserContext,
    ) -> Result<ImportReport, InventoryError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data);
        let headers = reader
            .headers()
            .map_err(|err| InventoryError::InvalidFormat(err.to_string()))?
            .clone();
        let columns = Columns::resolve(&headers)?;

        let mut report = ImportReport::default();
        let mut seen_ips = HashSet::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    report.skipped.push(unreadable_row(&err));
                    continue;
                }
            };
            let line = record.position().map(|position| position.line()).unwrap_or_default();
            match self.import_row(&columns, &record, &seen_ips, actor).await {
                Ok(camera) => {
                    seen_ips.insert(camera.ip_address.clone());
                    report.cameras.push(camera);
                }
                Err(InventoryError::Storage(message)) => {
                    warn!(target: "vss.inventory", line, error = %message, "import_aborted");
                    return Err(InventoryError::Storage(message));
                }
                Err(err) => report.skipped.push(SkippedRow {
                    line,
                    reason: err.to_string(),
                }),
            }
        }

        record_import(report.imported_count() as u64, report.skipped_count() as u64);
        info!(
            target: "vss.inventory",
            imported = report.imported_count(),
            skipped = report.skipped_count(),
            actor = %actor.user_id,
            "import_finished"
        );
        if report.cameras.is_empty() {
            return Err(InventoryError::EmptyImport);
        }
        Ok(report)
    }

    async fn import_row(
        &self,
        columns: &Columns,
        record: &csv::StringRecord,
        seen_ips: &HashSet<String>,
        actor: &UserContext,
    ) -> Result<CameraRecord, InventoryError> {
        let camera = columns.to_camera(record)?;
        if camera.mac_address.is_empty() || camera.serial_number.is_empty() {
            return Err(InventoryError::Validation(
                "macAddress and serialNumber required".to_string(),
            ));
        }
        if seen_ips.contains(&camera.ip_address)
            || self
                .stores
                .cameras
                .find_camera_by_ip(&camera.ip_address)
                .await?
                .is_some()
        {
            return Err(InventoryError::Conflict(format!(
                "camera with ipAddress {} already exists",
                camera.ip_address
            )));
        }
        self.create_camera(camera, actor).await
    }
}
