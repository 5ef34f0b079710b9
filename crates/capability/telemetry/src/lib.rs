//! 追踪、请求 ID 与库存计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cameras_created: u64,
    pub reassignments: u64,
    pub reassignments_rejected: u64,
    pub change_log_entries: u64,
    pub import_rows_imported: u64,
    pub import_rows_skipped: u64,
    pub compensations: u64,
    pub compensation_failures: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    cameras_created: AtomicU64,
    reassignments: AtomicU64,
    reassignments_rejected: AtomicU64,
    change_log_entries: AtomicU64,
    import_rows_imported: AtomicU64,
    import_rows_skipped: AtomicU64,
    compensations: AtomicU64,
    compensation_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            cameras_created: AtomicU64::new(0),
            reassignments: AtomicU64::new(0),
            reassignments_rejected: AtomicU64::new(0),
            change_log_entries: AtomicU64::new(0),
            import_rows_imported: AtomicU64::new(0),
            import_rows_skipped: AtomicU64::new(0),
            compensations: AtomicU64::new(0),
            compensation_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cameras_created: self.cameras_created.load(Ordering::Relaxed),
            reassignments: self.reassignments.load(Ordering::Relaxed),
            reassignments_rejected: self.reassignments_rejected.load(Ordering::Relaxed),
            change_log_entries: self.change_log_entries.load(Ordering::Relaxed),
            import_rows_imported: self.import_rows_imported.load(Ordering::Relaxed),
            import_rows_skipped: self.import_rows_skipped.load(Ordering::Relaxed),
            compensations: self.compensations.load(Ordering::Relaxed),
            compensation_failures: self.compensation_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

pub fn record_camera_created() {
    metrics().cameras_created.fetch_add(1, Ordering::Relaxed);
}

/// 记录成功的 NVR 分配（含创建时分配与更新时改派）。
pub fn record_reassignment() {
    metrics().reassignments.fetch_add(1, Ordering::Relaxed);
}

/// 记录被拒绝的分配（容量已满、重复分配）。
pub fn record_reassignment_rejected() {
    metrics()
        .reassignments_rejected
        .fetch_add(1, Ordering::Relaxed);
}

pub fn record_change_log_entry() {
    metrics().change_log_entries.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次导入的行统计。
pub fn record_import(imported: u64, skipped: u64) {
    let metrics = metrics();
    metrics
        .import_rows_imported
        .fetch_add(imported, Ordering::Relaxed);
    metrics
        .import_rows_skipped
        .fetch_add(skipped, Ordering::Relaxed);
}

/// 记录多实体写入失败后的补偿（回滚）次数。
pub fn record_compensation() {
    metrics().compensations.fetch_add(1, Ordering::Relaxed);
}

/// 记录补偿自身失败（数据可能不一致，需人工核对）。
pub fn record_compensation_failure() {
    metrics()
        .compensation_failures
        .fetch_add(1, Ordering::Relaxed);
}
