//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub devices_stored: u64,
    pub locations_stored: u64,
    pub ingest_rejected: u64,
    pub store_failures: u64,
    pub device_lists_served: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    devices_stored: AtomicU64,
    locations_stored: AtomicU64,
    ingest_rejected: AtomicU64,
    store_failures: AtomicU64,
    device_lists_served: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            devices_stored: AtomicU64::new(0),
            locations_stored: AtomicU64::new(0),
            ingest_rejected: AtomicU64::new(0),
            store_failures: AtomicU64::new(0),
            device_lists_served: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            devices_stored: self.devices_stored.load(Ordering::Relaxed),
            locations_stored: self.locations_stored.load(Ordering::Relaxed),
            ingest_rejected: self.ingest_rejected.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            device_lists_served: self.device_lists_served.load(Ordering::Relaxed),
        }
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

/// 记录设备元数据写入次数。
pub fn record_device_stored() {
    metrics().devices_stored.fetch_add(1, Ordering::Relaxed);
}

/// 记录定位样本写入次数。
pub fn record_location_stored() {
    metrics().locations_stored.fetch_add(1, Ordering::Relaxed);
}

/// 记录无法识别而被拒绝的上报次数。
pub fn record_ingest_rejected() {
    metrics().ingest_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录存储层失败次数。
pub fn record_store_failure() {
    metrics().store_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录设备列表查询次数。
pub fn record_device_list_served() {
    metrics().device_lists_served.fetch_add(1, Ordering::Relaxed);
}
