//! 稳定的 DTO 与 API 响应契约。
//!
//! 入站/出站字段均为 snake_case，与存储 blob 及上报端保持同构。

use domain::{DeviceRecord, LocationSample};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应体（bearer access token）。
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// 数据上报成功应答。
#[derive(Debug, Serialize)]
pub struct IngestAck {
    pub status: String,
}

impl IngestAck {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// 设备摘要（列表与单设备查询共用）。
#[derive(Debug, Serialize)]
pub struct DeviceSummaryDto {
    pub device_id: String,
    pub display_name: String,
    /// 平台相关的缩减字段集（开放结构，随平台变化）。
    pub summary: serde_json::Value,
    pub last_seen: Option<String>,
}

/// 设备列表条目：最新位置 + 档案摘要联接。
#[derive(Debug, Serialize)]
pub struct DeviceListEntry {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    /// 档案缺失时为空对象（索引集合可能先于主记录存在）。
    pub infos: serde_json::Value,
}

/// 设备列表响应。
#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub count: usize,
    pub devices: Vec<DeviceListEntry>,
}

/// 单设备信息：摘要并入最新位置字段（位置缺失时省略）。
#[derive(Debug, Serialize)]
pub struct DeviceInfoDto {
    pub device_id: String,
    pub display_name: String,
    pub summary: serde_json::Value,
    pub last_seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// 轨迹历史响应（新→旧）。
#[derive(Debug, Serialize)]
pub struct LocationHistoryResponse {
    pub device_id: String,
    pub count: usize,
    pub history: Vec<LocationSample>,
}

/// 单设备轨迹统计。
#[derive(Debug, Serialize)]
pub struct LocationStatsDto {
    pub device_id: String,
    pub total_records: u64,
    pub latest_location: Option<LocationSample>,
    /// 由最新样本时间戳导出的 ISO-8601 时间（UTC）。
    pub last_seen: Option<String>,
}

/// 指标快照 DTO。
#[derive(Debug, Serialize)]
pub struct MetricsSnapshotDto {
    pub devices_stored: u64,
    pub locations_stored: u64,
    pub ingest_rejected: u64,
    pub store_failures: u64,
    pub device_lists_served: u64,
}

/// 设备完整详情：全量档案 + 展示名 + last_seen。
#[derive(Debug, Serialize)]
pub struct DeviceDetailsDto {
    pub display_name: String,
    pub last_seen: Option<String>,
    #[serde(flatten)]
    pub record: DeviceRecord,
}
