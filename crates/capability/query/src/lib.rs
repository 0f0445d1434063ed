//! 查询聚合能力
//!
//! 将 `DeviceStore` 与 `LocationStore` 两路读组合成对外的设备视图：
//! 设备列表（活跃集合 × 最新位置 × 档案摘要联接）、单设备信息、
//! 轨迹历史与统计、完整详情。
//!
//! 读路径错误姿态：存储层失败在此处记录 warn 日志并降级为缺失/空
//! 结果，绝不向上抛出。缺失是正常结果而不是异常，单个坏记录或一次
//! 后端抖动不能拖垮其他设备的查询。

use api_contract::{
    DeviceDetailsDto, DeviceInfoDto, DeviceListEntry, DeviceListResponse, DeviceSummaryDto,
    LocationHistoryResponse, LocationStatsDto,
};
use chrono::{DateTime, SecondsFormat};
use domain::LocationSample;
use locus_storage::{DeviceStore, LocationStore};
use std::sync::Arc;
use tracing::warn;

/// 历史查询条数默认上限。
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// 设备查询聚合服务。
///
/// 存储句柄由构造方注入，便于在测试中替换为内存实现。
pub struct DeviceQueryService {
    device_store: Arc<dyn DeviceStore>,
    location_store: Arc<dyn LocationStore>,
}

impl DeviceQueryService {
    pub fn new(device_store: Arc<dyn DeviceStore>, location_store: Arc<dyn LocationStore>) -> Self {
        Self {
            device_store,
            location_store,
        }
    }

    /// 设备列表：迭代活跃集合，联接最新位置与档案摘要。
    ///
    /// 最新位置已过期的条目静默跳过（列表不出现空坐标行）；档案缺失
    /// 的条目保留，`infos` 为空对象。迭代顺序无保证。
    pub async fn list_devices(&self) -> DeviceListResponse {
        let device_ids = match self.location_store.list_active_devices().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(error = %err, "active device listing failed");
                Vec::new()
            }
        };

        let mut devices = Vec::new();
        for device_id in device_ids {
            let latest = match self.location_store.get_latest(&device_id).await {
                Ok(latest) => latest,
                Err(err) => {
                    warn!(device_id, error = %err, "latest location read failed");
                    None
                }
            };
            let Some(latest) = latest else {
                continue;
            };
            let infos = match self.device_summary(&device_id).await {
                Some(summary) => {
                    serde_json::to_value(&summary).unwrap_or_else(|_| serde_json::json!({}))
                }
                None => serde_json::json!({}),
            };
            devices.push(DeviceListEntry {
                device_id,
                latitude: latest.latitude,
                longitude: latest.longitude,
                timestamp: latest.timestamp,
                infos,
            });
        }
        DeviceListResponse {
            count: devices.len(),
            devices,
        }
    }

    /// 单设备信息：档案摘要并入最新位置字段。
    ///
    /// 档案缺失 ⇒ `None`（not-found）；位置缺失 ⇒ 仅返回摘要。
    pub async fn device_info(&self, device_id: &str) -> Option<DeviceInfoDto> {
        let summary = self.device_summary(device_id).await?;
        let latest = match self.location_store.get_latest(device_id).await {
            Ok(latest) => latest,
            Err(err) => {
                warn!(device_id, error = %err, "latest location read failed");
                None
            }
        };
        Some(DeviceInfoDto {
            device_id: summary.device_id,
            display_name: summary.display_name,
            summary: summary.summary,
            last_seen: summary.last_seen,
            latitude: latest.as_ref().map(|sample| sample.latitude),
            longitude: latest.as_ref().map(|sample| sample.longitude),
            timestamp: latest.as_ref().map(|sample| sample.timestamp),
        })
    }

    /// 最新位置直查。
    pub async fn latest_location(&self, device_id: &str) -> Option<LocationSample> {
        match self.location_store.get_latest(device_id).await {
            Ok(latest) => latest,
            Err(err) => {
                warn!(device_id, error = %err, "latest location read failed");
                None
            }
        }
    }

    /// 轨迹历史（新→旧）；历史为空按 not-found 处理。
    pub async fn location_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Option<LocationHistoryResponse> {
        let history = match self.location_store.get_history(device_id, limit).await {
            Ok(history) => history,
            Err(err) => {
                warn!(device_id, error = %err, "history read failed");
                Vec::new()
            }
        };
        if history.is_empty() {
            return None;
        }
        Some(LocationHistoryResponse {
            device_id: device_id.to_string(),
            count: history.len(),
            history,
        })
    }

    /// 轨迹统计：历史总数 + 最新样本 + 由样本时间戳导出的 last_seen。
    pub async fn location_stats(&self, device_id: &str) -> Option<LocationStatsDto> {
        let total_records = match self.location_store.history_len(device_id).await {
            Ok(total) => total,
            Err(err) => {
                warn!(device_id, error = %err, "history count failed");
                0
            }
        };
        let latest_location = self.latest_location(device_id).await;
        if total_records == 0 && latest_location.is_none() {
            return None;
        }
        let last_seen = latest_location
            .as_ref()
            .and_then(|sample| iso_from_epoch_ms(sample.timestamp));
        Some(LocationStatsDto {
            device_id: device_id.to_string(),
            total_records,
            latest_location,
            last_seen,
        })
    }

    /// 档案摘要：缩减字段集 + 展示名 + last_seen。主记录缺失 ⇒ `None`。
    pub async fn device_summary(&self, device_id: &str) -> Option<DeviceSummaryDto> {
        let record = match self.device_store.get_device(device_id).await {
            Ok(record) => record?,
            Err(err) => {
                warn!(device_id, error = %err, "device read failed");
                return None;
            }
        };
        let last_seen = self.device_last_seen_iso(device_id).await;
        Some(DeviceSummaryDto {
            device_id: record.device_id.clone(),
            display_name: record.display_name(),
            summary: record.summary(),
            last_seen,
        })
    }

    /// 完整详情：全量档案 + 展示名 + last_seen。主记录缺失 ⇒ `None`。
    pub async fn device_details(&self, device_id: &str) -> Option<DeviceDetailsDto> {
        let record = match self.device_store.get_device(device_id).await {
            Ok(record) => record?,
            Err(err) => {
                warn!(device_id, error = %err, "device read failed");
                return None;
            }
        };
        let last_seen = self.device_last_seen_iso(device_id).await;
        Some(DeviceDetailsDto {
            display_name: record.display_name(),
            last_seen,
            record,
        })
    }

    async fn device_last_seen_iso(&self, device_id: &str) -> Option<String> {
        let last_seen_ms = match self.device_store.last_seen_ms(device_id).await {
            Ok(last_seen) => last_seen,
            Err(err) => {
                warn!(device_id, error = %err, "last_seen read failed");
                None
            }
        };
        last_seen_ms.and_then(iso_from_epoch_ms)
    }
}

/// epoch 毫秒 → ISO-8601（UTC）。超出 chrono 可表示范围返回 `None`。
fn iso_from_epoch_ms(epoch_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|datetime| datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::iso_from_epoch_ms;

    #[test]
    fn epoch_ms_formats_as_utc_iso() {
        assert_eq!(
            iso_from_epoch_ms(0).as_deref(),
            Some("1970-01-01T00:00:00.000Z")
        );
        assert_eq!(
            iso_from_epoch_ms(1_700_000_000_000).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }
}
