//! 上报入口与载荷分流
//!
//! 上报端只会向任意路径 POST 一个 JSON 对象，不携带类型标记，
//! 服务端按字段形状分流：
//! - 四个位置字段（device_id/latitude/longitude/timestamp）齐全 ⇒ 位置样本
//! - 否则含 device_id 与 platform ⇒ 设备档案
//! - 两者都不是 ⇒ 422 拒绝
//!
//! 位置判定优先于档案判定：同时带齐两类字段的对象按位置处理。
//! 写入成功统一应答 `{"status":"ok"}`，与上报端的既有协议保持一致。

use api_contract::IngestAck;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{DeviceRecord, LocationSample};
use locus_telemetry::{
    record_device_stored, record_ingest_rejected, record_location_stored, record_store_failure,
};
use tracing::{info, warn};

use crate::AppState;
use crate::utils::response::{storage_error, unprocessable_error};

/// 分流结果。
enum ReportPayload {
    Location(LocationSample),
    Device(DeviceRecord),
}

/// 按字段形状对上报对象分类。
///
/// 字段齐全但类型不符（如 latitude 为字符串）不回退到档案分支，
/// 直接判为不可识别。
fn classify_report(value: &serde_json::Value) -> Option<ReportPayload> {
    let object = value.as_object()?;
    let has_location_shape = object.contains_key("device_id")
        && object.contains_key("latitude")
        && object.contains_key("longitude")
        && object.contains_key("timestamp");
    if has_location_shape {
        return serde_json::from_value::<LocationSample>(value.clone())
            .ok()
            .map(ReportPayload::Location);
    }
    if object.contains_key("device_id") && object.contains_key("platform") {
        return serde_json::from_value::<DeviceRecord>(value.clone())
            .ok()
            .map(ReportPayload::Device);
    }
    None
}

/// 上报处理：分流、校验、写入。
///
/// 位置样本同时写最新位置单槽与轨迹历史；档案写主记录并维护索引。
/// 存储失败映射为 500，校验失败与不可识别载荷映射为 422。
pub async fn ingest_report(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match classify_report(&payload) {
        Some(ReportPayload::Location(sample)) => {
            if let Err(err) = sample.validate() {
                record_ingest_rejected();
                warn!(device_id = %sample.device_id, error = %err, "location report rejected");
                return unprocessable_error(err.to_string());
            }
            if let Err(err) = state.location_store.put_latest(&sample).await {
                record_store_failure();
                return storage_error(err);
            }
            if let Err(err) = state
                .location_store
                .append_history(&sample, state.max_history)
                .await
            {
                record_store_failure();
                return storage_error(err);
            }
            record_location_stored();
            info!(
                device_id = %sample.device_id,
                timestamp = sample.timestamp,
                "location stored"
            );
            (StatusCode::OK, Json(IngestAck::ok())).into_response()
        }
        Some(ReportPayload::Device(record)) => {
            if let Err(err) = record.validate() {
                record_ingest_rejected();
                warn!(device_id = %record.device_id, error = %err, "device report rejected");
                return unprocessable_error(err.to_string());
            }
            if let Err(err) = state.device_store.put_device(&record).await {
                record_store_failure();
                return storage_error(err);
            }
            record_device_stored();
            info!(
                device_id = %record.device_id,
                platform = %record.platform,
                "device stored"
            );
            (StatusCode::OK, Json(IngestAck::ok())).into_response()
        }
        None => {
            record_ingest_rejected();
            unprocessable_error("unrecognized payload")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportPayload, classify_report};
    use serde_json::json;

    #[test]
    fn full_location_shape_classifies_as_location() {
        let payload = json!({
            "device_id": "dev-1",
            "latitude": 31.23,
            "longitude": 121.47,
            "timestamp": 1_700_000_000_000_i64,
        });
        assert!(matches!(
            classify_report(&payload),
            Some(ReportPayload::Location(_))
        ));
    }

    #[test]
    fn platform_shape_classifies_as_device() {
        let payload = json!({
            "device_id": "dev-1",
            "platform": "android",
            "manufacturer": "Google",
            "model": "Pixel 8",
        });
        let Some(ReportPayload::Device(record)) = classify_report(&payload) else {
            panic!("expected device payload");
        };
        assert_eq!(record.device_id, "dev-1");
        assert_eq!(record.platform, "android");
    }

    #[test]
    fn location_shape_takes_precedence_over_platform() {
        let payload = json!({
            "device_id": "dev-1",
            "platform": "android",
            "latitude": 31.23,
            "longitude": 121.47,
            "timestamp": 1_700_000_000_000_i64,
        });
        assert!(matches!(
            classify_report(&payload),
            Some(ReportPayload::Location(_))
        ));
    }

    #[test]
    fn mistyped_location_fields_do_not_fall_back() {
        let payload = json!({
            "device_id": "dev-1",
            "platform": "android",
            "latitude": "31.23",
            "longitude": 121.47,
            "timestamp": 1_700_000_000_000_i64,
        });
        assert!(classify_report(&payload).is_none());
    }

    #[test]
    fn unrelated_object_is_unclassifiable() {
        assert!(classify_report(&json!({ "hello": "world" })).is_none());
        assert!(classify_report(&json!([1, 2, 3])).is_none());
        assert!(classify_report(&json!("text")).is_none());
    }

    #[test]
    fn partial_location_without_platform_is_unclassifiable() {
        let payload = json!({
            "device_id": "dev-1",
            "latitude": 31.23,
        });
        assert!(classify_report(&payload).is_none());
    }
}
