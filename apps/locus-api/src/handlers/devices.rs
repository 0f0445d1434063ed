//! 设备查询 handlers
//!
//! 提供运维侧的设备读取接口：
//! - GET /devices - 活跃设备列表（最新位置 × 档案摘要联接）
//! - GET /device/{id} - 单设备信息（摘要并入最新位置）
//! - GET /device/{id}/location - 最新位置直查
//! - GET /device/{id}/location/history - 轨迹历史（新→旧，limit 可调）
//! - GET /device/{id}/location/stats - 轨迹统计
//! - GET /device/{id}/details - 完整档案详情
//!
//! 所有接口需要 Bearer token 认证；缺失数据统一返回 404。

use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use locus_query::DEFAULT_HISTORY_LIMIT;
use locus_telemetry::record_device_list_served;

use crate::AppState;
use crate::middleware::require_operator;
use crate::utils::response::not_found_error;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    device_id: String,
}

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

/// 活跃设备列表。
///
/// 最新位置已过期的设备不出现在列表中；档案缺失的设备保留，
/// `infos` 为空对象。
pub async fn list_devices(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    let data = state.query.list_devices().await;
    record_device_list_served();
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 单设备信息：档案摘要并入最新位置字段。
pub async fn get_device_info(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    match state.query.device_info(&path.device_id).await {
        Some(info) => (StatusCode::OK, Json(ApiResponse::success(info))).into_response(),
        None => not_found_error(),
    }
}

/// 最新位置直查。停报超过 TTL 后返回 404。
pub async fn get_device_location(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    match state.query.latest_location(&path.device_id).await {
        Some(sample) => (StatusCode::OK, Json(ApiResponse::success(sample))).into_response(),
        None => not_found_error(),
    }
}

/// 轨迹历史（新→旧）。`limit` 缺省为 100，历史为空返回 404。
pub async fn get_location_history(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    Query(query): Query<HistoryQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match state.query.location_history(&path.device_id, limit).await {
        Some(history) => (StatusCode::OK, Json(ApiResponse::success(history))).into_response(),
        None => not_found_error(),
    }
}

/// 轨迹统计：历史总数 + 最新样本 + last_seen。
pub async fn get_location_stats(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    match state.query.location_stats(&path.device_id).await {
        Some(stats) => (StatusCode::OK, Json(ApiResponse::success(stats))).into_response(),
        None => not_found_error(),
    }
}

/// 完整档案详情。
pub async fn get_device_details(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_operator(&state, &headers) {
        return response;
    }
    match state.query.device_details(&path.device_id).await {
        Some(details) => (StatusCode::OK, Json(ApiResponse::success(details))).into_response(),
        None => not_found_error(),
    }
}
