//! 存储接口 Trait 定义
//!
//! 定义设备追踪数据的两类异步存储接口：
//! - DeviceStore：设备档案、注册/平台索引、last_seen
//! - LocationStore：最新位置单槽、轨迹历史、活跃集合
//!
//! 设计原则：
//! - 存储句柄显式注入（构造时传入），禁止模块级全局客户端
//! - 所有接口返回 StorageError；缺失数据用 `Option`/空集表达，不是错误
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{DeviceRecord, LocationSample};

/// 设备档案存储接口。
///
/// 写路径为多键 best-effort：主记录、注册集合、平台索引、last_seen
/// 各自独立写入，不保证跨键原子性。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 写入/覆盖设备档案，并维护注册集合、平台索引与 last_seen。
    async fn put_device(&self, record: &DeviceRecord) -> Result<(), StorageError>;

    /// 读取设备档案；键缺失或 blob 无法解码均返回 `None`。
    async fn get_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 读取档案写入时刷新的 last_seen（epoch 毫秒）。
    async fn last_seen_ms(&self, device_id: &str) -> Result<Option<i64>, StorageError>;

    /// 活跃集合成员判定（基于存在性，与最新位置 TTL 无关）。
    async fn is_active(&self, device_id: &str) -> Result<bool, StorageError>;

    /// 注册集合全量成员（上报过档案的所有 device_id）。
    async fn list_registered(&self) -> Result<Vec<String>, StorageError>;

    /// 指定平台（小写）索引集合的成员。
    async fn list_platform(&self, platform: &str) -> Result<Vec<String>, StorageError>;
}

/// 位置数据存储接口。
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// 覆盖最新位置单槽（TTL 重置为 1 小时），并把设备加入活跃集合。
    async fn put_latest(&self, sample: &LocationSample) -> Result<(), StorageError>;

    /// 按 timestamp 追加轨迹历史；超出 `max_history` 时按排名淘汰最旧
    /// 条目，并刷新历史 TTL（滑动窗口）。
    async fn append_history(
        &self,
        sample: &LocationSample,
        max_history: usize,
    ) -> Result<(), StorageError>;

    /// 读取最新位置；停报超过 TTL 后返回 `None`。
    async fn get_latest(&self, device_id: &str) -> Result<Option<LocationSample>, StorageError>;

    /// 读取最多 `limit` 条历史，按 timestamp 降序（新→旧）。
    async fn get_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<LocationSample>, StorageError>;

    /// 活跃集合全量成员。成员资格不随最新位置过期而消失。
    async fn list_active_devices(&self) -> Result<Vec<String>, StorageError>;

    /// 当前历史条目数。
    async fn history_len(&self, device_id: &str) -> Result<u64, StorageError>;
}
