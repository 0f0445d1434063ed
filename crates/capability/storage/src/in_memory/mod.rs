//! 内存存储实现
//!
//! 仅用于测试和演示。单个 [`InMemoryTrackingStore`] 同时实现
//! `DeviceStore` 与 `LocationStore`，模拟 Redis 的单一逻辑键空间
//! （活跃集合由位置写路径维护、由档案读路径查询）。
//!
//! 与 Redis 实现的语义对齐：
//! - 历史按 `(timestamp, 序列化成员)` 排序，等分时按成员字节序
//!   决胜，与 zset 同分规则一致；完全相同的样本重复写入幂等
//! - 不模拟 TTL 过期（测试不依赖时钟）

mod device;
mod location;

use domain::{DeviceRecord, LocationSample};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

/// 设备追踪数据内存存储。
#[derive(Default)]
pub struct InMemoryTrackingStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
    last_seen: RwLock<HashMap<String, i64>>,
    registered: RwLock<HashSet<String>>,
    platforms: RwLock<HashMap<String, HashSet<String>>>,
    latest: RwLock<HashMap<String, LocationSample>>,
    active: RwLock<HashSet<String>>,
    history: RwLock<HashMap<String, BTreeMap<(i64, String), LocationSample>>>,
}

impl InMemoryTrackingStore {
    /// 创建空存储。
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟最新位置 TTL 过期（用于测试）：移除单槽，保留活跃集合成员。
    pub fn expire_latest(&self, device_id: &str) {
        if let Ok(mut latest) = self.latest.write() {
            latest.remove(device_id);
        }
    }

    /// 模拟设备档案 TTL 过期（用于测试）：移除主记录与 last_seen，
    /// 保留注册/平台索引成员。
    pub fn expire_device(&self, device_id: &str) {
        if let Ok(mut devices) = self.devices.write() {
            devices.remove(device_id);
        }
        if let Ok(mut last_seen) = self.last_seen.write() {
            last_seen.remove(device_id);
        }
    }
}
