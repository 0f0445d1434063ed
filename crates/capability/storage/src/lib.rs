//! # Locus Storage 模块
//!
//! 本模块提供设备追踪数据的统一存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 该模块采用分层架构，遵循以下原则：
//!
//! 1. **接口抽象层** (`traits.rs`)：定义 `DeviceStore` / `LocationStore` 异步 Trait 接口
//! 2. **键布局层** (`keys.rs`)：集中定义 KV 键模式与 TTL 常量
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `redis.rs`：Redis/KV 存储实现（生产环境使用）
//!
//! ## 键布局
//!
//! | 概念 | 键模式 | TTL |
//! |---|---|---|
//! | 设备档案 | `device:info:<id>` | 30 天 |
//! | 注册集合 | `devices:registered` (set) | 无 |
//! | 平台索引 | `devices:platform:<p>` (set) | 无 |
//! | last_seen | `device:last_seen:<id>` | 30 天 |
//! | 最新位置 | `device:location:<id>` | 1 小时 |
//! | 活跃集合 | `devices:active` (set) | 无 |
//! | 轨迹历史 | `device:history:<id>` (zset, score=timestamp) | 7 天（滑动） |
//!
//! ## 一致性边界
//!
//! 多键写入不构成事务：`put_device` 依次写主记录、注册集合、平台索引、
//! last_seen，中途失败会留下部分更新但逐键有效的状态。主记录可能先于
//! 集合成员过期，因此"集合内有 id 而主记录缺失"是正常的未命中，读路径
//! 必须按 not-found 处理而不是报错。同一 device_id 的并发写入按
//! last-write-wins 处理，历史追加按 score 排名可交换，无需客户端加锁。
//!
//! ## 解码容错
//!
//! 读路径上无法解码的 blob（损坏/不兼容 JSON）按缺失处理并记录 warn
//! 日志，单条坏记录不会阻断其他设备的读写。

pub mod error;
pub mod in_memory;
pub mod keys;
pub mod redis;
pub mod traits;

pub use error::*;
pub use in_memory::InMemoryTrackingStore;
pub use redis::{RedisDeviceStore, RedisLocationStore};
pub use traits::*;

/// 当前时间戳（epoch 毫秒）。
pub(crate) fn now_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as i64)
        .unwrap_or_default()
}
