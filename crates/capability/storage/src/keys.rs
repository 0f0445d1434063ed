//! KV 键布局与 TTL 常量。
//!
//! 所有键模式集中在此定义，Redis 实现与运维排障共用一份对照表。

/// 设备档案主记录：`device:info:<id>`，JSON blob。
pub const DEVICE_INFO_PREFIX: &str = "device:info:";
/// last_seen 时间戳：`device:last_seen:<id>`，epoch 毫秒。
pub const DEVICE_LAST_SEEN_PREFIX: &str = "device:last_seen:";
/// 最新位置单槽：`device:location:<id>`，JSON blob。
pub const DEVICE_LOCATION_PREFIX: &str = "device:location:";
/// 轨迹历史 zset：`device:history:<id>`，score = timestamp。
pub const DEVICE_HISTORY_PREFIX: &str = "device:history:";
/// 平台索引集合：`devices:platform:<platform>`。
pub const PLATFORM_SET_PREFIX: &str = "devices:platform:";
/// 注册集合：所有上报过档案的 device_id。
pub const REGISTERED_SET_KEY: &str = "devices:registered";
/// 活跃集合：有过位置上报的 device_id，列表查询的迭代根。
pub const ACTIVE_SET_KEY: &str = "devices:active";

/// 设备档案与 last_seen 的 TTL：30 天。
pub const DEVICE_TTL_SECONDS: u64 = 2_592_000;
/// 最新位置 TTL：1 小时，设备停报后自动失效。
pub const LATEST_TTL_SECONDS: u64 = 3_600;
/// 轨迹历史 TTL：7 天，每次追加时刷新（滑动窗口）。
pub const HISTORY_TTL_SECONDS: u64 = 604_800;
/// 历史容量上限默认值：1440 条（约 24 小时 × 每分钟一条）。
pub const DEFAULT_MAX_HISTORY: usize = 1_440;

pub fn device_info_key(device_id: &str) -> String {
    format!("{DEVICE_INFO_PREFIX}{device_id}")
}

pub fn device_last_seen_key(device_id: &str) -> String {
    format!("{DEVICE_LAST_SEEN_PREFIX}{device_id}")
}

pub fn device_location_key(device_id: &str) -> String {
    format!("{DEVICE_LOCATION_PREFIX}{device_id}")
}

pub fn device_history_key(device_id: &str) -> String {
    format!("{DEVICE_HISTORY_PREFIX}{device_id}")
}

/// 平台索引键，platform 必须已规范化为小写。
pub fn platform_set_key(platform: &str) -> String {
    format!("{PLATFORM_SET_PREFIX}{platform}")
}
