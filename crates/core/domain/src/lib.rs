pub mod device;
pub mod location;

pub use device::{AndroidInfo, DeviceRecord, IosInfo, PlatformInfo, WebInfo};
pub use location::LocationSample;

/// 入站数据校验错误。
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("device_id must be non-empty")]
    EmptyDeviceId,
    #[error("latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),
    #[error("longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
    #[error("timestamp must be a positive epoch-millis value: {0}")]
    NonPositiveTimestamp(i64),
}
