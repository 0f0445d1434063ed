//! GPS 位置样本模型。

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// 单条位置样本。写入后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// epoch 毫秒，由客户端提供（服务端不做时钟裁决）。
    pub timestamp: i64,
    pub device_id: String,
}

impl LocationSample {
    /// 校验坐标范围、时间戳为正、device_id 非空。
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.device_id.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        if self.timestamp <= 0 {
            return Err(ValidationError::NonPositiveTimestamp(self.timestamp));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LocationSample {
        LocationSample {
            latitude: 48.8566,
            longitude: 2.3522,
            timestamp: 1_700_000_000_000,
            device_id: "dev-1".to_string(),
        }
    }

    #[test]
    fn valid_sample_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn out_of_range_coordinates_fail() {
        let mut bad = sample();
        bad.latitude = 90.5;
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::LatitudeOutOfRange(_))
        ));

        let mut bad = sample();
        bad.longitude = -180.5;
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn non_positive_timestamp_fails() {
        let mut bad = sample();
        bad.timestamp = 0;
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::NonPositiveTimestamp(0))
        ));
    }
}
