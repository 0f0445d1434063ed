//! 设备档案内存实现。

use super::InMemoryTrackingStore;
use crate::error::StorageError;
use crate::now_epoch_ms;
use crate::traits::DeviceStore;
use domain::DeviceRecord;

#[async_trait::async_trait]
impl DeviceStore for InMemoryTrackingStore {
    async fn put_device(&self, record: &DeviceRecord) -> Result<(), StorageError> {
        if record.device_id.trim().is_empty() {
            return Err(StorageError::new("device_id must be non-empty"));
        }
        self.devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .insert(record.device_id.clone(), record.clone());
        self.registered
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .insert(record.device_id.clone());
        self.platforms
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .entry(record.platform.clone())
            .or_default()
            .insert(record.device_id.clone());
        self.last_seen
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .insert(record.device_id.clone(), now_epoch_ms());
        Ok(())
    }

    async fn get_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let devices = self
            .devices
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(devices.get(device_id).cloned())
    }

    async fn last_seen_ms(&self, device_id: &str) -> Result<Option<i64>, StorageError> {
        let last_seen = self
            .last_seen
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(last_seen.get(device_id).copied())
    }

    async fn is_active(&self, device_id: &str) -> Result<bool, StorageError> {
        let active = self
            .active
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(active.contains(device_id))
    }

    async fn list_registered(&self) -> Result<Vec<String>, StorageError> {
        let registered = self
            .registered
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(registered.iter().cloned().collect())
    }

    async fn list_platform(&self, platform: &str) -> Result<Vec<String>, StorageError> {
        let platforms = self
            .platforms
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(platforms
            .get(&platform.to_lowercase())
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }
}
