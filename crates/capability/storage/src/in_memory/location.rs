//! 位置数据内存实现。

use super::InMemoryTrackingStore;
use crate::error::StorageError;
use crate::traits::LocationStore;
use domain::LocationSample;

#[async_trait::async_trait]
impl LocationStore for InMemoryTrackingStore {
    async fn put_latest(&self, sample: &LocationSample) -> Result<(), StorageError> {
        if sample.device_id.trim().is_empty() {
            return Err(StorageError::new("device_id must be non-empty"));
        }
        self.latest
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .insert(sample.device_id.clone(), sample.clone());
        self.active
            .write()
            .map_err(|_| StorageError::new("lock failed"))?
            .insert(sample.device_id.clone());
        Ok(())
    }

    async fn append_history(
        &self,
        sample: &LocationSample,
        max_history: usize,
    ) -> Result<(), StorageError> {
        if sample.device_id.trim().is_empty() {
            return Err(StorageError::new("device_id must be non-empty"));
        }
        let member =
            serde_json::to_string(sample).map_err(|err| StorageError::new(err.to_string()))?;
        let mut history = self
            .history
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let entries = history.entry(sample.device_id.clone()).or_default();
        entries.insert((sample.timestamp, member), sample.clone());
        while entries.len() > max_history {
            // BTreeMap 首键即 (timestamp, member) 最小者，对应最旧条目
            let Some(oldest) = entries.keys().next().cloned() else {
                break;
            };
            entries.remove(&oldest);
        }
        Ok(())
    }

    async fn get_latest(&self, device_id: &str) -> Result<Option<LocationSample>, StorageError> {
        let latest = self
            .latest
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(latest.get(device_id).cloned())
    }

    async fn get_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<LocationSample>, StorageError> {
        let history = self
            .history
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(history
            .get(device_id)
            .map(|entries| entries.values().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn list_active_devices(&self) -> Result<Vec<String>, StorageError> {
        let active = self
            .active
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(active.iter().cloned().collect())
    }

    async fn history_len(&self, device_id: &str) -> Result<u64, StorageError> {
        let history = self
            .history
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(history
            .get(device_id)
            .map(|entries| entries.len() as u64)
            .unwrap_or_default())
    }
}
