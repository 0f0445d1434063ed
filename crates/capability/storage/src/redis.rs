//! Redis/KV 存储实现。
//!
//! 每次操作通过多路复用连接执行；多键写入不使用事务，失败即中断并
//! 返回错误，已落盘的键保持各自有效（best-effort 语义）。

use crate::error::StorageError;
use crate::keys;
use crate::now_epoch_ms;
use crate::traits::{DeviceStore, LocationStore};
use domain::{DeviceRecord, LocationSample};
use redis::AsyncCommands;
use tracing::warn;

/// 设备档案 Redis 存储。
pub struct RedisDeviceStore {
    client: redis::Client,
    device_ttl_seconds: u64,
}

impl RedisDeviceStore {
    pub fn new(client: redis::Client) -> Self {
        Self::new_with_ttl(client, keys::DEVICE_TTL_SECONDS)
    }

    pub fn new_with_ttl(client: redis::Client, device_ttl_seconds: u64) -> Self {
        Self {
            client,
            device_ttl_seconds: device_ttl_seconds.max(1),
        }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn connect_with_ttl(
        redis_url: &str,
        device_ttl_seconds: u64,
    ) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new_with_ttl(client, device_ttl_seconds))
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }
}

#[async_trait::async_trait]
impl DeviceStore for RedisDeviceStore {
    async fn put_device(&self, record: &DeviceRecord) -> Result<(), StorageError> {
        if record.device_id.trim().is_empty() {
            return Err(StorageError::new("device_id must be non-empty"));
        }
        let data =
            serde_json::to_string(record).map_err(|err| StorageError::new(err.to_string()))?;
        let mut connection = self.connection().await?;

        connection
            .set_ex::<_, _, ()>(
                keys::device_info_key(&record.device_id),
                data,
                self.device_ttl_seconds,
            )
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        connection
            .sadd::<_, _, ()>(keys::REGISTERED_SET_KEY, &record.device_id)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        connection
            .sadd::<_, _, ()>(keys::platform_set_key(&record.platform), &record.device_id)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        connection
            .set_ex::<_, _, ()>(
                keys::device_last_seen_key(&record.device_id),
                now_epoch_ms(),
                self.device_ttl_seconds,
            )
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        Ok(())
    }

    async fn get_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let mut connection = self.connection().await?;
        let data: Option<String> = connection
            .get(keys::device_info_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let Some(data) = data else {
            return Ok(None);
        };
        match serde_json::from_str::<DeviceRecord>(&data) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                // 坏 blob 按缺失处理，不阻断读路径
                warn!(device_id, error = %err, "undecodable device blob treated as absent");
                Ok(None)
            }
        }
    }

    async fn last_seen_ms(&self, device_id: &str) -> Result<Option<i64>, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .get(keys::device_last_seen_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }

    async fn is_active(&self, device_id: &str) -> Result<bool, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .sismember(keys::ACTIVE_SET_KEY, device_id)
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }

    async fn list_registered(&self) -> Result<Vec<String>, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .smembers(keys::REGISTERED_SET_KEY)
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }

    async fn list_platform(&self, platform: &str) -> Result<Vec<String>, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .smembers(keys::platform_set_key(&platform.to_lowercase()))
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }
}

/// 位置数据 Redis 存储。
pub struct RedisLocationStore {
    client: redis::Client,
    latest_ttl_seconds: u64,
    history_ttl_seconds: u64,
}

impl RedisLocationStore {
    pub fn new(client: redis::Client) -> Self {
        Self::new_with_ttl(client, keys::LATEST_TTL_SECONDS, keys::HISTORY_TTL_SECONDS)
    }

    pub fn new_with_ttl(
        client: redis::Client,
        latest_ttl_seconds: u64,
        history_ttl_seconds: u64,
    ) -> Self {
        Self {
            client,
            latest_ttl_seconds: latest_ttl_seconds.max(1),
            history_ttl_seconds: history_ttl_seconds.max(1),
        }
    }

    pub fn connect(redis_url: &str) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn connect_with_ttl(
        redis_url: &str,
        latest_ttl_seconds: u64,
        history_ttl_seconds: u64,
    ) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new_with_ttl(
            client,
            latest_ttl_seconds,
            history_ttl_seconds,
        ))
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }
}

#[async_trait::async_trait]
impl LocationStore for RedisLocationStore {
    async fn put_latest(&self, sample: &LocationSample) -> Result<(), StorageError> {
        if sample.device_id.trim().is_empty() {
            return Err(StorageError::new("device_id must be non-empty"));
        }
        let data =
            serde_json::to_string(sample).map_err(|err| StorageError::new(err.to_string()))?;
        let mut connection = self.connection().await?;
        connection
            .set_ex::<_, _, ()>(
                keys::device_location_key(&sample.device_id),
                data,
                self.latest_ttl_seconds,
            )
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        connection
            .sadd::<_, _, ()>(keys::ACTIVE_SET_KEY, &sample.device_id)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
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
        let key = keys::device_history_key(&sample.device_id);
        let mut connection = self.connection().await?;
        connection
            .zadd::<_, _, _, ()>(&key, member, sample.timestamp as f64)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let total: u64 = connection
            .zcard(&key)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        if total as usize > max_history {
            // 淘汰排名最低（最旧）的超额条目，保留恰好 max_history 条
            let excess = total as isize - max_history as isize;
            connection
                .zremrangebyrank::<_, ()>(&key, 0, excess - 1)
                .await
                .map_err(|err| StorageError::new(err.to_string()))?;
        }
        connection
            .expire::<_, ()>(&key, self.history_ttl_seconds as i64)
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        Ok(())
    }

    async fn get_latest(&self, device_id: &str) -> Result<Option<LocationSample>, StorageError> {
        let mut connection = self.connection().await?;
        let data: Option<String> = connection
            .get(keys::device_location_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let Some(data) = data else {
            return Ok(None);
        };
        match serde_json::from_str::<LocationSample>(&data) {
            Ok(sample) => Ok(Some(sample)),
            Err(err) => {
                warn!(device_id, error = %err, "undecodable location blob treated as absent");
                Ok(None)
            }
        }
    }

    async fn get_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<LocationSample>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut connection = self.connection().await?;
        let members: Vec<String> = connection
            .zrevrange(
                keys::device_history_key(device_id),
                0,
                limit as isize - 1,
            )
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let mut samples = Vec::with_capacity(members.len());
        for member in members {
            match serde_json::from_str::<LocationSample>(&member) {
                Ok(sample) => samples.push(sample),
                Err(err) => {
                    warn!(device_id, error = %err, "undecodable history entry skipped");
                }
            }
        }
        Ok(samples)
    }

    async fn list_active_devices(&self) -> Result<Vec<String>, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .smembers(keys::ACTIVE_SET_KEY)
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }

    async fn history_len(&self, device_id: &str) -> Result<u64, StorageError> {
        let mut connection = self.connection().await?;
        connection
            .zcard(keys::device_history_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }
}
