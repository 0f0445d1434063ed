//! 设备追踪 HTTP API 服务器。
//!
//! 职责：
//! - 开放上报入口：POST `/` 与任意路径，按字段形状分流为位置/档案写入
//! - 受保护查询接口：设备列表、单设备信息、最新位置、轨迹历史/统计、完整详情
//! - 运维登录：POST /auth/token 换取 bearer access token
//!
//! 存储后端为 Redis（档案/最新位置/轨迹均带 TTL），聚合读由
//! `locus-query` 完成，本 crate 只做 HTTP 装配与错误映射。

mod handlers;
mod ingest;
mod middleware;
mod routes;
mod utils;

use axum::middleware as axum_middleware;
use locus_auth::{AuthService, JwtManager, OperatorCredentials};
use locus_config::AppConfig;
use locus_query::DeviceQueryService;
use locus_storage::{DeviceStore, LocationStore, RedisDeviceStore, RedisLocationStore};
use locus_telemetry::init_tracing;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub query: Arc<DeviceQueryService>,
    pub device_store: Arc<dyn DeviceStore>,
    pub location_store: Arc<dyn LocationStore>,
    /// 每台设备轨迹历史的保留上限（超出按时间戳淘汰最旧）。
    pub max_history: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let device_store: Arc<dyn DeviceStore> = Arc::new(RedisDeviceStore::connect_with_ttl(
        &config.redis_url,
        config.device_ttl_seconds,
    )?);
    let location_store: Arc<dyn LocationStore> = Arc::new(RedisLocationStore::connect_with_ttl(
        &config.redis_url,
        config.latest_ttl_seconds,
        config.history_ttl_seconds,
    )?);

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_ttl_seconds);
    let credentials = OperatorCredentials {
        username: config.operator_username.clone(),
        password_hash: config.operator_password_hash.clone(),
    };
    let auth = Arc::new(AuthService::new(credentials, jwt));
    let query = Arc::new(DeviceQueryService::new(
        device_store.clone(),
        location_store.clone(),
    ));

    let state = AppState {
        auth,
        query,
        device_store,
        location_store,
        max_history: config.max_history as usize,
    };

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "locus-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
