//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 运维登录：/auth/token
//! - 开放上报：POST / 与任意路径（上报端不关心路径）
//! - 设备查询：/devices, /device/{id}/*
//! - 指标快照：/metrics

use super::AppState;
use super::handlers::*;
use super::ingest::ingest_report;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 查询路径全部为 GET；POST 侧除 /auth/token 外一律进入上报分流，
/// 包括根路径与未知路径（上报端的 POST 目标不可约束）。
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .route("/devices", get(list_devices))
        .route("/device/:device_id", get(get_device_info))
        .route("/device/:device_id/location", get(get_device_location))
        .route(
            "/device/:device_id/location/history",
            get(get_location_history),
        )
        .route(
            "/device/:device_id/location/stats",
            get(get_location_stats),
        )
        .route("/device/:device_id/details", get(get_device_details))
        .route("/metrics", get(get_metrics))
        .route("/", post(ingest_report))
        .route("/*path", post(ingest_report))
}

#[cfg(test)]
mod tests {
    use super::create_api_router;
    use crate::AppState;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use locus_auth::{AuthService, JwtManager, OperatorCredentials};
    use locus_query::DeviceQueryService;
    use locus_storage::{DeviceStore, InMemoryTrackingStore, LocationStore};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<AuthService>) {
        let store = Arc::new(InMemoryTrackingStore::new());
        let device_store: Arc<dyn DeviceStore> = store.clone();
        let location_store: Arc<dyn LocationStore> = store;
        let credentials = OperatorCredentials {
            username: "admin".to_string(),
            password_hash: "operator-pass".to_string(),
        };
        let auth = Arc::new(AuthService::new(
            credentials,
            JwtManager::new("test-secret".to_string(), 3600),
        ));
        let query = Arc::new(DeviceQueryService::new(
            device_store.clone(),
            location_store.clone(),
        ));
        let state = AppState {
            auth: auth.clone(),
            query,
            device_store,
            location_store,
            max_history: 1440,
        };
        (create_api_router().with_state(state), auth)
    }

    fn bearer(auth: &AuthService) -> String {
        let tokens = auth.login("admin", "operator-pass").expect("login");
        format!("Bearer {}", tokens.access_token)
    }

    async fn send(
        app: &Router,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn post_json(path: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_with_token(path: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, token)
            .body(Body::empty())
            .expect("request")
    }

    fn location_report(device_id: &str, timestamp: i64) -> serde_json::Value {
        json!({
            "device_id": device_id,
            "latitude": 31.23,
            "longitude": 121.47,
            "timestamp": timestamp,
        })
    }

    #[tokio::test]
    async fn health_is_open() {
        let (app, _) = test_app();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn login_issues_bearer_token() {
        let (app, _) = test_app();
        let request = post_json(
            "/auth/token",
            json!({ "username": "admin", "password": "operator-pass" }),
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert!(!body["data"]["access_token"].as_str().unwrap_or("").is_empty());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let (app, _) = test_app();
        let request = post_json(
            "/auth/token",
            json!({ "username": "admin", "password": "nope" }),
        );
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn query_routes_require_token() {
        let (app, _) = test_app();
        for path in [
            "/devices",
            "/device/dev-1",
            "/device/dev-1/location",
            "/device/dev-1/location/history",
            "/device/dev-1/location/stats",
            "/device/dev-1/details",
            "/metrics",
        ] {
            let request = Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request");
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "path {path}");
            assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED", "path {path}");
        }
    }

    #[tokio::test]
    async fn location_report_acks_and_appears_in_list() {
        let (app, auth) = test_app();
        let (status, body) =
            send(&app, post_json("/", location_report("dev-1", 1_700_000_000_000))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let token = bearer(&auth);
        let (status, body) = send(&app, get_with_token("/devices", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["devices"][0]["device_id"], "dev-1");
    }

    #[tokio::test]
    async fn report_path_is_irrelevant() {
        let (app, auth) = test_app();
        let (status, _) = send(
            &app,
            post_json("/some/legacy/endpoint", location_report("dev-2", 1_700_000_000_000)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let token = bearer(&auth);
        let (status, body) = send(&app, get_with_token("/device/dev-2/location", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["device_id"], "dev-2");
    }

    #[tokio::test]
    async fn device_report_feeds_details_view() {
        let (app, auth) = test_app();
        let report = json!({
            "device_id": "dev-3",
            "platform": "Android",
            "manufacturer": "Google",
            "model": "Pixel 8",
        });
        let (status, _) = send(&app, post_json("/", report)).await;
        assert_eq!(status, StatusCode::OK);

        let token = bearer(&auth);
        let (status, body) = send(&app, get_with_token("/device/dev-3/details", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["display_name"], "Google Pixel 8");
        assert_eq!(body["data"]["platform"], "android");
    }

    #[tokio::test]
    async fn unrecognized_report_is_unprocessable() {
        let (app, _) = test_app();
        let (status, body) = send(&app, post_json("/", json!({ "hello": "world" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INGEST.UNPROCESSABLE");
    }

    #[tokio::test]
    async fn out_of_range_location_is_unprocessable() {
        let (app, _) = test_app();
        let report = json!({
            "device_id": "dev-1",
            "latitude": 91.0,
            "longitude": 121.47,
            "timestamp": 1_700_000_000_000_i64,
        });
        let (status, _) = send(&app, post_json("/", report)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn history_respects_limit_query() {
        let (app, auth) = test_app();
        for index in 0..5 {
            let (status, _) = send(
                &app,
                post_json("/", location_report("dev-4", 1_700_000_000_000 + index)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let token = bearer(&auth);
        let (status, body) = send(
            &app,
            get_with_token("/device/dev-4/location/history?limit=2", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 2);
        assert_eq!(body["data"]["history"][0]["timestamp"], 1_700_000_000_004_i64);
    }

    #[tokio::test]
    async fn unknown_device_views_are_not_found() {
        let (app, auth) = test_app();
        let token = bearer(&auth);
        for path in [
            "/device/ghost",
            "/device/ghost/location",
            "/device/ghost/location/history",
            "/device/ghost/location/stats",
            "/device/ghost/details",
        ] {
            let (status, body) = send(&app, get_with_token(path, &token)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
            assert_eq!(body["error"]["code"], "RESOURCE.NOT_FOUND", "path {path}");
        }
    }

    #[tokio::test]
    async fn metrics_snapshot_has_counters() {
        let (app, auth) = test_app();
        let token = bearer(&auth);
        let (status, body) = send(&app, get_with_token("/metrics", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["locations_stored"].is_u64());
        assert!(body["data"]["ingest_rejected"].is_u64());
    }
}
