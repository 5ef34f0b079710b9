//! 路由定义
//!
//! 集中管理所有 API 路由，全部路由同时挂载在 `/` 与 `/api` 下：
//! - 健康检查：/health, /livez, /readyz
//! - 用户：/users/login, /users/register, /users/*
//! - 摄像头：/cameras/*（含重分配、历史、变更日志与批量导入）
//! - NVR：/nvrs/*
//! - 项目：/projects/*（含 add-camera / add-nvr）
//! - 指标：/metrics

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// 创建 API 路由
///
/// `import_max_bytes` 限制导入接口的请求体大小。
pub fn create_api_router(import_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .route("/metrics", get(get_metrics))
        .route("/users", get(list_users))
        .route("/users/login", post(login))
        .route("/users/register", post(register))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/cameras", get(list_cameras).post(create_camera))
        .route(
            "/cameras/import",
            post(import_cameras).layer(DefaultBodyLimit::max(import_max_bytes)),
        )
        .route(
            "/cameras/:id",
            get(get_camera).patch(update_camera).delete(delete_camera),
        )
        .route("/cameras/:id/history", get(get_camera_history))
        .route("/cameras/:id/changes", get(get_camera_changes))
        .route("/cameras/:id/assign/:nvr_id", put(assign_camera))
        .route("/nvrs", get(list_nvrs).post(create_nvr))
        .route(
            "/nvrs/:id",
            get(get_nvr).put(update_nvr).delete(delete_nvr),
        )
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/add-camera", post(add_camera_to_project))
        .route("/projects/add-nvr", post(add_nvr_to_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// 组装完整应用：路由、状态、请求上下文与访问日志
pub fn create_router(state: AppState) -> Router {
    let api = create_api_router(state.import_max_bytes);
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(middleware::from_fn(request_context))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory_stores;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use vss_auth::JwtManager;

    const BOUNDARY: &str = "vss-test-boundary";

    fn app() -> Router {
        let jwt = JwtManager::new("secret".to_string(), 3600);
        let state = AppState::new(in_memory_stores(), jwt, None, 64 * 1024);
        create_router(state)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request");
        read(app.clone().oneshot(request).await.expect("response")).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json")
        };
        (status, value)
    }

    async fn login(app: &Router, email: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().expect("token").to_string()
    }

    async fn admin_token(app: &Router) -> String {
        login(app, "admin@example.com", "admin123").await
    }

    fn nvr_body(name: &str, max_channels: i32, octet: u8) -> Value {
        json!({
            "name": name,
            "ipAddress": format!("10.1.0.{octet}"),
            "macAddress": format!("00:14:22:01:00:{octet:02}"),
            "model": "DS-7608",
            "maxChannels": max_channels,
            "capacity": 4000,
            "location": "Server room",
            "branch": "North",
        })
    }

    fn camera_body(name: &str, octet: u8) -> Value {
        json!({
            "name": name,
            "model": "IPC-1",
            "ipAddress": format!("10.2.0.{octet}"),
            "location": "Gate",
            "macAddress": format!("00:14:22:02:00:{octet:02}"),
            "serialNumber": format!("SN-{octet}"),
            "fps": 25,
        })
    }

    #[tokio::test]
    async fn health_is_served_under_both_prefixes() {
        let app = app();
        for uri in ["/health", "/api/health"] {
            let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
            let response = app.clone().oneshot(request).await.expect("response");
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().contains_key("x-request-id"));
        }
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/cameras", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "AUTH.UNAUTHORIZED");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/users/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "AUTH.INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn camera_created_on_nvr_expands_references() {
        let app = app();
        let token = admin_token(&app).await;
        let (status, nvr) = send(
            &app,
            "POST",
            "/api/nvrs",
            Some(&token),
            Some(nvr_body("NVR North", 8, 1)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{nvr}");
        let nvr_id = nvr["data"]["id"].as_str().expect("nvr id").to_string();

        let mut body = camera_body("Gate cam", 1);
        body["nvr"] = json!(nvr_id);
        let (status, camera) = send(&app, "POST", "/api/cameras", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{camera}");
        let camera_id = camera["data"]["id"].as_str().expect("camera id").to_string();
        assert!(camera["data"].get("password").is_none());

        let (_, fetched) = send(
            &app,
            "GET",
            &format!("/api/cameras/{camera_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(fetched["data"]["currentNvr"]["name"], "NVR North");
        assert_eq!(fetched["data"]["createdBy"]["name"], "Administrator");

        let (_, nvr) = send(&app, "GET", &format!("/nvrs/{nvr_id}"), Some(&token), None).await;
        assert_eq!(nvr["data"]["channelsOccupied"], 1);
        assert_eq!(nvr["data"]["cameras"][0]["id"], camera_id.as_str());

        let (status, history) = send(
            &app,
            "GET",
            &format!("/api/cameras/{camera_id}/history"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            history["data"]["message"],
            "Reassignment history for camera Gate cam"
        );
        assert_eq!(history["data"]["history"][0]["nvr"]["maxChannels"], 8);
    }

    #[tokio::test]
    async fn reassignment_conflicts_and_capacity_use_stable_codes() {
        let app = app();
        let token = admin_token(&app).await;
        let (_, small) = send(&app, "POST", "/nvrs", Some(&token), Some(nvr_body("A", 1, 2))).await;
        let small_id = small["data"]["id"].as_str().expect("id").to_string();
        let (_, other) = send(&app, "POST", "/nvrs", Some(&token), Some(nvr_body("B", 4, 3))).await;
        let other_id = other["data"]["id"].as_str().expect("id").to_string();

        let mut first = camera_body("First", 2);
        first["nvr"] = json!(small_id);
        send(&app, "POST", "/cameras", Some(&token), Some(first)).await;
        let mut second = camera_body("Second", 3);
        second["nvr"] = json!(other_id);
        let (_, second) = send(&app, "POST", "/cameras", Some(&token), Some(second)).await;
        let second_id = second["data"]["id"].as_str().expect("id").to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/cameras/{second_id}/assign/{small_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "NVR.CAPACITY_EXCEEDED");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/cameras/{second_id}/assign/{other_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/nvrs/{other_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");
    }

    #[tokio::test]
    async fn malformed_ids_are_bad_requests() {
        let app = app();
        let token = admin_token(&app).await;
        let (status, body) = send(&app, "GET", "/cameras/not-a-uuid", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID.REQUEST");

        let (status, _) = send(
            &app,
            "GET",
            "/cameras/6f9619ff-8b86-4011-b42d-00c04fc964ff",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn readonly_users_cannot_write() {
        let app = app();
        let token = admin_token(&app).await;
        let (status, registered) = send(
            &app,
            "POST",
            "/users/register",
            Some(&token),
            Some(json!({
                "name": "Viewer",
                "email": "viewer@example.com",
                "password": "viewer-pass",
                "role": "readonly",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{registered}");
        let viewer = registered["data"]["token"].as_str().expect("token").to_string();

        let (status, _) = send(&app, "GET", "/cameras", Some(&viewer), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(
            &app,
            "POST",
            "/cameras",
            Some(&viewer),
            Some(camera_body("Denied", 9)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTH.FORBIDDEN");
        let (status, _) = send(&app, "GET", "/users", Some(&viewer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let app = app();
        let token = admin_token(&app).await;
        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/users/{}", vss_storage::DEFAULT_ADMIN_ID),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "AUTH.FORBIDDEN");
    }

    #[tokio::test]
    async fn projects_collect_members() {
        let app = app();
        let token = admin_token(&app).await;
        let (status, project) = send(
            &app,
            "POST",
            "/projects",
            Some(&token),
            Some(json!({ "name": "Campus", "description": "Main site" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{project}");
        let project_id = project["data"]["id"].as_str().expect("id").to_string();
        let (_, camera) = send(&app, "POST", "/cameras", Some(&token), Some(camera_body("C", 4))).await;
        let camera_id = camera["data"]["id"].as_str().expect("id").to_string();

        let body = json!({ "projectId": project_id, "cameraId": camera_id });
        let (status, updated) = send(
            &app,
            "POST",
            "/projects/add-camera",
            Some(&token),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{updated}");
        assert_eq!(updated["data"]["cameras"][0]["name"], "C");

        let (status, body) = send(&app, "POST", "/projects/add-camera", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "RESOURCE.CONFLICT");

        let (_, camera) = send(&app, "GET", &format!("/cameras/{camera_id}"), Some(&token), None).await;
        assert_eq!(camera["data"]["currentProject"]["name"], "Campus");
    }

    #[tokio::test]
    async fn csv_import_reports_counts() {
        let app = app();
        let token = admin_token(&app).await;
        let csv = "name,model,ipAddress,location,macAddress,serialNumber,firmware,resolution,fps\n\
                   R1,X1,10.9.0.1,Dock,00:14:22:09:00:01,SN-R1,v1,1920x1080,30\n\
                   R2,X1,10.9.0.2,Dock,,SN-R2,v1,1920x1080,30\n";
        let payload = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cameras.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {csv}\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/cameras/import")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(payload))
            .expect("request");
        let (status, body) = read(app.clone().oneshot(request).await.expect("response")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["importedCount"], 1);
        assert_eq!(body["data"]["skippedCount"], 1);
        assert_eq!(body["data"]["skipped"][0]["line"], 3);
    }
}
