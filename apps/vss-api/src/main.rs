//! 监控设备库存 HTTP API：摄像头、NVR、项目与用户管理。
//!
//! 启动流程：
//! 1. 读取 `.env` 与环境变量为 `AppConfig`
//! 2. 配置了数据库 URL 时连接 Postgres 并执行迁移，否则使用内存存储
//! 3. 按需写入初始管理员与演示摄像头
//! 4. 启动 axum 服务，Ctrl-C 时优雅退出

mod handlers;
mod middleware;
mod routes;
mod utils;

use domain::{Role, UserContext};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use vss_auth::{AuthService, JwtManager, hash_password};
use vss_config::{AppConfig, BootstrapAdmin};
use vss_inventory::{InventoryService, InventoryStores};
use vss_storage::{
    InMemoryCameraStore, InMemoryNvrStore, InMemoryProjectStore, InMemoryUserStore,
    PgCameraStore, PgNvrStore, PgProjectStore, PgUserStore, UserRecord, UserStore,
};
use vss_telemetry::init_tracing;

/// 应用状态，所有 handler 共享。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserStore>,
    pub inventory: Arc<InventoryService>,
    /// 仅 Postgres 存储时存在，供 readyz 探测。
    pub db_pool: Option<PgPool>,
    pub import_max_bytes: usize,
}

impl AppState {
    pub fn new(
        stores: InventoryStores,
        jwt: JwtManager,
        db_pool: Option<PgPool>,
        import_max_bytes: usize,
    ) -> Self {
        let users = stores.users.clone();
        Self {
            auth: Arc::new(AuthService::new(users.clone(), jwt)),
            users,
            inventory: Arc::new(InventoryService::new(stores)),
            db_pool,
            import_max_bytes,
        }
    }
}

/// 内存存储（含内置 admin 账户）。
pub fn in_memory_stores() -> InventoryStores {
    InventoryStores {
        cameras: Arc::new(InMemoryCameraStore::new()),
        nvrs: Arc::new(InMemoryNvrStore::new()),
        projects: Arc::new(InMemoryProjectStore::new()),
        users: Arc::new(InMemoryUserStore::with_default_admin()),
    }
}

fn postgres_stores(pool: &PgPool) -> InventoryStores {
    InventoryStores {
        cameras: Arc::new(PgCameraStore::new(pool.clone())),
        nvrs: Arc::new(PgNvrStore::new(pool.clone())),
        projects: Arc::new(PgProjectStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool.clone())),
    }
}

/// 邮箱不存在时创建初始管理员。
async fn ensure_bootstrap_admin(
    users: &dyn UserStore,
    admin: &BootstrapAdmin,
) -> Result<(), Box<dyn std::error::Error>> {
    if users.find_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }
    let record = UserRecord {
        user_id: uuid::Uuid::new_v4().to_string(),
        name: "Administrator".to_string(),
        email: admin.email.trim().to_ascii_lowercase(),
        password: hash_password(&admin.password)?,
        role: Role::Admin,
        created_at_ms: 0,
    };
    let created = users.create_user(record).await?;
    info!(target: "vss.auth", user_id = %created.user_id, "bootstrap_admin_created");
    Ok(())
}

/// 演示数据的写入者：首个 admin 账户，没有时使用系统身份。
async fn seed_actor(users: &dyn UserStore) -> Result<UserContext, Box<dyn std::error::Error>> {
    let admin = users
        .list_users()
        .await?
        .into_iter()
        .find(|user| user.role == Role::Admin);
    Ok(match admin {
        Some(user) => user.to_user_context(),
        None => UserContext::new("system", "system", Role::Admin),
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "shutdown signal listener failed");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let (stores, db_pool) = match config.database_url.as_deref() {
        Some(url) => {
            let pool = vss_storage::connect_pool(url).await?;
            vss_storage::run_migrations(&pool).await?;
            info!(backend = "postgres", "storage ready");
            (postgres_stores(&pool), Some(pool))
        }
        None => {
            info!(backend = "memory", "storage ready");
            (in_memory_stores(), None)
        }
    };

    if let Some(admin) = config.bootstrap_admin.as_ref() {
        ensure_bootstrap_admin(stores.users.as_ref(), admin).await?;
    }

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_ttl_seconds);
    let state = AppState::new(stores, jwt, db_pool, config.import_max_bytes);

    if config.seed_demo {
        let actor = seed_actor(state.users.as_ref()).await?;
        state.inventory.seed_demo_cameras(&actor).await?;
    }

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "http server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_admin_is_the_only_login_on_an_empty_store() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let auth = AuthService::new(users.clone(), JwtManager::new("secret".to_string(), 60));
        assert!(auth.login("admin@example.com", "admin123").await.is_err());

        let admin = BootstrapAdmin {
            email: "Owner@Example.com".to_string(),
            password: "owner-pass".to_string(),
        };
        ensure_bootstrap_admin(users.as_ref(), &admin)
            .await
            .expect("bootstrap");
        ensure_bootstrap_admin(users.as_ref(), &admin)
            .await
            .expect("bootstrap is idempotent");

        let stored = users.list_users().await.expect("users");
        assert_eq!(stored.len(), 1);
        assert!(stored[0].password.starts_with("$argon2"));
        let (user, _) = auth
            .login("owner@example.com", "owner-pass")
            .await
            .expect("login");
        assert_eq!(user.role, Role::Admin);
    }
}
