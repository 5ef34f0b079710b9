use vss_config::{AppConfig, DEFAULT_IMPORT_MAX_BYTES};

// 环境变量为进程级共享状态，所有断言放在同一个测试中顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::remove_var("VSS_JWT_SECRET");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::set_var("VSS_JWT_SECRET", "secret");
        std::env::set_var("VSS_HTTP_ADDR", "127.0.0.1:8081");
        std::env::remove_var("VSS_DATABASE_URL");
        std::env::remove_var("VSS_JWT_TTL_SECONDS");
        std::env::remove_var("VSS_IMPORT_MAX_BYTES");
        std::env::set_var("VSS_SEED_DEMO", "true");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert!(config.database_url.is_none());
    assert_eq!(config.jwt_ttl_seconds, 3600);
    assert_eq!(config.import_max_bytes, DEFAULT_IMPORT_MAX_BYTES);
    assert!(config.seed_demo);

    unsafe {
        std::env::set_var("VSS_JWT_TTL_SECONDS", "soon");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::set_var("VSS_JWT_TTL_SECONDS", "600");
        std::env::set_var("VSS_BOOTSTRAP_ADMIN_EMAIL", "root@example.com");
        std::env::remove_var("VSS_BOOTSTRAP_ADMIN_PASSWORD");
    }
    assert!(AppConfig::from_env().is_err());

    unsafe {
        std::env::set_var("VSS_BOOTSTRAP_ADMIN_PASSWORD", "changeme");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.jwt_ttl_seconds, 600);
    let admin = config.bootstrap_admin.expect("bootstrap admin");
    assert_eq!(admin.email, "root@example.com");
}
