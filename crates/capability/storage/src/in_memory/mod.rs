//! 内存存储实现模块
//!
//! 用于本地演示（未配置数据库时）和测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - CameraStore: InMemoryCameraStore
//! - NvrStore: InMemoryNvrStore
//! - ProjectStore: InMemoryProjectStore

pub mod camera;
pub mod nvr;
pub mod project;
pub mod user;

pub use camera::*;
pub use nvr::*;
pub use project::*;
pub use user::*;
