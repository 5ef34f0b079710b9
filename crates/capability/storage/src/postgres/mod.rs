//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入
//! 2. **唯一约束在库内**：唯一索引冲突转换为 `StorageError::duplicate`
//! 3. **整条替换**：`replace_*` 覆盖可变列，跨表一致性由 inventory 能力维护
//! 4. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 包含的实现
//!
//! - **UserStore** (`user.rs`)
//! - **CameraStore** (`camera.rs`)：重分配历史、变更日志为 jsonb
//! - **NvrStore** (`nvr.rs`)：摄像头集合为 text[]
//! - **ProjectStore** (`project.rs`)：成员列表为 text[]
//!
//! ## 数据库模式
//!
//! 见 `migrations/0001_init.sql`。
//!
//! ## 事务支持
//!
//! 当前实现不使用事务；多实体写入的失败由 inventory 层按逆序补偿。

pub mod camera;
pub mod nvr;
pub mod project;
pub mod user;

pub use camera::*;
pub use nvr::*;
pub use project::*;
pub use user::*;
