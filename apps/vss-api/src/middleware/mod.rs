//! 中间件与访问控制辅助函数

mod auth;

pub use auth::*;
