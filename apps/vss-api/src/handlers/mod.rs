//! Handlers 模块

pub mod auth;
pub mod cameras;
pub mod metrics;
pub mod nvrs;
pub mod projects;
pub mod users;

pub use auth::*;
pub use cameras::*;
pub use metrics::*;
pub use nvrs::*;
pub use projects::*;
pub use users::*;
