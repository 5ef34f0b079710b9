//! 工具模块：响应构造、DTO 转换与路径参数校验

pub mod dto;
pub mod response;
pub mod validation;

pub use dto::*;
pub use validation::*;
