//! 领域模型：角色、调用方上下文、重分配历史与格式规则。

pub mod access;
pub mod format;
pub mod history;

pub use access::{AccessError, Role, UserContext, authorize};
pub use format::{is_valid_email, is_valid_mac};
pub use history::{ChangeLogEntry, MAX_REASSIGNMENT_HISTORY, ReassignmentEntry, push_reassignment};
