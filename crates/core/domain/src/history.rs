//! 重分配历史与变更日志条目。
//!
//! 重分配历史是容量固定的环形缓冲：满 10 条时先淘汰最旧一条再追加。
//! 变更日志不设上限。

use serde::{Deserialize, Serialize};

/// 重分配历史上限。
pub const MAX_REASSIGNMENT_HISTORY: usize = 10;

/// 一次 NVR 分配记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentEntry {
    pub nvr_id: String,
    pub date_ms: i64,
}

/// 字段级变更记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub actor: String,
    pub date_ms: i64,
    pub changes: String,
}

/// 追加一条重分配记录。
///
/// 已有条目引用同一 NVR 时不追加并返回 `false`。
pub fn push_reassignment(history: &mut Vec<ReassignmentEntry>, entry: ReassignmentEntry) -> bool {
    if history.iter().any(|existing| existing.nvr_id == entry.nvr_id) {
        return false;
    }
    while history.len() >= MAX_REASSIGNMENT_HISTORY {
        history.remove(0);
    }
    history.push(entry);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(nvr: usize) -> ReassignmentEntry {
        ReassignmentEntry {
            nvr_id: format!("nvr-{nvr}"),
            date_ms: nvr as i64,
        }
    }

    #[test]
    fn eleventh_entry_evicts_oldest() {
        let mut history = Vec::new();
        for nvr in 0..11 {
            assert!(push_reassignment(&mut history, entry(nvr)));
        }
        assert_eq!(history.len(), MAX_REASSIGNMENT_HISTORY);
        assert_eq!(history[0].nvr_id, "nvr-1");
        assert_eq!(history[9].nvr_id, "nvr-10");
        assert!(history.windows(2).all(|pair| pair[0].date_ms < pair[1].date_ms));
    }

    #[test]
    fn repeated_target_is_not_recorded_twice() {
        let mut history = vec![entry(1)];
        assert!(!push_reassignment(&mut history, entry(1)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn evicted_target_can_reappear() {
        let mut history = Vec::new();
        for nvr in 0..11 {
            push_reassignment(&mut history, entry(nvr));
        }
        assert!(push_reassignment(&mut history, entry(0)));
        assert_eq!(history.last().map(|e| e.nvr_id.as_str()), Some("nvr-0"));
        assert_eq!(history.len(), MAX_REASSIGNMENT_HISTORY);
    }
}
