//! 摄像头字段级变更记录。

use domain::ChangeLogEntry;

const MASK: &str = "***";

/// 一次更新中累计的变更描述。
#[derive(Debug, Default)]
pub(crate) struct ChangeSet {
    descriptions: Vec<String>,
}

impl ChangeSet {
    pub(crate) fn text(&mut self, field: &str, slot: &mut String, value: String) {
        if *slot != value {
            self.push(field, slot, &value);
            *slot = value;
        }
    }

    pub(crate) fn optional_text(&mut self, field: &str, slot: &mut Option<String>, value: Option<String>) {
        if *slot != value {
            self.push(
                field,
                slot.as_deref().unwrap_or_default(),
                value.as_deref().unwrap_or_default(),
            );
            *slot = value;
        }
    }

    /// 口令类字段，新旧值都以掩码记录。
    pub(crate) fn secret(&mut self, field: &str, slot: &mut Option<String>, value: Option<String>) {
        if *slot != value {
            let masked = |value: &Option<String>| if value.is_some() { MASK } else { "" };
            self.push(field, masked(&*slot), masked(&value));
            *slot = value;
        }
    }

    pub(crate) fn number(&mut self, field: &str, slot: &mut Option<i32>, value: i32) {
        if *slot != Some(value) {
            let old = slot.map(|old| old.to_string()).unwrap_or_default();
            self.push(field, &old, &value.to_string());
            *slot = Some(value);
        }
    }

    /// 记录引用变化（值已由调用方应用）。
    pub(crate) fn reference(&mut self, field: &str, old: Option<&str>, new: Option<&str>) {
        if old != new {
            self.push(field, old.unwrap_or_default(), new.unwrap_or_default());
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub(crate) fn into_entry(self, actor: &str, date_ms: i64) -> ChangeLogEntry {
        ChangeLogEntry {
            actor: actor.to_string(),
            date_ms,
            changes: self.descriptions.join("; "),
        }
    }

    fn push(&mut self, field: &str, old: &str, new: &str) {
        self.descriptions.push(format!("{field}: '{old}' -> '{new}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_values_record_nothing() {
        let mut changes = ChangeSet::default();
        let mut name = "Gate".to_string();
        let mut fps = Some(30);
        changes.text("name", &mut name, "Gate".to_string());
        changes.number("fps", &mut fps, 30);
        changes.reference("nvr", Some("a"), Some("a"));
        assert!(changes.is_empty());
    }

    #[test]
    fn descriptions_are_joined_and_passwords_masked() {
        let mut changes = ChangeSet::default();
        let mut name = "Gate".to_string();
        let mut password = Some("old-secret".to_string());
        let mut firmware = None;
        changes.text("name", &mut name, "Lobby".to_string());
        changes.secret("password", &mut password, Some("new-secret".to_string()));
        changes.optional_text("firmware", &mut firmware, Some("v2".to_string()));

        let entry = changes.into_entry("user-1", 42);
        assert_eq!(
            entry.changes,
            "name: 'Gate' -> 'Lobby'; password: '***' -> '***'; firmware: '' -> 'v2'"
        );
        assert_eq!(entry.actor, "user-1");
        assert_eq!(entry.date_ms, 42);
        assert_eq!(name, "Lobby");
        assert_eq!(password.as_deref(), Some("new-secret"));
    }
}
