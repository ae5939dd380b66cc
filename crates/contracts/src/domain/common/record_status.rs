use serde::{Deserialize, Serialize};

/// Soft-delete status of a record.
///
/// Stored as the boolean `tp_status` column: `true` is [`RecordStatus::Active`],
/// `false` is [`RecordStatus::Deleted`]. Deleted records stay in the store and
/// are hidden from status-filtered reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

impl RecordStatus {
    pub fn from_tp_status(tp_status: bool) -> Self {
        if tp_status {
            RecordStatus::Active
        } else {
            RecordStatus::Deleted
        }
    }

    pub fn tp_status(self) -> bool {
        matches!(self, RecordStatus::Active)
    }

    pub fn is_active(self) -> bool {
        self.tp_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tp_status_mapping() {
        assert_eq!(RecordStatus::from_tp_status(true), RecordStatus::Active);
        assert_eq!(RecordStatus::from_tp_status(false), RecordStatus::Deleted);
        assert!(RecordStatus::Active.tp_status());
        assert!(!RecordStatus::Deleted.tp_status());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&RecordStatus::Deleted).unwrap();
        assert_eq!(json, "\"deleted\"");
    }
}
