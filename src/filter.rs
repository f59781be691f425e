use crate::results::{PageRecord, RecordStatus};

/// Whether a record belongs in the report: `found` with non-empty markup
pub fn is_reportable(record: &PageRecord) -> bool {
    record.status == RecordStatus::Found && record.html().is_some()
}

/// Reportable records, in their original order
pub fn reportable(records: &[PageRecord]) -> Vec<&PageRecord> {
    records.iter().filter(|r| is_reportable(r)).collect()
}
