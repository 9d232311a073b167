use chrono::Datelike;
use serde::Serialize;

use crate::reblog::ReblogEntry;

/// Entries created in one calendar month (UTC).
#[derive(Debug, Clone, Serialize)]
pub struct MonthArchive {
    pub year: i32,
    pub month: u32,
    pub entries: Vec<ReblogEntry>,
}

impl MonthArchive {
    /// `YYYY-MM` label.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Bucket entries by creation month.
///
/// Expects entries newest first, as returned by the store listings. Input
/// order is kept inside each bucket and buckets appear in first-seen order.
pub fn group_by_month(entries: Vec<ReblogEntry>) -> Vec<MonthArchive> {
    let mut archives: Vec<MonthArchive> = Vec::new();

    for entry in entries {
        let (year, month) = (entry.created_at.year(), entry.created_at.month());
        match archives
            .iter_mut()
            .find(|a| a.year == year && a.month == month)
        {
            Some(archive) => archive.entries.push(entry),
            None => archives.push(MonthArchive {
                year,
                month,
                entries: vec![entry],
            }),
        }
    }

    archives
}
