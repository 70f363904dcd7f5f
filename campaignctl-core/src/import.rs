//! Bulk contact import bookkeeping
//!
//! Items are attempted independently; the report collects successes and
//! failures without aborting the batch.

use serde::Serialize;

/// Message used when a phone number collides with an existing contact
pub const DUPLICATE_PHONE_MESSAGE: &str = "Phone number already exists";

/// One rejected import item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    /// Position in the submitted list (0-based)
    pub index: usize,
    /// Phone as submitted, for the caller to match up
    pub phone: String,
    pub error: String,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkImportReport {
    imported: usize,
    errors: Vec<ImportFailure>,
}

impl BulkImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.imported += 1;
    }

    pub fn record_failure(&mut self, index: usize, phone: impl Into<String>, error: impl Into<String>) {
        self.errors.push(ImportFailure {
            index,
            phone: phone.into(),
            error: error.into(),
        });
    }

    pub fn imported(&self) -> usize {
        self.imported
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    pub fn into_errors(self) -> Vec<ImportFailure> {
        self.errors
    }

    /// True when every item was imported
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message(&self) -> String {
        if self.is_complete() {
            format!("{} contacts imported successfully", self.imported)
        } else {
            format!("{} contacts imported, {} failed", self.imported, self.failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_succeed() {
        let mut report = BulkImportReport::new();
        for _ in 0..4 {
            report.record_success();
        }
        assert!(report.is_complete());
        assert_eq!(report.imported(), 4);
        assert_eq!(report.message(), "4 contacts imported successfully");
    }

    #[test]
    fn partial_failure() {
        let mut report = BulkImportReport::new();
        report.record_success();
        report.record_failure(1, "+100", DUPLICATE_PHONE_MESSAGE);
        report.record_success();
        report.record_failure(3, "+200", DUPLICATE_PHONE_MESSAGE);
        report.record_success();

        assert!(!report.is_complete());
        assert_eq!(report.imported(), 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.message(), "3 contacts imported, 2 failed");
        assert_eq!(report.into_errors()[1].index, 3);
    }

    #[test]
    fn empty_batch() {
        let report = BulkImportReport::new();
        assert!(report.is_complete());
        assert_eq!(report.message(), "0 contacts imported successfully");
    }
}
