use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

/// A cleaned text ready for publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    /// Document the text was extracted from
    pub url: String,
    pub text: String,
    pub source: String,
}

/// Result of a harvest run.
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Number of documents that were fetched or attempted
    pub attempted: usize,
    /// Accepted records, in the order their pages were discovered
    pub records: Vec<CleanedRecord>,
    /// Documents that yielded no record, with the reason
    pub failures: Vec<(String, HarvestError)>,
    /// Set when pagination stopped on a failed page
    pub interrupted: Option<HarvestError>,
}

impl HarvestReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Destination of the harvested records.
pub trait Publish {
    fn publish(&mut self, records: &[CleanedRecord]) -> anyhow::Result<()>;
}

impl Publish for Vec<CleanedRecord> {
    fn publish(&mut self, records: &[CleanedRecord]) -> anyhow::Result<()> {
        self.extend_from_slice(records);
        Ok(())
    }
}
