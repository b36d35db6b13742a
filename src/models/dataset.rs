use crate::models::DetonationRecord;
use crate::processors::filter::{filter, DetonationView, FilterSet};

/// The full record set for a session. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct DetonationDataset {
    records: Vec<DetonationRecord>,
}

impl DetonationDataset {
    pub fn new(records: Vec<DetonationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DetonationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> DetonationView<'_> {
        DetonationView::all(&self.records)
    }

    pub fn filter(&self, filters: &FilterSet) -> DetonationView<'_> {
        filter(&self.records, filters)
    }
}

impl From<Vec<DetonationRecord>> for DetonationDataset {
    fn from(records: Vec<DetonationRecord>) -> Self {
        Self::new(records)
    }
}
