use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::models::DetonationRecord;
use crate::utils::constants::ALL_SENTINEL;

/// Inclusive date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Records without a date never match an active range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if !self.is_active() {
            return true;
        }

        match date {
            Some(d) => {
                self.from.map_or(true, |from| d >= from) && self.to.map_or(true, |to| d <= to)
            }
            None => false,
        }
    }
}

/// A set of labels to keep. Empty, or containing the "All" sentinel, keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    labels: BTreeSet<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Empty, or naming the "All" sentinel in any letter case
    pub fn is_unrestricted(&self) -> bool {
        self.labels.is_empty()
            || self
                .labels
                .iter()
                .any(|label| label.trim().eq_ignore_ascii_case(ALL_SENTINEL))
    }

    pub fn allows(&self, label: &str) -> bool {
        self.is_unrestricted() || self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Predicates combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub date_range: DateRange,
    pub countries: Selection,
    pub purposes: Selection,
    pub types: Selection,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(from, to);
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = Selection::of(countries);
        self
    }

    pub fn with_purposes<I, S>(mut self, purposes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.purposes = Selection::of(purposes);
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Selection::of(types);
        self
    }

    /// True when no predicate restricts anything.
    pub fn is_empty(&self) -> bool {
        !self.date_range.is_active()
            && self.countries.is_unrestricted()
            && self.purposes.is_unrestricted()
            && self.types.is_unrestricted()
    }

    pub fn matches(&self, record: &DetonationRecord) -> bool {
        self.date_range.contains(record.date)
            && self.countries.allows(&record.country)
            && self.purposes.allows(&record.purpose_label)
            && self.types.allows(&record.type_label)
    }
}

/// A filtered view over an immutable record slice.
///
/// Holds indices into the base slice in their original order, so building
/// a view never copies or mutates records.
#[derive(Debug, Clone)]
pub struct DetonationView<'a> {
    records: &'a [DetonationRecord],
    indices: Vec<usize>,
}

impl<'a> DetonationView<'a> {
    pub fn all(records: &'a [DetonationRecord]) -> Self {
        Self {
            records,
            indices: (0..records.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a DetonationRecord> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn ids(&self) -> Vec<u32> {
        self.iter().map(|r| r.id).collect()
    }

    /// Narrow this view further. The base slice is shared, not copied.
    pub fn refine(&self, filters: &FilterSet) -> DetonationView<'a> {
        let records = self.records;
        let indices: Vec<usize> = self
            .indices
            .iter()
            .copied()
            .filter(|&i| filters.matches(&records[i]))
            .collect();

        debug!(
            kept = indices.len(),
            from = self.indices.len(),
            "Applied detonation filters"
        );

        DetonationView { records, indices }
    }

    pub fn to_records(&self) -> Vec<DetonationRecord> {
        self.iter().cloned().collect()
    }
}

impl PartialEq for DetonationView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.records, other.records) && self.indices == other.indices
    }
}

/// Apply a filter set to the full record slice.
pub fn filter<'a>(records: &'a [DetonationRecord], filters: &FilterSet) -> DetonationView<'a> {
    DetonationView::all(records).refine(filters)
}
