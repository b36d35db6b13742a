use crate::models::labels::{lookup_country, lookup_purpose, lookup_type};
use crate::models::DetonationRecord;
use std::collections::BTreeMap;
use tracing::warn;
use validator::Validate;

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub missing_dates: usize,
    pub missing_coordinates: usize,
    pub zero_yield_records: usize,
    pub unmapped_countries: BTreeMap<String, usize>,
    pub unmapped_purposes: BTreeMap<String, usize>,
    pub unmapped_types: BTreeMap<String, usize>,
    pub violations: Vec<RecordViolation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.missing_dates == 0
            && self.missing_coordinates == 0
            && self.unmapped_countries.is_empty()
            && self.unmapped_purposes.is_empty()
            && self.unmapped_types.is_empty()
            && self.violations.is_empty()
    }

    pub fn unmapped_total(&self) -> usize {
        self.unmapped_countries.values().sum::<usize>()
            + self.unmapped_purposes.values().sum::<usize>()
            + self.unmapped_types.values().sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct RecordViolation {
    pub id: u32,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    CoordinatesOutOfRange,
}

/// Reports the row-level problems that loading silently recovered from.
pub struct IntegrityChecker {
    max_listed_violations: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            max_listed_violations: 10,
        }
    }

    pub fn with_max_listed_violations(max_listed_violations: usize) -> Self {
        Self {
            max_listed_violations,
        }
    }

    pub fn check_integrity(&self, records: &[DetonationRecord]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: records.len(),
            ..Default::default()
        };

        for record in records {
            self.check_record(record, &mut report);
        }

        if !report.is_clean() {
            warn!(
                missing_dates = report.missing_dates,
                missing_coordinates = report.missing_coordinates,
                unmapped = report.unmapped_total(),
                violations = report.violations.len(),
                "Dataset contains recovered or invalid rows"
            );
        }

        report
    }

    fn check_record(&self, record: &DetonationRecord, report: &mut IntegrityReport) {
        if record.date.is_none() {
            report.missing_dates += 1;
        }

        if record.coordinates().is_none() {
            report.missing_coordinates += 1;
        }

        if record.yield_kt == 0.0 {
            report.zero_yield_records += 1;
        }

        if lookup_country(&record.country_code).is_none() {
            *report
                .unmapped_countries
                .entry(record.country_code.clone())
                .or_insert(0) += 1;
        }
        if lookup_purpose(&record.purpose_code).is_none() {
            *report
                .unmapped_purposes
                .entry(record.purpose_code.clone())
                .or_insert(0) += 1;
        }
        if lookup_type(&record.type_code).is_none() {
            *report
                .unmapped_types
                .entry(record.type_code.clone())
                .or_insert(0) += 1;
        }

        // Only the coordinate ranges carry validation rules
        if let Err(e) = record.validate() {
            report.violations.push(RecordViolation {
                id: record.id,
                violation_type: ViolationType::CoordinatesOutOfRange,
                details: e.to_string(),
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Missing Dates: {} ({:.1}%)\n",
            report.missing_dates,
            percentage(report.missing_dates, report.total_records)
        ));
        summary.push_str(&format!(
            "Missing Coordinates: {} ({:.1}%)\n",
            report.missing_coordinates,
            percentage(report.missing_coordinates, report.total_records)
        ));
        summary.push_str(&format!(
            "Zero-Yield Records: {} ({:.1}%)\n",
            report.zero_yield_records,
            percentage(report.zero_yield_records, report.total_records)
        ));

        for (field, codes) in [
            ("country", &report.unmapped_countries),
            ("purpose", &report.unmapped_purposes),
            ("type", &report.unmapped_types),
        ] {
            if codes.is_empty() {
                continue;
            }
            summary.push_str(&format!("\nUnmapped {} codes:\n", field));
            for (code, count) in codes {
                let shown = if code.is_empty() { "<blank>" } else { code };
                summary.push_str(&format!("  {}: {}\n", shown, count));
            }
        }

        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str(&format!("\nTop {} Violations:\n", self.max_listed_violations));
            for (i, violation) in report
                .violations
                .iter()
                .take(self.max_listed_violations)
                .enumerate()
            {
                summary.push_str(&format!(
                    "  {}. Record {}: {}\n",
                    i + 1,
                    violation.id,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
