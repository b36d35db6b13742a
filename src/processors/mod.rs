pub mod filter;
pub mod integrity_checker;

pub use filter::{filter, DateRange, DetonationView, FilterSet, Selection};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, RecordViolation, ViolationType};
