pub mod dataset;
pub mod detonation;
pub mod labels;

pub use dataset::DetonationDataset;
pub use detonation::{clean_yield, decade_of, DetonationRecord, YieldCategory};
pub use labels::{country_label, purpose_label, type_label};
