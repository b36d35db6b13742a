pub mod analyzers;
pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;

pub use analyzers::{DetonationAnalyzer, DetonationSummary, YieldStats};
pub use error::{ProcessingError, Result};
pub use models::{DetonationDataset, DetonationRecord, YieldCategory};
pub use processors::{filter, DetonationView, FilterSet};
pub use readers::DetonationReader;
