pub mod detonation_analyzer;

pub use detonation_analyzer::{
    CategoryCount, DecadeCountryTable, DetonationAnalyzer, DetonationSummary, GeographicBounds,
    YearCount, YieldStats,
};
