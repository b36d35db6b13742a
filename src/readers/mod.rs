pub mod detonation_reader;

pub use detonation_reader::{date_from_components, parse_combined_date, DetonationReader};
