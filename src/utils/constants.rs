/// Source column names
pub const COL_COUNTRY: &str = "WEAPON SOURCE COUNTRY";
pub const COL_PURPOSE: &str = "Data.Purpose";
pub const COL_TYPE: &str = "Data.Type";
pub const COL_LATITUDE: &str = "Location.Cordinates.Latitude";
pub const COL_LONGITUDE: &str = "Location.Cordinates.Longitude";
pub const COL_YIELD: &str = "Data.Yeild.Lower";
pub const COL_YEAR: &str = "Date.Year";
pub const COL_MONTH: &str = "Date.Month";
pub const COL_DAY: &str = "Date.Day";
pub const COL_DATE: &str = "Date";

/// Accepted layouts for a combined date column
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

/// Label for codes absent from a lookup table
pub const FALLBACK_LABEL: &str = "Other";

/// Selection entry meaning "no restriction"
pub const ALL_SENTINEL: &str = "All";

/// Yield category breakpoints in kilotons (right-closed intervals)
pub const YIELD_BREAKPOINTS_KT: [f64; 4] = [1.0, 10.0, 100.0, 1000.0];

/// Processing defaults
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_SAMPLE: usize = 5;
pub const DEFAULT_SETTINGS_FILE: &str = "detonation-explorer.toml";
pub const ENV_PREFIX: &str = "DETONATION";
