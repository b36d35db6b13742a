use crate::error::{ProcessingError, Result};
use crate::models::{DetonationDataset, DetonationRecord};
use crate::models::labels::{lookup_country, lookup_purpose, lookup_type};
use crate::utils::constants::*;
use crate::utils::coordinates::parse_coordinate;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Where the date lives in the source layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateColumns {
    Components { year: usize, month: usize, day: usize },
    Combined(usize),
}

/// Resolved positions of every required column
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    country: usize,
    purpose: usize,
    kind: usize,
    latitude: usize,
    longitude: usize,
    yield_kt: usize,
    date: DateColumns,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };

        let date = match (find(COL_YEAR), find(COL_MONTH), find(COL_DAY), find(COL_DATE)) {
            (Some(year), Some(month), Some(day), _) => DateColumns::Components { year, month, day },
            (None, None, None, Some(combined)) => DateColumns::Combined(combined),
            (None, None, None, None) => {
                return Err(ProcessingError::MissingColumn(format!(
                    "{} (or {})",
                    COL_YEAR, COL_DATE
                )))
            }
            // Partial component set: report the first absent one
            _ => DateColumns::Components {
                year: require(COL_YEAR)?,
                month: require(COL_MONTH)?,
                day: require(COL_DAY)?,
            },
        };

        Ok(Self {
            country: require(COL_COUNTRY)?,
            purpose: require(COL_PURPOSE)?,
            kind: require(COL_TYPE)?,
            latitude: require(COL_LATITUDE)?,
            longitude: require(COL_LONGITUDE)?,
            yield_kt: require(COL_YIELD)?,
            date,
        })
    }
}

pub struct DetonationReader {
    delimiter: u8,
}

impl DetonationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read and normalize every record in a CSV file
    pub fn read_records(&self, path: &Path) -> Result<Vec<DetonationRecord>> {
        info!(path = %path.display(), "Loading detonation records");
        let file = File::open(path)?;
        self.read_from(file)
    }

    /// Read a CSV file into an immutable dataset
    pub fn read_dataset(&self, path: &Path) -> Result<DetonationDataset> {
        Ok(DetonationDataset::new(self.read_records(path)?))
    }

    /// Read and normalize records from any CSV source
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<DetonationRecord>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        let mut missing_dates = 0usize;
        let mut defaulted_yields = 0usize;
        let mut unmapped_codes = 0usize;
        let mut missing_coordinates = 0usize;

        for (index, row_result) in reader.records().enumerate() {
            let row = row_result?;
            let row_number = index + 1;

            let record = self.parse_row(&row, row_number, &columns)?;

            if record.date.is_none() {
                missing_dates += 1;
                debug!(row = row_number, "Unparseable date, stored as missing");
            }
            if record.coordinates().is_none() {
                missing_coordinates += 1;
                debug!(
                    row = row_number,
                    latitude = cell(&row, columns.latitude),
                    longitude = cell(&row, columns.longitude),
                    "Unreadable coordinates, stored as missing"
                );
            }
            if parse_yield(cell(&row, columns.yield_kt)).is_none() {
                defaulted_yields += 1;
                debug!(row = row_number, "Missing yield, defaulted to 0 kt");
            }
            if lookup_country(&record.country_code).is_none()
                || lookup_purpose(&record.purpose_code).is_none()
                || lookup_type(&record.type_code).is_none()
            {
                unmapped_codes += 1;
                debug!(
                    row = row_number,
                    country = %record.country_code,
                    purpose = %record.purpose_code,
                    kind = %record.type_code,
                    "Unmapped code replaced with fallback label"
                );
            }

            records.push(record);
        }

        info!(
            records = records.len(),
            missing_dates,
            missing_coordinates,
            defaulted_yields,
            unmapped_codes,
            "Loaded detonation records"
        );

        Ok(records)
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        row_number: usize,
        columns: &ColumnIndex,
    ) -> Result<DetonationRecord> {
        let id = u32::try_from(row_number).map_err(|_| ProcessingError::InvalidFormat {
            row: row_number,
            column: "row".to_string(),
            value: row_number.to_string(),
        })?;

        let date = match columns.date {
            DateColumns::Components { year, month, day } => {
                date_from_components(cell(row, year), cell(row, month), cell(row, day))
            }
            DateColumns::Combined(idx) => parse_combined_date(cell(row, idx)),
        };

        Ok(DetonationRecord::new(
            id,
            cell(row, columns.country),
            cell(row, columns.purpose),
            cell(row, columns.kind),
            date,
            parse_coordinate(cell(row, columns.latitude)),
            parse_coordinate(cell(row, columns.longitude)),
            parse_yield(cell(row, columns.yield_kt)),
        ))
    }
}

impl Default for DetonationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

/// Whole numbers, tolerating a trailing ".0" as written by spreadsheet exports
fn parse_whole<T: TryFrom<i64>>(value: &str) -> Option<T> {
    let value = value.trim();
    let whole = match value.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let float = value.parse::<f64>().ok()?;
            if !float.is_finite() || float.fract() != 0.0 {
                return None;
            }
            float as i64
        }
    };
    T::try_from(whole).ok()
}

/// Build a date from separate year/month/day cells. Invalid dates are `None`.
pub fn date_from_components(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(parse_whole(year)?, parse_whole(month)?, parse_whole(day)?)
}

/// Parse a combined date cell, ignoring any time-of-day suffix
pub fn parse_combined_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split(|c: char| c == 'T' || c.is_whitespace()).next()?;

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

fn parse_yield(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YieldCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "WEAPON SOURCE COUNTRY,Data.Purpose,Data.Type,Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Yeild.Lower,Date.Year,Date.Month,Date.Day";

    #[test]
    fn test_read_records_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "USA,Wr,Tower,32.54,-105.57,21,1945,7,16")?;
        writeln!(temp_file, "USSR,Wr,Tower,48,76,22,1949,8,29")?;

        let reader = DetonationReader::new();
        let records = reader.read_records(temp_file.path())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].country, "United States");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(1945, 7, 16));
        assert_eq!(records[0].decade, Some(1940));
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].country, "Soviet Union");
        assert_eq!(records[1].yield_kt, 22.0);

        Ok(())
    }

    #[test]
    fn test_row_level_problems_are_recovered() -> Result<()> {
        let csv = format!(
            "{}\nPAKIST,Xx,Cavity,28.8,64.9,,1998,2,30\nFRANCE,Se,Shaft,-21.8,-138.9,abc,1975,6,5\n",
            HEADER
        );

        let records = DetonationReader::new().read_from(csv.as_bytes())?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, FALLBACK_LABEL);
        assert_eq!(records[0].purpose_label, FALLBACK_LABEL);
        assert_eq!(records[0].type_label, FALLBACK_LABEL);
        assert_eq!(records[0].date, None);
        assert_eq!(records[0].decade, None);
        assert_eq!(records[0].yield_kt, 0.0);
        assert_eq!(records[0].yield_category, YieldCategory::Under1Kt);
        assert_eq!(records[1].yield_kt, 0.0);
        assert_eq!(records[1].year, Some(1975));

        Ok(())
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "WEAPON SOURCE COUNTRY,Data.Purpose,Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Yeild.Lower,Date.Year,Date.Month,Date.Day\nUSA,Wr,1,2,3,1945,7,16\n";

        match DetonationReader::new().read_from(csv.as_bytes()) {
            Err(ProcessingError::MissingColumn(column)) => assert_eq!(column, COL_TYPE),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_date_components_are_fatal() {
        let csv = "WEAPON SOURCE COUNTRY,Data.Purpose,Data.Type,Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Yeild.Lower,Date.Year,Date.Day\nUSA,Wr,Tower,1,2,3,1945,16\n";

        match DetonationReader::new().read_from(csv.as_bytes()) {
            Err(ProcessingError::MissingColumn(column)) => assert_eq!(column, COL_MONTH),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_combined_date_column() -> Result<()> {
        let csv = "WEAPON SOURCE COUNTRY,Data.Purpose,Data.Type,Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Yeild.Lower,Date\n\
                   UK,Wr,Airdrop,-1.5,-157.3,1800,1957-05-15\n\
                   CHINA,Wr,Tower,40.8,89.8,22,10/16/1964\n\
                   INDIA,Pne,Shaft,27.1,71.8,8,not a date\n";

        let records = DetonationReader::new().read_from(csv.as_bytes())?;

        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(1957, 5, 15));
        assert_eq!(records[0].yield_category, YieldCategory::Over1000Kt);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(1964, 10, 16));
        assert_eq!(records[2].date, None);
        assert_eq!(records[2].purpose_label, "Peaceful Nuclear Explosion");

        Ok(())
    }

    #[test]
    fn test_unreadable_coordinates_are_recovered() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(temp_file, "USA,Wr,Tower,32.54,-105.57,21,1945,7,16")?;
        writeln!(temp_file, "USSR,Wr,Tower,,76,22,1949,8,29")?;
        writeln!(temp_file, "UK,Wr,Ship,north,115.4,25,1952,10,3")?;

        let records = DetonationReader::new().read_records(temp_file.path())?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].coordinates(), Some((32.54, -105.57)));
        assert_eq!(records[1].latitude, None);
        assert_eq!(records[1].longitude, Some(76.0));
        assert_eq!(records[1].country, "Soviet Union");
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(1949, 8, 29));
        assert_eq!(records[2].latitude, None);
        assert_eq!(records[2].coordinates(), None);

        Ok(())
    }

    #[test]
    fn test_semicolon_delimiter() -> Result<()> {
        let csv = format!("{}\nUSA;Wr;Tower;37.1;-116.0;1.5;1962;7;6\n", HEADER.replace(',', ";"));

        let records = DetonationReader::with_delimiter(b';').read_from(csv.as_bytes())?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].yield_category, YieldCategory::From1To10Kt);

        Ok(())
    }

    #[test]
    fn test_date_helpers() {
        assert_eq!(
            date_from_components("1945", "7", "16"),
            NaiveDate::from_ymd_opt(1945, 7, 16)
        );
        assert_eq!(
            date_from_components("1945.0", "7.0", "16"),
            NaiveDate::from_ymd_opt(1945, 7, 16)
        );
        assert_eq!(date_from_components("1945", "13", "1"), None);
        assert_eq!(date_from_components("", "7", "16"), None);
        assert_eq!(
            parse_combined_date("1962-07-06 00:00:00"),
            NaiveDate::from_ymd_opt(1962, 7, 6)
        );
        assert_eq!(parse_combined_date("19620706"), NaiveDate::from_ymd_opt(1962, 7, 6));
        assert_eq!(parse_combined_date(""), None);
    }

    #[test]
    fn test_missing_file() {
        let reader = DetonationReader::new();
        let result = reader.read_records(Path::new("does/not/exist.csv"));

        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }
}
