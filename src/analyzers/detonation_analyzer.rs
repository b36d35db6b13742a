use crate::models::DetonationRecord;
use crate::processors::filter::DetonationView;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

/// Yield statistics over a view. `Undefined` means the view was empty,
/// which is different from a view whose yields are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum YieldStats {
    Undefined,
    Defined {
        max_kt: f64,
        mean_kt: f64,
        total_kt: f64,
    },
}

impl YieldStats {
    pub fn is_defined(&self) -> bool {
        matches!(self, YieldStats::Defined { .. })
    }

    pub fn max_kt(&self) -> Option<f64> {
        match self {
            YieldStats::Defined { max_kt, .. } => Some(*max_kt),
            YieldStats::Undefined => None,
        }
    }

    pub fn mean_kt(&self) -> Option<f64> {
        match self {
            YieldStats::Defined { mean_kt, .. } => Some(*mean_kt),
            YieldStats::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeographicBounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Decade × country pivot. Combinations with no detonations read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecadeCountryTable {
    decades: Vec<i32>,
    countries: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl DecadeCountryTable {
    pub fn decades(&self) -> &[i32] {
        &self.decades
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn is_empty(&self) -> bool {
        self.decades.is_empty()
    }

    pub fn get(&self, decade: i32, country: &str) -> usize {
        let row = self.decades.iter().position(|&d| d == decade);
        let col = self.countries.iter().position(|c| c == country);

        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn decade_total(&self, decade: i32) -> usize {
        self.decades
            .iter()
            .position(|&d| d == decade)
            .map_or(0, |r| self.counts[r].iter().sum())
    }

    /// Plain-text rendering with one row per decade
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No dated detonations".to_string();
        }

        let widths: Vec<usize> = self.countries.iter().map(|c| c.len().max(5)).collect();
        let mut out = String::new();

        let _ = write!(out, "{:<8}", "Decade");
        for (country, width) in self.countries.iter().zip(&widths) {
            let _ = write!(out, " {:>w$}", country, w = *width);
        }
        out.push('\n');

        for (decade, row) in self.decades.iter().zip(&self.counts) {
            let _ = write!(out, "{:<8}", format!("{}s", decade));
            for (count, width) in row.iter().zip(&widths) {
                let _ = write!(out, " {:>w$}", count, w = *width);
            }
            out.push('\n');
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetonationSummary {
    pub total_records: usize,
    pub yield_stats: YieldStats,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub by_country: Vec<CategoryCount>,
    pub by_purpose: Vec<CategoryCount>,
    pub by_type: Vec<CategoryCount>,
    pub timeline: Vec<YearCount>,
    pub geographic_bounds: Option<GeographicBounds>,
}

impl DetonationSummary {
    pub fn summary(&self) -> String {
        let yields = match self.yield_stats {
            YieldStats::Defined {
                max_kt,
                mean_kt,
                total_kt,
            } => format!(
                "Average Yield: {:.1} kt\nMaximum Yield: {:.1} kt\nTotal Yield: {:.1} kt",
                mean_kt, max_kt, total_kt
            ),
            YieldStats::Undefined => "Yield: no detonations match the current filters".to_string(),
        };

        let dates = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "No dated detonations".to_string(),
        };

        let mut out = format!(
            "Total Detonations: {}\n{}\nDate Range: {}",
            self.total_records, yields, dates
        );

        if let Some(bounds) = self.geographic_bounds {
            let _ = write!(
                out,
                "\nCoverage: {:.1}..{:.1} lat, {:.1}..{:.1} lon",
                bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
            );
        }

        for (title, counts) in [
            ("Country", &self.by_country),
            ("Purpose", &self.by_purpose),
            ("Type", &self.by_type),
        ] {
            if counts.is_empty() {
                continue;
            }
            let _ = write!(out, "\n\nDetonations by {}:", title);
            for entry in counts {
                let _ = write!(out, "\n  {:<28} {:>6}", entry.label, entry.count);
            }
        }

        if !self.timeline.is_empty() {
            out.push_str("\n\nTimeline:");
            for point in &self.timeline {
                let _ = write!(out, "\n  {} {:>5}", point.year, point.count);
            }
        }

        out
    }
}

pub struct DetonationAnalyzer;

impl DetonationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn count(&self, view: &DetonationView<'_>) -> usize {
        view.len()
    }

    pub fn yield_stats(&self, view: &DetonationView<'_>) -> YieldStats {
        if view.is_empty() {
            return YieldStats::Undefined;
        }

        let mut max_kt = f64::NEG_INFINITY;
        let mut total_kt = 0.0f64;
        for record in view.iter() {
            max_kt = max_kt.max(record.yield_kt);
            total_kt += record.yield_kt;
        }

        YieldStats::Defined {
            max_kt,
            mean_kt: total_kt / view.len() as f64,
            total_kt,
        }
    }

    /// Counts per country label, largest first, ties alphabetical
    pub fn by_country_count(&self, view: &DetonationView<'_>) -> Vec<CategoryCount> {
        count_by(view, |r| r.country.as_str())
    }

    pub fn by_purpose_count(&self, view: &DetonationView<'_>) -> Vec<CategoryCount> {
        count_by(view, |r| r.purpose_label.as_str())
    }

    pub fn by_type_count(&self, view: &DetonationView<'_>) -> Vec<CategoryCount> {
        count_by(view, |r| r.type_label.as_str())
    }

    pub fn by_decade_country_count(&self, view: &DetonationView<'_>) -> DecadeCountryTable {
        let mut cells: BTreeMap<i32, HashMap<&str, usize>> = BTreeMap::new();
        let mut countries: BTreeSet<&str> = BTreeSet::new();

        for record in view.iter() {
            let Some(decade) = record.decade else {
                continue;
            };
            *cells
                .entry(decade)
                .or_default()
                .entry(record.country.as_str())
                .or_insert(0) += 1;
            countries.insert(record.country.as_str());
        }

        let countries: Vec<&str> = countries.into_iter().collect();
        let counts: Vec<Vec<usize>> = cells
            .values()
            .map(|row| {
                countries
                    .iter()
                    .map(|c| row.get(c).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        DecadeCountryTable {
            decades: cells.keys().copied().collect(),
            countries: countries.into_iter().map(String::from).collect(),
            counts,
        }
    }

    /// Detonations per calendar year, ascending. Years between the first and
    /// last dated detonation with no activity appear with a zero count.
    pub fn timeline(&self, view: &DetonationView<'_>) -> Vec<YearCount> {
        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
        for year in view.iter().filter_map(|r| r.year) {
            *per_year.entry(year).or_insert(0) += 1;
        }

        let (Some(&first), Some(&last)) = (per_year.keys().next(), per_year.keys().next_back())
        else {
            return Vec::new();
        };

        (first..=last)
            .map(|year| YearCount {
                year,
                count: per_year.get(&year).copied().unwrap_or(0),
            })
            .collect()
    }

    /// The `n` largest detonations. Equal yields keep their original order.
    pub fn top_n_by_yield<'a>(
        &self,
        view: &DetonationView<'a>,
        n: usize,
    ) -> Vec<&'a DetonationRecord> {
        let mut ranked: Vec<&'a DetonationRecord> = view.iter().collect();
        ranked.sort_by(|a, b| b.yield_kt.total_cmp(&a.yield_kt));
        ranked.truncate(n);
        ranked
    }

    pub fn date_bounds(&self, view: &DetonationView<'_>) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = view.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    pub fn distinct_countries(&self, view: &DetonationView<'_>) -> Vec<String> {
        distinct(view, |r| r.country.as_str())
    }

    pub fn distinct_purposes(&self, view: &DetonationView<'_>) -> Vec<String> {
        distinct(view, |r| r.purpose_label.as_str())
    }

    pub fn distinct_types(&self, view: &DetonationView<'_>) -> Vec<String> {
        distinct(view, |r| r.type_label.as_str())
    }

    /// Bounding box of the located detonations; records without coordinates are skipped
    pub fn geographic_bounds(&self, view: &DetonationView<'_>) -> Option<GeographicBounds> {
        let mut points = view.iter().filter_map(|r| r.coordinates());
        let (lat, lon) = points.next()?;

        let init = GeographicBounds {
            min_lat: lat,
            max_lat: lat,
            min_lon: lon,
            max_lon: lon,
        };

        Some(points.fold(init, |b, (lat, lon)| GeographicBounds {
            min_lat: b.min_lat.min(lat),
            max_lat: b.max_lat.max(lat),
            min_lon: b.min_lon.min(lon),
            max_lon: b.max_lon.max(lon),
        }))
    }

    pub fn summarize(&self, view: &DetonationView<'_>) -> DetonationSummary {
        DetonationSummary {
            total_records: self.count(view),
            yield_stats: self.yield_stats(view),
            date_range: self.date_bounds(view),
            by_country: self.by_country_count(view),
            by_purpose: self.by_purpose_count(view),
            by_type: self.by_type_count(view),
            timeline: self.timeline(view),
            geographic_bounds: self.geographic_bounds(view),
        }
    }
}

impl Default for DetonationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn count_by<'a, F>(view: &DetonationView<'a>, key: F) -> Vec<CategoryCount>
where
    F: Fn(&'a DetonationRecord) -> &'a str,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for record in view.iter() {
        *counts.entry(key(record)).or_insert(0) += 1;
    }

    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by_key(|&(label, count)| (Reverse(count), label));

    sorted
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn distinct<'a, F>(view: &DetonationView<'a>, key: F) -> Vec<String>
where
    F: Fn(&'a DetonationRecord) -> &'a str,
{
    view.iter()
        .map(key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
