use chrono::NaiveDate;
use detonation_explorer::analyzers::{CategoryCount, DetonationAnalyzer, YieldStats};
use detonation_explorer::processors::{FilterSet, IntegrityChecker};
use detonation_explorer::readers::DetonationReader;
use detonation_explorer::utils::FALLBACK_LABEL;
use detonation_explorer::ProcessingError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use validator::Validate;

const SAMPLE_CSV: &str = "\
WEAPON SOURCE COUNTRY,WEAPON DEPLOYMENT LOCATION,Data.Source,Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Magnitude.Body,Data.Magnitude.Surface,Location.Cordinates.Depth,Data.Yeild.Lower,Data.Yeild.Upper,Data.Purpose,Data.Name,Data.Type,Date.Day,Date.Month,Date.Year
USA,Alamogordo,DOE,32.54,-105.57,0,0,-0.1,21,21,Wr,TRINITY,Tower,16,7,1945
USA,Hiroshima,DOE,34.23,132.27,0,0,-0.6,15,15,Combat,LITTLEBOY,Airdrop,6,8,1945
USSR,Semi Kazakh,DOE,48,76,0,0,0,22,22,Wr,,Surface,29,8,1949
UK,Monte Bello,UGS,-20.4,115.4,0,0,0,25,25,Wr,HURRICANE,Ship,3,10,1952
FRANCE,Reggane Alg,DOE,26.2,0.1,0,0,0,60,60,Wr,GERBOISE BLEUE,Tower,13,2,1960
USSR,Novaya Zemlya,DOE,73.85,54.5,0,0,0,50000,50000,Wr,TSAR BOMBA,Airdrop,30,10,1961
CHINA,Lop Nor,DOE,41.5,88.5,0,0,0,,22,Wr,,Tower,16,10,1964
PAKIST,Chagai,USGS,28.9,64.9,4.9,0,0,9,12,Wr/We,,Shaft,30,2,1998
";

fn write_sample() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(SAMPLE_CSV.as_bytes())
        .expect("Failed to write sample data");
    file
}

#[test]
fn test_load_filter_aggregate() {
    let file = write_sample();
    let dataset = DetonationReader::new()
        .read_dataset(file.path())
        .expect("Sample data should load");
    let analyzer = DetonationAnalyzer::new();

    assert_eq!(dataset.len(), 8);

    for record in dataset.records() {
        assert!(record.yield_kt >= 0.0 && record.yield_kt.is_finite());
        assert!(record.validate().is_ok());
    }

    // Lop Nor has no lower yield, Chagai's 1998-02-30 is not a real date
    let china = &dataset.records()[6];
    assert_eq!(china.yield_kt, 0.0);
    let pakistan = &dataset.records()[7];
    assert_eq!(pakistan.country, FALLBACK_LABEL);
    assert_eq!(pakistan.date, None);

    let soviet = dataset.filter(&FilterSet::new().with_countries(["Soviet Union"]));
    assert_eq!(analyzer.count(&soviet), 2);
    assert_eq!(
        analyzer.yield_stats(&soviet),
        YieldStats::Defined {
            max_kt: 50000.0,
            mean_kt: 25011.0,
            total_kt: 50022.0
        }
    );

    let top = analyzer.top_n_by_yield(&dataset.all(), 2);
    let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(names, vec!["Soviet Union", "France"]);
}

#[test]
fn test_country_counts_and_pivot() {
    let file = write_sample();
    let dataset = DetonationReader::new().read_dataset(file.path()).unwrap();
    let analyzer = DetonationAnalyzer::new();

    let counts = analyzer.by_country_count(&dataset.all());
    let expected: Vec<CategoryCount> = [
        ("Soviet Union", 2),
        ("United States", 2),
        ("China", 1),
        ("France", 1),
        ("Other", 1),
        ("United Kingdom", 1),
    ]
    .iter()
    .map(|&(label, count)| CategoryCount {
        label: label.to_string(),
        count,
    })
    .collect();
    assert_eq!(counts, expected);

    let pivot = analyzer.by_decade_country_count(&dataset.all());
    assert_eq!(pivot.decades(), &[1940, 1950, 1960]);
    assert_eq!(pivot.get(1940, "United States"), 2);
    assert_eq!(pivot.get(1950, "United States"), 0);
    assert_eq!(pivot.get(1960, "China"), 1);
    // The undated Pakistani test is not part of any decade
    assert_eq!(pivot.get(1990, "Other"), 0);
}

#[test]
fn test_date_range_and_timeline() {
    let file = write_sample();
    let dataset = DetonationReader::new().read_dataset(file.path()).unwrap();
    let analyzer = DetonationAnalyzer::new();

    let filters = FilterSet::new().with_date_range(
        NaiveDate::from_ymd_opt(1945, 8, 6),
        NaiveDate::from_ymd_opt(1960, 2, 13),
    );
    let view = dataset.filter(&filters);
    assert_eq!(view.ids(), vec![2, 3, 4, 5]);

    let timeline = analyzer.timeline(&view);
    assert_eq!(timeline.first().map(|p| (p.year, p.count)), Some((1945, 1)));
    assert_eq!(timeline.last().map(|p| (p.year, p.count)), Some((1960, 1)));
    assert_eq!(timeline.len(), 16);
    assert_eq!(timeline.iter().map(|p| p.count).sum::<usize>(), 4);
}

#[test]
fn test_filters_commute_on_loaded_data() {
    let file = write_sample();
    let dataset = DetonationReader::new().read_dataset(file.path()).unwrap();

    let by_country = FilterSet::new().with_countries(["United States", "Soviet Union"]);
    let by_type = FilterSet::new().with_types(["Airplane Deployed"]);

    let a = dataset.filter(&by_country).refine(&by_type);
    let b = dataset.filter(&by_type).refine(&by_country);

    assert_eq!(a, b);
    assert_eq!(a.ids(), vec![2, 6]);
    assert_eq!(dataset.filter(&FilterSet::new()), dataset.all());
}

#[test]
fn test_absent_country_gives_undefined_statistics() {
    let file = write_sample();
    let dataset = DetonationReader::new().read_dataset(file.path()).unwrap();
    let analyzer = DetonationAnalyzer::new();

    let view = dataset.filter(&FilterSet::new().with_countries(["India"]));
    let summary = analyzer.summarize(&view);

    assert_eq!(summary.total_records, 0);
    assert_eq!(summary.yield_stats, YieldStats::Undefined);
    assert!(summary.by_country.is_empty());
    assert!(summary.timeline.is_empty());
    assert!(summary.summary().contains("no detonations match"));
}

#[test]
fn test_integrity_report_on_loaded_data() {
    let file = write_sample();
    let dataset = DetonationReader::new().read_dataset(file.path()).unwrap();

    let report = IntegrityChecker::new().check_integrity(dataset.records());

    assert_eq!(report.missing_dates, 1);
    assert_eq!(report.missing_coordinates, 0);
    assert_eq!(report.zero_yield_records, 1);
    assert_eq!(report.unmapped_countries.get("PAKIST"), Some(&1));
    assert_eq!(report.unmapped_purposes.get("Wr/We"), Some(&1));
    assert!(report.violations.is_empty());
}

#[test]
fn test_schema_mismatch_is_fatal() {
    let csv = "Country,Purpose\nUSA,Wr\n";
    let result = DetonationReader::new().read_from(csv.as_bytes());

    assert!(matches!(result, Err(ProcessingError::MissingColumn(_))));
}
