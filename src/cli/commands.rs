use crate::analyzers::DetonationAnalyzer;
use crate::cli::args::{Cli, Commands, ExportFormat, FilterArgs};
use crate::error::{ProcessingError, Result};
use crate::models::DetonationDataset;
use crate::processors::{DetonationView, FilterSet, IntegrityChecker};
use crate::readers::DetonationReader;
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

impl FilterArgs {
    pub fn to_filter_set(&self) -> Result<FilterSet> {
        let from = self.from.as_deref().map(parse_filter_date).transpose()?;
        let to = self.to.as_deref().map(parse_filter_date).transpose()?;

        Ok(FilterSet::new()
            .with_date_range(from, to)
            .with_countries(self.countries.iter().cloned())
            .with_purposes(self.purposes.iter().cloned())
            .with_types(self.types.iter().cloned()))
    }
}

fn parse_filter_date(value: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")?)
}

/// Install the tracing subscriber, to stderr or to a log file
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn resolve_input(cli_input: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    cli_input.or_else(|| settings.input.clone()).ok_or_else(|| {
        ProcessingError::Config(
            "No input file: pass --input or set `input` in the settings file".to_string(),
        )
    })
}

fn load_dataset(input: &Path, quiet: bool) -> Result<DetonationDataset> {
    let progress = ProgressReporter::new_spinner("Loading detonation records...", quiet);
    let dataset = DetonationReader::new().read_dataset(input)?;
    progress.finish_with_message(&format!("Loaded {} records", dataset.len()));
    Ok(dataset)
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let input = resolve_input(cli.input, &settings)?;
    let dataset = load_dataset(&input, cli.quiet)?;
    let analyzer = DetonationAnalyzer::new();

    match cli.command {
        Commands::Summary { filters, json } => {
            let view = dataset.filter(&filters.to_filter_set()?);
            let summary = analyzer.summarize(&view);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("{}", summary.summary());
            print_sample(&view, settings.sample);
        }

        Commands::Top { filters, count } => {
            let view = dataset.filter(&filters.to_filter_set()?);
            let n = count.unwrap_or(settings.top_n);

            if view.is_empty() {
                println!("No detonations match the current filters");
                return Ok(());
            }

            println!("Top {} detonations by yield:", n);
            for (i, record) in analyzer.top_n_by_yield(&view, n).iter().enumerate() {
                println!(
                    "{:>3}. {:>10.1} kt  {} ({})  {}  {}",
                    i + 1,
                    record.yield_kt,
                    record.country,
                    format_date(record.date),
                    record.type_label,
                    record.purpose_label
                );
            }
        }

        Commands::Pivot { filters } => {
            let view = dataset.filter(&filters.to_filter_set()?);
            print!("{}", analyzer.by_decade_country_count(&view).render());
        }

        Commands::Validate => {
            let checker = IntegrityChecker::new();
            let report = checker.check_integrity(dataset.records());
            println!("{}", checker.generate_summary(&report));

            if report.is_clean() {
                println!("All records loaded without fallbacks");
            } else {
                println!(
                    "{} missing dates, {} missing coordinates, {} unmapped codes, {} invalid records",
                    report.missing_dates,
                    report.missing_coordinates,
                    report.unmapped_total(),
                    report.violations.len()
                );
            }
        }

        Commands::Export {
            filters,
            output,
            format,
        } => {
            let view = dataset.filter(&filters.to_filter_set()?);

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            match format {
                ExportFormat::Csv => write_csv(&view, &output)?,
                ExportFormat::Json => write_json(&view, &output)?,
            }

            info!(records = view.len(), output = %output.display(), "Exported records");
            println!("Wrote {} records to {}", view.len(), output.display());
        }

        Commands::Options => {
            let view = dataset.all();

            println!("Countries: {}", analyzer.distinct_countries(&view).join(", "));
            println!("Purposes: {}", analyzer.distinct_purposes(&view).join(", "));
            println!("Types: {}", analyzer.distinct_types(&view).join(", "));
            match analyzer.date_bounds(&view) {
                Some((first, last)) => println!("Dates: {} to {}", first, last),
                None => println!("Dates: none"),
            }
        }
    }

    Ok(())
}

fn print_sample(view: &DetonationView<'_>, sample: usize) {
    if sample == 0 || view.is_empty() {
        return;
    }

    println!("\nSample Records (showing {} records):", sample.min(view.len()));
    for (i, record) in view.iter().take(sample).enumerate() {
        println!(
            "{}. #{} {} on {}: {:.1} kt ({}), {}",
            i + 1,
            record.id,
            record.country,
            format_date(record.date),
            record.yield_kt,
            record.yield_category,
            record.type_label
        );
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "unknown date".to_string(), |d| d.to_string())
}

/// Write a view as CSV with one row per record
pub fn write_csv(view: &DetonationView<'_>, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in view.iter() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a view as a pretty-printed JSON array
pub fn write_json(view: &DetonationView<'_>, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &view.to_records())?;
    Ok(())
}
