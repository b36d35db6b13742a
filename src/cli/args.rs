use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "detonation-explorer")]
#[command(about = "Filter and summarize historical nuclear detonation records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: detonation-explorer.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Input CSV file (overrides settings)")]
    pub input: Option<PathBuf>,
}

/// Record filters shared by the reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Earliest date to include (YYYY-MM-DD)")]
    pub from: Option<String>,

    #[arg(long, help = "Latest date to include (YYYY-MM-DD)")]
    pub to: Option<String>,

    #[arg(long = "country", help = "Country label to keep (repeatable, 'All' for every country)")]
    pub countries: Vec<String>,

    #[arg(long = "purpose", help = "Purpose label to keep (repeatable)")]
    pub purposes: Vec<String>,

    #[arg(long = "type", help = "Type label to keep (repeatable)")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summary statistics for the filtered records
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },

    /// Largest detonations by yield
    Top {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short = 'n', long, help = "Number of records [default: settings top_n]")]
        count: Option<usize>,
    },

    /// Decade by country detonation counts
    Pivot {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Report rows that were recovered with fallback values
    Validate,

    /// Write the filtered records to a file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long, help = "Output file path")]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },

    /// List the selectable countries, purposes, types and date bounds
    Options,
}
