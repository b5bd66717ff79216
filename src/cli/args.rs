use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "synoptic-processor")]
#[command(about = "Aggregates station observation artifacts into hourly group tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Parquet,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate every monthly artifact in a directory into one table per group
    Process {
        #[arg(short, long, help = "Directory of <location>_<year>_<MM>_weather_data.json files")]
        input_dir: PathBuf,

        #[arg(short, long, help = "Directory for Weatherdata_processed_<group> tables")]
        output_dir: PathBuf,

        #[arg(short, long, help = "Parquet compression [default: from settings]")]
        compression: Option<String>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: OutputFormat,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Memory-map every artifact regardless of size")]
        mmap: bool,
    },

    /// Build the location reference table from a tab-separated gazetteer dump
    Geocode {
        #[arg(short, long, help = "GeoNames-style gazetteer file")]
        gazetteer: PathBuf,

        #[arg(short, long, help = "Reference CSV to write")]
        output: PathBuf,
    },

    /// Look up a location's coordinates in the reference table
    Locate {
        #[arg(short, long, help = "Reference CSV written by `geocode`")]
        reference: PathBuf,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, help = "First-level administrative code, e.g. CO")]
        admin_code: String,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
