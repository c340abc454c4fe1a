use clap::{Parser, ValueEnum};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use autolin_meta::samples::DEFAULT_MATUTILS;
use autolin_meta::weights::{DEFAULT_CATEGORIES, DEFAULT_UNKNOWN_WEIGHT};

#[derive(Parser)]
#[command(author, version, about = "Weigh tree samples by a metadata phenotype", long_about = None)]
pub struct Cli {
    /// Path to the tab separated metadata file, plain or gzip. Sample ID in the first column
    #[arg(short='m', long="metadata-file", visible_alias="metadata_file", required = true)]
    pub metadata_file: PathBuf,
    /// Path to the mutation annotated tree
    #[arg(short='t', long="mat", required = true)]
    pub mat: PathBuf,
    /// Name of the metadata column holding the phenotype
    #[arg(short='c', long="column-name", required = true)]
    pub column_name: String,
    /// Combined output table. Sample/Phenotype and Sample/Weight tables are written beside it
    #[arg(short='o', long="output-file", visible_alias="output_file", required = true)]
    pub output_file: PathBuf,
    /// Weigh by phenotype 'frequency' (rare is heavy) or by rank on an 'ordinal' scale
    #[arg(short='s', long="scoring", value_enum, default_value_t=ScoringMode::Ordinal)]
    pub scoring: ScoringMode,
    /// Ordinal categories, lowest first, comma separated
    #[arg(long="categories", value_delimiter=',', default_values_t=DEFAULT_CATEGORIES.map(String::from))]
    pub categories: Vec<String>,
    /// Ordinal weight of phenotypes outside the categories. Default: 0.5
    #[arg(long="default-weight", value_parser=validate_weight, default_value_t=DEFAULT_UNKNOWN_WEIGHT)]
    pub default_weight: f64,
    /// matUtils executable
    #[arg(long="matutils", default_value_t=String::from(DEFAULT_MATUTILS))]
    pub matutils: String,
}

const WEIGHT_RANGE: RangeInclusive<f64> = 0f64..=1f64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScoringMode {
    Frequency,
    Ordinal,
}

fn validate_weight(input_str: &str) -> Result<f64, String> {
    let weight: f64 = input_str
        .parse()
        .map_err(|_| format!("'{}' is not a number", input_str))?;
    if WEIGHT_RANGE.contains(&weight) {
        Ok(weight)
    } else {
        Err(
            format!("Weight not in the range {} - {}", WEIGHT_RANGE.start(), WEIGHT_RANGE.end())
        )
    }
}
