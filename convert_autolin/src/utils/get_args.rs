use clap::Parser;
use std::path::PathBuf;
use autolin_meta::clades::{DEFAULT_CLADE_TYPES, DEFAULT_USHER_TO_TAXONIUM};
use autolin_meta::samples::DEFAULT_MATUTILS;

#[derive(Parser)]
#[command(author, version, about = "Convert an AutoLIN protobuf file to a Taxonium JSONL file", long_about = None)]
pub struct Cli {
    /// Path to the input AutoLIN protobuf file
    #[arg(short='a', long="autolin-pb-path", visible_alias="autolin_pb_path", required = true)]
    pub autolin_pb_path: PathBuf,
    /// Data is SARS-CoV-2. Not supported yet
    #[arg(long="sars-cov-2", visible_alias="sc2")]
    pub sars_cov_2: bool,
    /// Tab separated metadata joined onto the clade annotations. Sample ID must be the first column
    #[arg(long="additional-meta-data", visible_aliases=["additional_meta_data", "amd"])]
    pub additional_meta_data: Option<PathBuf>,
    /// Clade types handed to usher_to_taxonium
    #[arg(long="clade-types", default_value_t=String::from(DEFAULT_CLADE_TYPES))]
    pub clade_types: String,
    /// Taxonium output. Default: the tree path with .pb replaced by .jsonl.gz
    #[arg(short='o', long="output")]
    pub output: Option<PathBuf>,
    /// Keep the table passed to usher_to_taxonium at this path
    #[arg(long="merged-table")]
    pub merged_table: Option<PathBuf>,
    /// matUtils executable
    #[arg(long="matutils", default_value_t=String::from(DEFAULT_MATUTILS))]
    pub matutils: String,
    /// usher_to_taxonium executable
    #[arg(long="usher-to-taxonium", default_value_t=String::from(DEFAULT_USHER_TO_TAXONIUM))]
    pub usher_to_taxonium: String,
}
