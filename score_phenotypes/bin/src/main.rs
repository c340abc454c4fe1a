/*
Weigh the samples of a mutation annotated tree by a metadata phenotype

Libs
    samples: sample ids of the tree via matUtils summary
    metadata: phenotype column for those samples, plain or gzip tsv
    weights: frequency or ordinal weight
    report: Sample/Weight/Phenotype table, then Sample/Phenotype and Sample/Weight

Arguments
    metadata file, tree, column name, output file
    scoring mode and ordinal categories
*/

mod bin_utils;
use std::process;
use clap::Parser;
use bin_utils::get_args::Cli;
use bin_utils::score_phenotypes::report_weights;
use log::{debug, error, info};
use env_logger;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    match report_weights(&cli) {
        Ok(paths) => info!("Weights written to {:?}", paths.combined),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
