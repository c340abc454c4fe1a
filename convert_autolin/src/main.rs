/*
    Annotated AutoLIN tree -> Taxonium

    Input
        AutoLIN protobuf
        optional metadata to join onto the clade annotations

    Run
        matUtils summary -C for the clade table
        rename its first column to strain
        join the extra metadata on sample id
        usher_to_taxonium with the resulting table and its column names
*/

mod utils;
use std::process;
use clap::Parser;
use log::{debug, error, info};
use env_logger;
use autolin_meta::clades::ConvertJob;
use autolin_meta::ExternalTool;
use utils::get_args::Cli;

fn job_from_cli(cli: &Cli) -> ConvertJob {
    let mut job = ConvertJob::new(&cli.autolin_pb_path);
    job.additional_metadata = cli.additional_meta_data.clone();
    job.clade_types = cli.clade_types.clone();
    if let Some(output) = &cli.output {
        job.output = output.clone();
    }
    job.merged_table = cli.merged_table.clone();
    job.matutils = ExternalTool::new(cli.matutils.as_str());
    job.usher_to_taxonium = ExternalTool::new(cli.usher_to_taxonium.as_str());
    job.sars_cov_2 = cli.sars_cov_2;
    job
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    info!("Converting {:?}", cli.autolin_pb_path);
    match job_from_cli(&cli).run() {
        Ok(output) => info!("Taxonium file: {:?}", output),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
