/*
    Weigh every tree sample by its phenotype
        collect the tree samples with matUtils
        read the phenotype column for those samples
        score by frequency or by ordinal rank
        write the combined table and its two projections
*/

use log::debug;
use autolin_meta::report::{write_report, ReportPaths};
use autolin_meta::samples::extract_samples;
use autolin_meta::{load_and_score, ExternalTool, OrdinalScale, Result, Scoring};
use super::get_args::{Cli, ScoringMode};

pub fn scoring_from_cli(cli: &Cli) -> Result<Scoring> {
    match cli.scoring {
        ScoringMode::Frequency => Ok(Scoring::Frequency),
        ScoringMode::Ordinal => {
            let scale = OrdinalScale::new(cli.categories.iter().map(|c| c.trim()), cli.default_weight)?;
            debug!("Ordinal scale: {}", scale.categories().join(" < "));
            Ok(Scoring::Ordinal(scale))
        }
    }
}

pub fn report_weights(cli: &Cli) -> Result<ReportPaths> {
    // scale problems surface before matUtils runs
    let scoring = scoring_from_cli(cli)?;
    let matutils = ExternalTool::new(cli.matutils.as_str());
    let samples = extract_samples(&matutils, &cli.mat)?;
    let table = load_and_score(&cli.metadata_file, &samples, &cli.column_name, &scoring)?;
    write_report(&table, &cli.output_file)
}
