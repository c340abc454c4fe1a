/*
    Phenotype weights and clade annotations for mutation annotated trees
        samples:  sample ids of a tree through matUtils summary
        metadata: one column of a metadata file, restricted to tree samples
        weights:  frequency or ordinal weight per sample
        report:   combined table plus two projections
        clades:   clade table, metadata join and usher_to_taxonium
*/

use std::collections::HashSet;
use std::path::Path;
use log::info;

pub mod clades;
pub mod error;
pub mod external;
pub mod lib_utils;
pub mod metadata;
pub mod report;
pub mod samples;
pub mod weights;

pub use error::{MetaError, Result};
pub use external::ExternalTool;
pub use weights::{OrdinalScale, Scoring, WeightTable};

/// Read `column` for every tree sample present in `metadata` and weigh it.
pub fn load_and_score(metadata: &Path, samples: &HashSet<String>, column: &str,
                      scoring: &Scoring) -> Result<WeightTable> {
    let filtered = metadata::load_column(metadata, samples, column)?;
    info!("{} tree samples have a '{}' value", filtered.len(), column);
    Ok(weights::score(&filtered, scoring))
}
