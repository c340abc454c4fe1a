/*
    Collect the sample identifiers of a mutation annotated tree
        matUtils summary -i <tree> -d <run dir> -s <samples file>
        first whitespace separated token of every non-empty line is a sample
        run dir is unique per call and removed on drop
*/

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use log::{debug, info, warn};
use crate::error::{MetaError, Result};
use crate::external::ExternalTool;
use crate::lib_utils::struct_helper::FileBufferHelper;

pub const DEFAULT_MATUTILS: &str = "matUtils";
const SAMPLES_FILE_NAME: &str = "samples.txt";

pub fn extract_samples(matutils: &ExternalTool, tree: &Path) -> Result<HashSet<String>> {
    let run_dir = tempfile::Builder::new()
        .prefix("autolin_samples.")
        .tempdir()
        .map_err(|e| MetaError::io(&std::env::temp_dir(), e))?;
    debug!("Sample list staged in {:?}", run_dir.path());
    matutils.run([
        OsStr::new("summary"),
        OsStr::new("-i"),
        tree.as_os_str(),
        OsStr::new("-d"),
        run_dir.path().as_os_str(),
        OsStr::new("-s"),
        OsStr::new(SAMPLES_FILE_NAME),
    ])?;
    let samples_file = run_dir.path().join(SAMPLES_FILE_NAME);
    if !samples_file.exists() {
        return Err(MetaError::empty(&samples_file, "was not written by matUtils"));
    }
    let samples = read_sample_list(&samples_file)?;
    if samples.is_empty() {
        warn!("No samples found in {:?}", tree);
    } else {
        info!("Extracted {} samples from {:?}", samples.len(), tree);
    }
    Ok(samples)
}

pub fn read_sample_list(path: &Path) -> Result<HashSet<String>> {
    let mut list = FileBufferHelper::new(path)?;
    let mut samples = HashSet::new();
    while list.next_line()? {
        if let Some(sample) = list.line.split_whitespace().next() {
            samples.insert(sample.to_string());
        }
    }
    Ok(samples)
}
