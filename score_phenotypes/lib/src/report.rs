/*
    Write the scored samples
        <output>                 Sample  Weight  Phenotype
        <stem>.phenotype.tsv     Sample  Phenotype
        <stem>.weight.tsv        Sample  Weight
    the two narrow tables are column projections of the combined one
*/

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{debug, info};
use crate::error::{MetaError, Result};
use crate::lib_utils::struct_helper::FileBufferHelper;
use crate::metadata::column_index;
use crate::weights::{format_weight, WeightTable};

pub const SAMPLE_COLUMN: &str = "Sample";
pub const WEIGHT_COLUMN: &str = "Weight";
pub const PHENOTYPE_COLUMN: &str = "Phenotype";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub combined: PathBuf,
    pub phenotype: PathBuf,
    pub weight: PathBuf,
}

impl ReportPaths {
    pub fn from_output(output: &Path) -> Self {
        let stem = output.with_extension("");
        let sibling = |suffix: &str| {
            let mut name = stem.clone().into_os_string();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            combined: output.to_path_buf(),
            phenotype: sibling(".phenotype.tsv"),
            weight: sibling(".weight.tsv"),
        }
    }
}

pub fn write_report(table: &WeightTable, output: &Path) -> Result<ReportPaths> {
    let paths = ReportPaths::from_output(output);
    write_weight_table(table, &paths.combined)?;
    // the combined table is ours and never compressed, whatever its name
    for (destination, column) in [(&paths.phenotype, PHENOTYPE_COLUMN), (&paths.weight, WEIGHT_COLUMN)] {
        let combined = FileBufferHelper::plain(&paths.combined)?;
        project_buffer(combined, destination, &[SAMPLE_COLUMN, column])?;
    }
    info!("Wrote {:?}, {:?} and {:?}", paths.combined, paths.phenotype, paths.weight);
    Ok(paths)
}

pub fn write_weight_table(table: &WeightTable, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    let io_err = |e| MetaError::io(path, e);
    writeln!(writer, "{}\t{}\t{}", SAMPLE_COLUMN, WEIGHT_COLUMN, PHENOTYPE_COLUMN).map_err(io_err)?;
    for row in table.iter() {
        writeln!(writer, "{}\t{}\t{}", row.sample, format_weight(row.weight), row.phenotype)
            .map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    debug!("{} rows written to {:?}", table.len(), path);
    Ok(())
}

/// Copy the named columns, in the given order, from one table into a new one.
pub fn project_columns(source: &Path, destination: &Path, columns: &[&str]) -> Result<()> {
    project_buffer(FileBufferHelper::new(source)?, destination, columns)
}

fn project_buffer(mut table: FileBufferHelper, destination: &Path, columns: &[&str]) -> Result<()> {
    let source = table.path.clone();
    let source = source.as_path();
    let header = table.read_header()?;
    let indices = columns.iter()
        .map(|column| column_index(&header, column, source))
        .collect::<Result<Vec<usize>>>()?;
    let needed = indices.iter().max().map_or(0, |&i| i + 1);
    let mut writer = create(destination)?;
    let io_err = |e| MetaError::io(destination, e);
    writeln!(writer, "{}", columns.join("\t")).map_err(io_err)?;
    while table.next_line()? {
        let fields = table.fields();
        if fields.len() < needed {
            return Err(MetaError::MalformedRow {
                path: source.to_path_buf(),
                line: table.line_number,
                expected: needed,
                found: fields.len(),
            });
        }
        let selected = indices.iter().map(|&i| fields[i]).collect::<Vec<&str>>();
        writeln!(writer, "{}", selected.join("\t")).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| MetaError::io(path, e))
}
