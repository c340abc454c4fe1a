/*
    Annotated tree -> taxonium input
        matUtils summary -C writes the clade table (sample, clade)
            must hold more than a header
        first header field is renamed to "strain"
        clade table must have exactly two columns
        if extra metadata
            inner join on sample id, both sides sorted by key
            header = clade header + metadata header without its key
        usher_to_taxonium -i tree --clade_types .. -m table -c columns -o output
*/

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use crate::error::{MetaError, Result};
use crate::external::ExternalTool;
use crate::lib_utils::struct_helper::FileBufferHelper;

pub const CANONICAL_SAMPLE_COLUMN: &str = "strain";
pub const DEFAULT_CLADE_TYPES: &str = "pango";
pub const DEFAULT_USHER_TO_TAXONIUM: &str = "usher_to_taxonium";
const CLADE_FILE_NAME: &str = "autolin_clade.tsv";
const MERGED_FILE_NAME: &str = "phenometa.tsv";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_table(path: &Path) -> Result<Table> {
    let mut buffer = FileBufferHelper::new(path)?;
    let header = buffer.read_header()?;
    let mut rows = Vec::new();
    while buffer.next_line()? {
        rows.push(buffer.fields().into_iter().map(String::from).collect());
    }
    debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(Table { header, rows })
}

pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let io_err = |e| MetaError::io(path, e);
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(writer, "{}", table.header.join("\t")).map_err(io_err)?;
    for row in &table.rows {
        writeln!(writer, "{}", row.join("\t")).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Clade table must exist and hold at least one row below its header.
pub fn ensure_annotated(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MetaError::empty(path, "was not created"));
    }
    let mut buffer = FileBufferHelper::new(path)?;
    let mut lines = 0usize;
    while lines < 2 && buffer.next_line()? {
        lines += 1;
    }
    match lines {
        0 => Err(MetaError::empty(path, "is empty")),
        1 => Err(MetaError::empty(path, "holds only a header, the tree carries no annotations")),
        _ => Ok(()),
    }
}

pub fn extract_clades(matutils: &ExternalTool, tree: &Path, run_dir: &Path) -> Result<PathBuf> {
    matutils.run([
        OsStr::new("summary"),
        OsStr::new("-i"),
        tree.as_os_str(),
        OsStr::new("-d"),
        run_dir.as_os_str(),
        OsStr::new("-C"),
        OsStr::new(CLADE_FILE_NAME),
    ])?;
    let clade_file = run_dir.join(CLADE_FILE_NAME);
    ensure_annotated(&clade_file)?;
    info!("Clade annotations written to {:?}", clade_file);
    Ok(clade_file)
}

/// Replace the leading field name of the first line.
pub fn canonicalize_header(path: &Path, name: &str) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
    // blank lines ahead of the header are skipped, as when reading the table
    let mut line_start = 0usize;
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        line_start += line.len();
    }
    let line_end = content[line_start..].find('\n').map_or(content.len(), |i| line_start + i);
    let field_end = content[line_start..line_end]
        .find(|c: char| c == ' ' || c == '\t' || c == '\r')
        .map_or(line_end, |i| line_start + i);
    debug!("Renaming column '{}' to '{}'", &content[line_start..field_end], name);
    let renamed = format!("{}{}{}", &content[..line_start], name, &content[field_end..]);
    fs::write(path, renamed).map_err(|e| MetaError::io(path, e))
}

pub fn require_columns(table: &Table, expected: usize, path: &Path) -> Result<()> {
    if table.header.len() != expected {
        return Err(MetaError::ColumnCount {
            path: path.to_path_buf(),
            expected,
            found: table.header.len(),
        });
    }
    Ok(())
}

/// Inner join on the first field of each row. Output is sorted by key and a
/// key repeated on both sides yields every pairing.
pub fn join_tables(left: &Table, right: &Table) -> Table {
    let mut header = left.header.clone();
    header.extend(right.header.iter().skip(1).cloned());

    let mut left_rows: Vec<&Vec<String>> = left.rows.iter().collect();
    let mut right_rows: Vec<&Vec<String>> = right.rows.iter().collect();
    left_rows.sort_by(|a, b| a[0].cmp(&b[0]));
    right_rows.sort_by(|a, b| a[0].cmp(&b[0]));

    let mut rows = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < left_rows.len() && j < right_rows.len() {
        match left_rows[i][0].cmp(&right_rows[j][0]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let key = &left_rows[i][0];
                let left_end = i + left_rows[i..].iter().take_while(|r| &r[0] == key).count();
                let right_end = j + right_rows[j..].iter().take_while(|r| &r[0] == key).count();
                for l in &left_rows[i..left_end] {
                    for r in &right_rows[j..right_end] {
                        let mut row = (*l).clone();
                        row.extend(r.iter().skip(1).cloned());
                        rows.push(row);
                    }
                }
                i = left_end;
                j = right_end;
            }
        }
    }
    Table { header, rows }
}

/// Join the clade table with extra metadata into `destination`, returning the merged header.
pub fn merge_metadata(clade_file: &Path, metadata: &Path, destination: &Path) -> Result<Vec<String>> {
    let clades = read_table(clade_file)?;
    require_columns(&clades, 2, clade_file)?;
    let extra = read_table(metadata)?;
    let merged = join_tables(&clades, &extra);
    if merged.rows.len() < clades.rows.len() {
        warn!("{} of {} annotated samples have no metadata in {:?}",
              clades.rows.len() - merged.rows.len(), clades.rows.len(), metadata);
    }
    if merged.rows.is_empty() {
        return Err(MetaError::empty(destination, "has no sample shared with the additional metadata"));
    }
    write_table(&merged, destination)?;
    info!("Merged table with {} rows written to {:?}", merged.rows.len(), destination);
    Ok(merged.header)
}

/// `<tree>.pb` becomes `<tree>.jsonl.gz`.
pub fn default_output_path(tree: &Path) -> PathBuf {
    let tree_name = tree.as_os_str().to_string_lossy();
    match tree_name.strip_suffix(".pb") {
        Some(stem) => PathBuf::from(format!("{}.jsonl.gz", stem)),
        None => PathBuf::from(format!("{}.jsonl.gz", tree_name)),
    }
}

#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub tree: PathBuf,
    pub additional_metadata: Option<PathBuf>,
    pub clade_types: String,
    pub output: PathBuf,
    // keep the table handed to the converter here
    pub merged_table: Option<PathBuf>,
    pub matutils: ExternalTool,
    pub usher_to_taxonium: ExternalTool,
    pub sars_cov_2: bool,
}

impl ConvertJob {
    pub fn new(tree: &Path) -> Self {
        Self {
            tree: tree.to_path_buf(),
            additional_metadata: None,
            clade_types: DEFAULT_CLADE_TYPES.to_string(),
            output: default_output_path(tree),
            merged_table: None,
            matutils: ExternalTool::new(crate::samples::DEFAULT_MATUTILS),
            usher_to_taxonium: ExternalTool::new(DEFAULT_USHER_TO_TAXONIUM),
            sars_cov_2: false,
        }
    }

    pub fn run(&self) -> Result<PathBuf> {
        if self.sars_cov_2 {
            return Err(MetaError::Unsupported(String::from(
                "Currently, SARS-CoV-2 is unsupported. Check back in later releases.")));
        }
        let run_dir = tempfile::Builder::new()
            .prefix("autolin_convert.")
            .tempdir()
            .map_err(|e| MetaError::io(&std::env::temp_dir(), e))?;
        let clade_file = extract_clades(&self.matutils, &self.tree, run_dir.path())?;
        canonicalize_header(&clade_file, CANONICAL_SAMPLE_COLUMN)?;

        let table = self.merged_table.clone()
            .unwrap_or_else(|| run_dir.path().join(MERGED_FILE_NAME));
        let columns = match &self.additional_metadata {
            Some(metadata) => merge_metadata(&clade_file, metadata, &table)?,
            None => {
                let clades = read_table(&clade_file)?;
                require_columns(&clades, 2, &clade_file)?;
                fs::copy(&clade_file, &table).map_err(|e| MetaError::io(&table, e))?;
                clades.header
            }
        };
        info!("Columns passed to {}: {}", self.usher_to_taxonium.program(), columns.join(","));

        self.usher_to_taxonium.run([
            OsStr::new("-i"),
            self.tree.as_os_str(),
            OsStr::new("--clade_types"),
            OsStr::new(&self.clade_types),
            OsStr::new("-m"),
            table.as_os_str(),
            OsStr::new("-c"),
            OsStr::new(&columns.join(",")),
            OsStr::new("-o"),
            self.output.as_os_str(),
        ])?;
        info!("Taxonium file written to {:?}", self.output);
        Ok(self.output.clone())
    }
}
