/*
    Pull one column out of a tab separated metadata file
        header must contain the column, checked before any row
        every row needs at least column index + 1 fields
        keep rows whose first field is a tree sample
        order follows first appearance in the file, later duplicates overwrite the value
*/

use std::collections::{HashMap, HashSet};
use std::path::Path;
use log::{debug, info};
use crate::error::{MetaError, Result};
use crate::lib_utils::struct_helper::FileBufferHelper;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredMetadata {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl FilteredMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: String, value: String) {
        match self.index.get(&sample) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(sample.clone(), self.entries.len());
                self.entries.push((sample, value));
            }
        }
    }

    pub fn get(&self, sample: &str) -> Option<&str> {
        self.index.get(sample).map(|&position| self.entries[position].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(sample, value)| (sample.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn column_index(header: &[String], column: &str, path: &Path) -> Result<usize> {
    header.iter().position(|name| name == column)
        .ok_or_else(|| MetaError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
            available: header.join(", "),
        })
}

pub fn load_column(metadata: &Path, samples: &HashSet<String>, column: &str) -> Result<FilteredMetadata> {
    let mut table = FileBufferHelper::new(metadata)?;
    let header = table.read_header()?;
    let column_idx = column_index(&header, column, metadata)?;
    debug!("Column '{}' is field {} of {:?}", column, column_idx, metadata);
    let mut filtered = FilteredMetadata::new();
    let mut rows = 0usize;
    while table.next_line()? {
        rows += 1;
        let fields = table.fields();
        if fields.len() <= column_idx {
            return Err(MetaError::MalformedRow {
                path: metadata.to_path_buf(),
                line: table.line_number,
                expected: column_idx + 1,
                found: fields.len(),
            });
        }
        if samples.contains(fields[0]) {
            filtered.insert(fields[0].to_string(), fields[column_idx].to_string());
        }
    }
    info!("{} of {} metadata rows belong to the tree ({} tree samples)",
          filtered.len(), rows, samples.len());
    Ok(filtered)
}
