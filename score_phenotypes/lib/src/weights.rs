/*
    Turn a categorical phenotype into a per sample weight

    If Scoring::Frequency
        weight = 1 - (samples sharing the phenotype) / (samples scored)
        rare phenotypes weigh more
    Else if Scoring::Ordinal
        category i of m ranked labels weighs (i + 1) / m
        labels outside the scale get the unknown weight
*/

use std::collections::{HashMap, HashSet};
use log::{debug, info, warn};
use crate::error::{MetaError, Result};
use crate::metadata::FilteredMetadata;

// drug resistance ranking, least to most resistant
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Sensitive",
    "HR-TB",
    "RR-TB",
    "MDR-TB",
    "Pre-XDR-TB",
    "XDR-TB",
];
pub const DEFAULT_UNKNOWN_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    categories: Vec<String>,
    unknown_weight: f64,
}

impl OrdinalScale {
    pub fn new<I, S>(categories: I, unknown_weight: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(MetaError::InvalidScale(String::from("no categories given")));
        }
        let mut seen = HashSet::new();
        if let Some(repeat) = categories.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(MetaError::InvalidScale(format!("category '{}' listed twice", repeat)));
        }
        if !(0.0..=1.0).contains(&unknown_weight) {
            return Err(MetaError::InvalidScale(format!(
                "unknown weight {} outside 0 - 1", unknown_weight)));
        }
        Ok(Self { categories, unknown_weight })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn unknown_weight(&self) -> f64 {
        self.unknown_weight
    }

    pub fn weight(&self, phenotype: &str) -> f64 {
        match self.categories.iter().position(|c| c == phenotype) {
            Some(rank) => (rank + 1) as f64 / self.categories.len() as f64,
            None => self.unknown_weight,
        }
    }
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            unknown_weight: DEFAULT_UNKNOWN_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scoring {
    Frequency,
    Ordinal(OrdinalScale),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSample {
    pub sample: String,
    pub weight: f64,
    pub phenotype: String,
}

/// Scored samples in metadata order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    rows: Vec<WeightedSample>,
}

impl WeightTable {
    pub fn iter(&self) -> std::slice::Iter<'_, WeightedSample> {
        self.rows.iter()
    }

    pub fn get(&self, sample: &str) -> Option<&WeightedSample> {
        self.rows.iter().find(|row| row.sample == sample)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn format_weight(weight: f64) -> String {
    format!("{:.4}", weight)
}

pub fn score(metadata: &FilteredMetadata, scoring: &Scoring) -> WeightTable {
    let rows = match scoring {
        Scoring::Frequency => frequency_weights(metadata),
        Scoring::Ordinal(scale) => ordinal_weights(metadata, scale),
    };
    info!("Scored {} samples", rows.len());
    WeightTable { rows }
}

fn frequency_weights(metadata: &FilteredMetadata) -> Vec<WeightedSample> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, phenotype) in metadata.iter() {
        *counts.entry(phenotype).or_insert(0) += 1;
    }
    debug!("{} distinct phenotypes", counts.len());
    let total = metadata.len() as f64;
    metadata.iter().map(|(sample, phenotype)| WeightedSample {
        sample: sample.to_string(),
        weight: 1.0 - counts[phenotype] as f64 / total,
        phenotype: phenotype.to_string(),
    }).collect()
}

fn ordinal_weights(metadata: &FilteredMetadata, scale: &OrdinalScale) -> Vec<WeightedSample> {
    let mut unranked = 0usize;
    let rows: Vec<WeightedSample> = metadata.iter().map(|(sample, phenotype)| {
        if !scale.categories.iter().any(|c| c == phenotype) {
            unranked += 1;
        }
        WeightedSample {
            sample: sample.to_string(),
            weight: scale.weight(phenotype),
            phenotype: phenotype.to_string(),
        }
    }).collect();
    if unranked > 0 {
        warn!("{} samples carry a phenotype outside the scale, weighted {}",
              unranked, scale.unknown_weight());
    }
    rows
}
