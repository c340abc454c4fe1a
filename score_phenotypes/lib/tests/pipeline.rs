use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use autolin_meta::report::write_report;
use autolin_meta::weights::format_weight;
use autolin_meta::{load_and_score, MetaError, OrdinalScale, Scoring};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

const METADATA: &str = "id\tdrugres\nA\tMDR-TB\nB\tSensitive\nC\tXDR-TB\n";

fn samples(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn write_gz(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path).unwrap()
        .lines()
        .map(|l| l.split('\t').map(String::from).collect())
        .collect()
}

#[test]
fn ordinal_report_from_gzip_metadata() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.tsv.gz");
    write_gz(&metadata, METADATA);
    let table = load_and_score(&metadata, &samples(&["A", "B", "C"]), "drugres",
                               &Scoring::Ordinal(OrdinalScale::default())).unwrap();
    let output = dir.path().join("weights.tsv");
    let paths = write_report(&table, &output).unwrap();

    assert_eq!(fs::read_to_string(&paths.combined).unwrap(),
               "Sample\tWeight\tPhenotype\n\
                A\t0.6667\tMDR-TB\n\
                B\t0.1667\tSensitive\n\
                C\t1.0000\tXDR-TB\n");
    assert_eq!(paths.phenotype, dir.path().join("weights.phenotype.tsv"));
    assert_eq!(paths.weight, dir.path().join("weights.weight.tsv"));
}

#[test]
fn projections_agree_with_combined_table() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.tsv");
    fs::write(&metadata, "id\tcountry\tlineage\n\
                          s1\tPE\tL2\ns2\tPE\tL4\ns3\tZA\tL2\ns4\tUS\tL2\ns5\tUS\tL1\n").unwrap();
    let table = load_and_score(&metadata, &samples(&["s1", "s2", "s3", "s4", "s5", "s6"]),
                               "lineage", &Scoring::Frequency).unwrap();
    assert_eq!(table.len(), 5);
    let paths = write_report(&table, &dir.path().join("freq.tsv")).unwrap();

    let combined = rows(&paths.combined);
    let phenotypes = rows(&paths.phenotype);
    let weights = rows(&paths.weight);
    assert_eq!(phenotypes[0], vec!["Sample", "Phenotype"]);
    assert_eq!(weights[0], vec!["Sample", "Weight"]);
    assert_eq!(combined.len(), phenotypes.len());
    assert_eq!(combined.len(), weights.len());
    for ((full, phenotype), weight) in combined.iter().zip(&phenotypes).zip(&weights).skip(1) {
        assert_eq!(full[0], phenotype[0]);
        assert_eq!(full[2], phenotype[1]);
        assert_eq!(full[0], weight[0]);
        assert_eq!(full[1], weight[1]);
    }
    // L2 is shared by three of five samples
    assert_eq!(format_weight(table.get("s1").unwrap().weight), "0.4000");
    assert_eq!(format_weight(table.get("s5").unwrap().weight), "0.8000");
}

#[test]
fn missing_column_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.tsv");
    fs::write(&metadata, METADATA).unwrap();
    let output: PathBuf = dir.path().join("weights.tsv");
    let result = load_and_score(&metadata, &samples(&["A"]), "lineage", &Scoring::Frequency)
        .and_then(|table| write_report(&table, &output));
    assert!(matches!(result, Err(MetaError::MissingColumn { .. })));
    assert!(!output.exists());
}

#[test]
fn result_is_limited_to_shared_samples() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.tsv");
    fs::write(&metadata, METADATA).unwrap();
    let tree = samples(&["B", "Z"]);
    let table = load_and_score(&metadata, &tree, "drugres", &Scoring::Frequency).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.len() <= tree.len());
    let only = table.get("B").unwrap();
    assert_eq!(only.phenotype, "Sensitive");
    assert_eq!(only.weight, 0.0);
}

#[cfg(unix)]
mod with_stand_in_tools {
    use super::*;
    use autolin_meta::clades::ConvertJob;
    use autolin_meta::samples::extract_samples;
    use autolin_meta::ExternalTool;

    fn sh(script: &str) -> ExternalTool {
        ExternalTool::new("sh").with_args(["-c", script, "sh"])
    }

    #[test]
    fn samples_come_from_matutils() {
        // summary -i <tree> -d <dir> -s <name>
        let matutils = sh("printf 'A\\t0\\nC\\t2\\n\\n' > \"$5/$7\"");
        let found = extract_samples(&matutils, Path::new("tree.pb")).unwrap();
        assert_eq!(found, samples(&["A", "C"]));
    }

    #[test]
    fn convert_with_additional_metadata() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("autolin.pb");
        fs::write(&tree, "").unwrap();
        let extra = dir.path().join("extra.tsv.gz");
        write_gz(&extra, "id\tcountry\ns2\tPE\ns1\tZA\ns7\tUS\n");
        let seen = dir.path().join("seen.tsv");
        let args = dir.path().join("args.txt");

        let mut job = ConvertJob::new(&tree);
        job.additional_metadata = Some(extra);
        job.matutils = sh("printf 'sample\\tannotation_1\\ns1\\tL1\\ns2\\tL2\\ns3\\tL3\\n' > \"$5/$7\"");
        // -i tree --clade_types t -m table -c columns -o output
        job.usher_to_taxonium = sh(&format!(
            "cp \"$6\" '{}'; printf '%s\\n' \"$@\" > '{}'; : > \"${{10}}\"",
            seen.display(), args.display()));
        let output = job.run().unwrap();

        assert_eq!(output, dir.path().join("autolin.jsonl.gz"));
        assert!(output.exists());
        assert_eq!(fs::read_to_string(&seen).unwrap(),
                   "strain\tannotation_1\tcountry\ns1\tL1\tZA\ns2\tL2\tPE\n");
        let passed: Vec<String> = fs::read_to_string(&args).unwrap().lines().map(String::from).collect();
        assert_eq!(passed[3], "pango");
        assert_eq!(passed[7], "strain,annotation_1,country");
    }

    #[test]
    fn convert_without_metadata_keeps_clade_table() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("autolin.pb");
        let kept = dir.path().join("phenometa.tsv");

        let mut job = ConvertJob::new(&tree);
        job.merged_table = Some(kept.clone());
        job.output = dir.path().join("out.jsonl.gz");
        job.matutils = sh("printf 'node\\tannotation_1\\ns1\\tL1\\n' > \"$5/$7\"");
        job.usher_to_taxonium = sh("test \"$8\" = 'strain,annotation_1'");
        job.run().unwrap();

        assert_eq!(fs::read_to_string(&kept).unwrap(), "strain\tannotation_1\ns1\tL1\n");
    }

    #[test]
    fn unannotated_tree_stops_before_conversion() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("converted");
        let mut job = ConvertJob::new(&dir.path().join("autolin.pb"));
        job.matutils = sh("printf 'sample\\tannotation_1\\n' > \"$5/$7\"");
        job.usher_to_taxonium = sh(&format!(": > '{}'", marker.display()));
        let err = job.run().unwrap_err();
        assert!(matches!(err, MetaError::EmptyTable { .. }));
        assert!(!marker.exists());
    }

    #[test]
    fn no_shared_metadata_stops_before_conversion() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("converted");
        let extra = dir.path().join("extra.tsv");
        fs::write(&extra, "id\tcountry\nzz\tPE\n").unwrap();
        let mut job = ConvertJob::new(&dir.path().join("autolin.pb"));
        job.additional_metadata = Some(extra);
        job.matutils = sh("printf 'sample\\tannotation_1\\ns1\\tL1\\n' > \"$5/$7\"");
        job.usher_to_taxonium = sh(&format!(": > '{}'", marker.display()));
        let err = job.run().unwrap_err();
        assert!(matches!(err, MetaError::EmptyTable { .. }));
        assert!(!marker.exists());
    }

    #[test]
    fn sars_cov_2_runs_no_tool() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("ran");
        let touch = format!(": > '{}'", marker.display());
        let mut job = ConvertJob::new(&dir.path().join("autolin.pb"));
        job.sars_cov_2 = true;
        job.matutils = sh(&touch);
        job.usher_to_taxonium = sh(&touch);
        let err = job.run().unwrap_err();
        assert!(matches!(err, MetaError::Unsupported(_)));
        assert!(err.to_string().contains("SARS-CoV-2"));
        assert!(!marker.exists());
    }

    #[test]
    fn converter_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut job = ConvertJob::new(&dir.path().join("autolin.pb"));
        job.matutils = sh("printf 'sample\\tannotation_1\\ns1\\tL1\\n' > \"$5/$7\"");
        job.usher_to_taxonium = sh("echo 'bad metadata column' >&2; exit 2");
        let err = job.run().unwrap_err();
        assert!(err.to_string().contains("bad metadata column"));
    }
}
