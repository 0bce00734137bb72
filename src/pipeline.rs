//! One complete labelling run: pair, label each pair, combine.

use anyhow::{bail, Result};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::aggregate::{combine_labelled, CombinedFile};
use crate::ids::ID_COLUMN;
use crate::labeler::{label_victim_file, LabelledFile};
use crate::pairing::{scan_dataset, VICTIM_PREFIX, VICTIM_SUFFIX};

pub const DEFAULT_DATASET_DIR: &str = "Dataset";
pub const DEFAULT_OUT_DIR: &str = "outputs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dataset_dir: PathBuf,
    pub out_dir: PathBuf,
    pub id_column: String,
}

impl Config {
    /// Preconditions checked before anything is created on disk.
    pub fn validate(&self) -> Result<()> {
        if !self.dataset_dir.is_dir() {
            bail!(
                "Expected a '{}' folder containing the PASYDA csv files",
                self.dataset_dir.display()
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            id_column: ID_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dataset_dir: PathBuf,
    pub out_dir: PathBuf,
    pub labelled: Vec<LabelledFile>,
    pub skipped: Vec<PathBuf>,
    pub combined: CombinedFile,
}

impl RunReport {
    pub fn total_rows(&self) -> usize {
        self.labelled.iter().map(|f| f.rows).sum()
    }

    pub fn total_positives(&self) -> usize {
        self.labelled.iter().map(|f| f.positives).sum()
    }
}

/// Label every matched pair under `config.dataset_dir` and write the combined
/// file. Prints one `[OK]` line per pair and one for the combined output.
///
/// Fails before touching the output directory when the dataset directory is
/// missing or holds no usable pair. A pair missing its ID column aborts the
/// whole run; earlier per-pair outputs are left in place.
pub fn run(config: &Config) -> Result<RunReport> {
    config.validate()?;
    let dataset_dir = &config.dataset_dir;

    let scan = scan_dataset(dataset_dir)?;
    if scan.pairs.is_empty() {
        bail!(
            "No {VICTIM_PREFIX}*{VICTIM_SUFFIX} files with matching solutions found in {}",
            dataset_dir.display()
        );
    }
    info!(
        "{} pair(s) found, {} victim file(s) without solutions",
        scan.pairs.len(),
        scan.unmatched.len()
    );

    let mut labelled = Vec::with_capacity(scan.pairs.len());
    for pair in &scan.pairs {
        let result = label_victim_file(&pair.victim, &pair.solutions, &config.out_dir, &config.id_column)?;
        println!(
            "[OK] Labelled {} -> {}",
            pair.victim.file_name().unwrap_or_default().to_string_lossy(),
            result.output.display()
        );
        labelled.push(result);
    }

    let outputs: Vec<&PathBuf> = labelled.iter().map(|f| &f.output).collect();
    let combined = combine_labelled(&outputs, &config.out_dir)?;
    println!(
        "[OK] Combined labelled dataset saved to: {}",
        combined.output.display()
    );

    Ok(RunReport {
        dataset_dir: dataset_dir.clone(),
        out_dir: config.out_dir.clone(),
        labelled,
        skipped: scan.unmatched,
        combined,
    })
}
