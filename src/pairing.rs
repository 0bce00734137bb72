//! Discovery of victim / solutions file pairs in a dataset directory.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const VICTIM_PREFIX: &str = "perp_";
pub const VICTIM_SUFFIX: &str = "_vic_data.csv";
pub const SOLUTIONS_SUFFIX: &str = "_solutions.csv";

// One victim table and the solutions table sharing its `perp_<X>` prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub prefix: String,
    pub victim: PathBuf,
    pub solutions: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetScan {
    pub pairs: Vec<Pair>,
    // victim files that had no solutions file next to them
    pub unmatched: Vec<PathBuf>,
    // one logged warning per unmatched victim file
    pub warnings: Vec<String>,
}

/// `perp_<X>` for a name of the form `perp_<X>_vic_data.csv`, else `None`.
pub fn victim_prefix(file_name: &str) -> Option<&str> {
    if file_name.len() < VICTIM_PREFIX.len() + VICTIM_SUFFIX.len()
        || !file_name.starts_with(VICTIM_PREFIX)
    {
        return None;
    }
    file_name.strip_suffix(VICTIM_SUFFIX)
}

pub fn solutions_file_name(prefix: &str) -> String {
    format!("{prefix}{SOLUTIONS_SUFFIX}")
}

/// Walk `dataset_dir` once, in file-name order, and split the victim files
/// into matched pairs and unmatched leftovers. Logs one warning per leftover.
pub fn scan_dataset(dataset_dir: &Path) -> Result<DatasetScan> {
    let mut victims: Vec<(String, PathBuf)> = Vec::new();

    let entries = fs::read_dir(dataset_dir)
        .with_context(|| format!("listing {}", dataset_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dataset_dir.display()))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if victim_prefix(&name).is_some() && path.is_file() {
            victims.push((name, path));
        }
    }
    victims.sort_by(|a, b| a.0.cmp(&b.0));

    let mut scan = DatasetScan::default();
    for (name, victim) in victims {
        let prefix = victim_prefix(&name).unwrap_or_default().to_owned();
        let solutions = dataset_dir.join(solutions_file_name(&prefix));

        if solutions.exists() {
            info!("Paired {} with {}", name, solutions.display());
            scan.pairs.push(Pair {
                prefix,
                victim,
                solutions,
            });
        } else {
            let message = format!("Missing solutions file for {name}");
            warn!("{message}");
            scan.warnings.push(message);
            scan.unmatched.push(victim);
        }
    }

    Ok(scan)
}

/// Ordered (victim, solutions) pairs of `dataset_dir`.
pub fn find_pairs(dataset_dir: &Path) -> Result<Vec<Pair>> {
    Ok(scan_dataset(dataset_dir)?.pairs)
}
