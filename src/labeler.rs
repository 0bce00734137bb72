//! Labelling of a single victim table against its solutions table.

use anyhow::{Context, Result};
use csv::StringRecord;
use log::info;
use serde::Serialize;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::ids::{GroomingLabel, SolutionIds, LABEL_COLUMN};
use crate::table::Table;

pub const LABELLED_SUFFIX: &str = "_labelled";

// What one labelling step produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledFile {
    pub victim: PathBuf,
    pub solutions: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub positives: usize,
}

impl LabelledFile {
    pub fn negatives(&self) -> usize {
        self.rows - self.positives
    }
}

/// `<out_dir>/<victim stem>_labelled.csv`
pub fn labelled_path(victim: &Path, out_dir: &Path) -> Result<PathBuf> {
    let stem = victim
        .file_stem()
        .with_context(|| format!("{} has no file name", victim.display()))?
        .to_string_lossy();
    Ok(out_dir.join(format!("{stem}{LABELLED_SUFFIX}.csv")))
}

/// Append (or overwrite) the label column of `victim`, row by row.
/// Returns the labelled table and how many rows came out `yes`.
pub fn label_table(mut victim: Table, id_idx: usize, solutions: &SolutionIds) -> (Table, usize) {
    let existing = victim.column_index(LABEL_COLUMN);
    if existing.is_none() {
        victim.headers.push_field(LABEL_COLUMN);
    }

    let mut positives = 0usize;
    for row in victim.rows.iter_mut() {
        let label = solutions.label_for(row.get(id_idx).unwrap_or(""));
        if label == GroomingLabel::Yes {
            positives += 1;
        }
        match existing {
            Some(col) => {
                *row = row
                    .iter()
                    .enumerate()
                    .map(|(i, field)| if i == col { label.as_str() } else { field })
                    .collect::<StringRecord>();
            }
            None => row.push_field(label.as_str()),
        }
    }

    (victim, positives)
}

/// Label one victim CSV using its matching solutions CSV.
///
/// Both files must carry `id_column`; otherwise nothing is written and the
/// error names the offending file. The output directory is created if needed.
pub fn label_victim_file(
    victim_csv: &Path,
    solutions_csv: &Path,
    out_dir: &Path,
    id_column: &str,
) -> Result<LabelledFile> {
    let victim = Table::read(victim_csv)?;
    let solutions = Table::read(solutions_csv)?;

    let victim_id = victim.require_column(id_column, victim_csv)?;
    let solution_id = solutions.require_column(id_column, solutions_csv)?;

    let solution_ids = SolutionIds::from_values(solutions.column_values(solution_id));
    info!(
        "{}: {} rows, {} distinct solution IDs",
        victim_csv.display(),
        victim.len(),
        solution_ids.len()
    );

    let (labelled, positives) = label_table(victim, victim_id, &solution_ids);

    create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let output = labelled_path(victim_csv, out_dir)?;
    labelled.write(&output)?;
    info!("Wrote {} rows ({} yes) -> {}", labelled.len(), positives, output.display());

    Ok(LabelledFile {
        victim: victim_csv.to_path_buf(),
        solutions: solutions_csv.to_path_buf(),
        output,
        rows: labelled.len(),
        positives,
    })
}
