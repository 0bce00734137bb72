//! Concatenation of the per-pair labelled files.

use anyhow::{Context, Result};
use csv::StringRecord;
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::table::Table;

pub const COMBINED_FILE_NAME: &str = "all_victims_labelled.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedFile {
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

// Maps each column of one table onto a column of the combined header.
// A name repeated inside one table claims the next occurrence of that name.
fn column_layout(headers: &mut Vec<String>, table: &Table) -> Vec<usize> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut layout = Vec::with_capacity(table.headers.len());

    for name in table.headers.iter() {
        let nth = seen.entry(name).or_insert(0);
        let target = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() == name)
            .map(|(i, _)| i)
            .nth(*nth);
        *nth += 1;

        let idx = match target {
            Some(i) => i,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        };
        layout.push(idx);
    }
    layout
}

/// Row-wise union of `tables`: table order, then row order.
/// Columns are the union of all headers in first-seen order; a row whose
/// table lacks a column gets an empty field there.
pub fn concat_tables(tables: &[Table]) -> Table {
    let mut headers: Vec<String> = Vec::new();
    let layouts: Vec<Vec<usize>> = tables
        .iter()
        .map(|t| column_layout(&mut headers, t))
        .collect();

    let mut rows = Vec::with_capacity(tables.iter().map(Table::len).sum());
    for (table, layout) in tables.iter().zip(&layouts) {
        for row in &table.rows {
            let mut fields = vec![""; headers.len()];
            for (field, &target) in row.iter().zip(layout) {
                fields[target] = field;
            }
            rows.push(StringRecord::from(fields));
        }
    }

    Table::new(StringRecord::from(headers), rows)
}

/// Re-read every labelled file from disk, in the given order, and write
/// their concatenation to `<out_dir>/all_victims_labelled.csv`.
pub fn combine_labelled<P: AsRef<Path>>(labelled: &[P], out_dir: &Path) -> Result<CombinedFile> {
    let tables = labelled
        .iter()
        .map(|p| Table::read(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let combined = concat_tables(&tables);

    create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let output = out_dir.join(COMBINED_FILE_NAME);
    combined.write(&output)?;
    info!(
        "Combined {} files into {} ({} rows)",
        tables.len(),
        output.display(),
        combined.len()
    );

    Ok(CombinedFile {
        output,
        rows: combined.len(),
        columns: combined.headers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            StringRecord::from(headers.to_vec()),
            rows.iter().map(|r| StringRecord::from(r.to_vec())).collect(),
        )
    }

    #[test]
    fn test_concat_preserves_order() {
        let a = table(&["ID", "grooming_label"], &[&["1", "no"], &["2", "yes"]]);
        let b = table(&["ID", "grooming_label"], &[&["9", "no"]]);

        let out = concat_tables(&[a, b]);
        assert_eq!(out.headers, StringRecord::from(vec!["ID", "grooming_label"]));
        let ids: Vec<&str> = out.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(ids, vec!["1", "2", "9"]);
    }

    #[test]
    fn test_concat_unions_columns() {
        let a = table(&["ID", "age", "grooming_label"], &[&["1", "13", "no"]]);
        let b = table(&["ID", "platform", "grooming_label"], &[&["2", "chat", "yes"]]);

        let out = concat_tables(&[a, b]);
        assert_eq!(
            out.headers,
            StringRecord::from(vec!["ID", "age", "grooming_label", "platform"])
        );
        assert_eq!(out.rows[0], StringRecord::from(vec!["1", "13", "no", ""]));
        assert_eq!(out.rows[1], StringRecord::from(vec!["2", "", "yes", "chat"]));
    }

    #[test]
    fn test_concat_keeps_repeated_header_names_apart() {
        let a = table(&["ID", "x", "x"], &[&["1", "a", "b"]]);
        let b = table(&["x", "ID"], &[&["c", "2"]]);

        let out = concat_tables(&[a, b]);
        assert_eq!(out.headers, StringRecord::from(vec!["ID", "x", "x"]));
        assert_eq!(out.rows[1], StringRecord::from(vec!["2", "c", ""]));
    }

    #[test]
    fn test_combine_labelled_rereads_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("perp_1_vic_data_labelled.csv");
        let second = dir.path().join("perp_2_vic_data_labelled.csv");
        fs::write(&first, "ID,grooming_label\n1,no\n2,yes\n").unwrap();
        fs::write(&second, "ID,grooming_label\n3,yes\n").unwrap();

        let combined = combine_labelled(&[&first, &second], dir.path()).unwrap();
        assert_eq!(combined.rows, 3);
        assert_eq!(combined.columns, 2);
        assert_eq!(combined.output, dir.path().join(COMBINED_FILE_NAME));
        assert_eq!(
            fs::read_to_string(&combined.output).unwrap(),
            "ID,grooming_label\n1,no\n2,yes\n3,yes\n"
        );
    }

    #[test]
    fn test_combine_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone_labelled.csv");
        assert!(combine_labelled(&[missing], dir.path()).is_err());
        assert!(!dir.path().join(COMBINED_FILE_NAME).exists());
    }
}
