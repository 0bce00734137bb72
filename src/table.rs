use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::Path;

// A CSV file held in memory: header row plus data rows, fields kept verbatim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl Table {
    pub fn new(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self { headers, rows }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .clone();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let mut record = result
                .with_context(|| format!("reading record {} in {}", idx, path.display()))?;
            // short rows are padded with blanks, long rows cannot be placed
            if record.len() > headers.len() {
                bail!(
                    "{}: record {} has {} fields, expected {}",
                    path.display(),
                    idx,
                    record.len(),
                    headers.len()
                );
            }
            while record.len() < headers.len() {
                record.push_field("");
            }
            rows.push(record);
        }

        Ok(Self { headers, rows })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;

        writer
            .write_record(&self.headers)
            .with_context(|| format!("writing header to {}", path.display()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of `name`, or the error that aborts the run when it is absent
    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize> {
        self.column_index(name).with_context(|| {
            let file = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("{file} missing required column: {name}")
        })
    }

    // All values of one column, in row order
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row.get(idx).unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_keeps_fields_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "ID,score,text\n007,1.50,\"hi, there\"\n").unwrap();

        let table = Table::read(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column_index("score"), Some(1));
        assert_eq!(&table.rows[0][0], "007");
        assert_eq!(&table.rows[0][1], "1.50");
        assert_eq!(&table.rows[0][2], "hi, there");
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            StringRecord::from(vec!["ID", "note"]),
            vec![StringRecord::from(vec!["1", "a \"quoted\" note"])],
        );
        table.write(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "ID,note\n1,\"a \"\"quoted\"\" note\"\n");
        assert_eq!(Table::read(&path).unwrap(), table);
    }

    #[test]
    fn test_require_column_names_file_and_column() {
        let table = Table::new(StringRecord::from(vec!["id"]), vec![]);
        let err = table
            .require_column("ID", Path::new("Dataset/perp_1_vic_data.csv"))
            .unwrap_err();
        assert_eq!(err.to_string(), "perp_1_vic_data.csv missing required column: ID");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "ID,x,y\n1,a,b\n2,b\n").unwrap();

        let table = Table::read(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], StringRecord::from(vec!["2", "b", ""]));
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.csv");
        fs::write(&path, "ID,x\n1,a\n2,b,extra\n").unwrap();

        let err = Table::read(&path).unwrap_err();
        assert!(err.to_string().ends_with("record 1 has 3 fields, expected 2"));
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}ID,x\n1,a\n").unwrap();

        let table = Table::read(&path).unwrap();
        assert_eq!(table.column_index("ID"), Some(0));
        assert_eq!(&table.headers[0], "ID");
    }

    #[test]
    fn test_empty_file_has_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        let table = Table::read(&path).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_index("ID"), None);
    }
}
