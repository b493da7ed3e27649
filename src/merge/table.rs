use crate::error::{ParasolError, ParasolResult};
use std::io::Write;
use std::path::Path;

/// A source file read as rows of text cells. Row 0 is the source's header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Widest row seen; shorter rows are padded to this when joined.
    pub width: usize,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { width, rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cells of row `i`, padded with empty strings to the table width.
    /// Rows past the end of the table are entirely empty.
    fn padded_row(&self, i: usize) -> impl Iterator<Item = &str> {
        let row = self.rows.get(i).map(Vec::as_slice).unwrap_or(&[]);
        row.iter()
            .map(String::as_str)
            .chain(std::iter::repeat_n("", self.width - row.len()))
    }
}

/// Read a whole delimited file, every cell kept as text.
pub fn read_table(path: &Path) -> ParasolResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ParasolError::csv(path, e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParasolError::csv(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_rows(rows))
}

/// Join tables side by side. Row `i` of the result is row `i` of every table
/// in order; the result is as tall as the tallest input.
pub fn join_columns(tables: &[Table]) -> Table {
    let height = tables.iter().map(Table::height).max().unwrap_or(0);

    let rows = (0..height)
        .map(|i| {
            tables
                .iter()
                .flat_map(|t| t.padded_row(i))
                .map(str::to_string)
                .collect()
        })
        .collect();

    Table::from_rows(rows)
}

/// Write `table` to `path` as CSV.
///
/// Rows go to a temporary file in the destination directory which is renamed
/// over `path` only once every row has been flushed.
pub fn write_table(table: &Table, path: &Path) -> ParasolResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ParasolError::io(dir, e))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(tmp.as_file());
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| ParasolError::csv(path, e))?;
        }
        writer.flush().map_err(|e| ParasolError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| ParasolError::io(path, e))?;

    tmp.persist(path)
        .map_err(|e| ParasolError::io(path, e.error))?;
    Ok(())
}

/// Write text to `path` through a temporary sibling file.
pub fn write_text_atomic(text: &str, path: &Path) -> ParasolResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ParasolError::io(dir, e))?;
    tmp.write_all(text.as_bytes())
        .map_err(|e| ParasolError::io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ParasolError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| ParasolError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rows: &[&[&str]]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn join_is_column_wise() {
        let left = table(&[&["a", "b"], &["1", "2"]]);
        let right = table(&[&["c"], &["3"]]);

        let joined = join_columns(&[left, right]);
        assert_eq!(joined, table(&[&["a", "b", "c"], &["1", "2", "3"]]));
    }

    #[test]
    fn shorter_tables_are_padded_with_empty_cells() {
        let tall = table(&[&["a"], &["1"], &["2"]]);
        let short = table(&[&["b", "c"]]);

        let joined = join_columns(&[tall, short]);
        assert_eq!(
            joined,
            table(&[&["a", "b", "c"], &["1", "", ""], &["2", "", ""]])
        );
    }

    #[test]
    fn ragged_rows_are_padded_to_table_width() {
        let ragged = table(&[&["a", "b", "c"], &["1"]]);
        let other = table(&[&["d"], &["4"]]);

        let joined = join_columns(&[ragged, other]);
        assert_eq!(joined.rows[1], vec!["1", "", "", "4"]);
        assert_eq!(joined.width, 4);
    }

    #[test]
    fn no_tables_join_to_nothing() {
        assert_eq!(join_columns(&[]), Table::default());
    }

    #[test]
    fn write_then_read_keeps_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let t = table(&[&["name", "note"], &["x", "has, comma"]]);

        write_table(&t, &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name,note\nx,\"has, comma\"\n"
        );
        assert_eq!(read_table(&path).unwrap(), t);
    }

    #[test]
    fn write_into_missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_table(&table(&[&["a"]]), &path).unwrap_err();
        assert!(matches!(err, ParasolError::Io { .. }));
        assert!(!path.exists());
    }
}
