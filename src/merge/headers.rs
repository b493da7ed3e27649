use crate::error::{ParasolError, ParasolResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read the header line (row 0) of a delimited source.
///
/// Only the first physical line is read. Each column name has trailing
/// whitespace removed, which also drops the `\r` of CRLF files.
///
/// Example:
/// `rights (af),cost ($) \n`  =>  `["rights (af)", "cost ($)"]`
pub fn read_header(path: &Path) -> ParasolResult<Vec<String>> {
    let file = File::open(path).map_err(|e| ParasolError::io(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| ParasolError::io(path, e))?;

    if line.trim().is_empty() {
        return Ok(Vec::new());
    }

    // Parse the single line as CSV so quoted names containing commas survive.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| ParasolError::csv(path, e))?;
    if !found {
        return Ok(Vec::new());
    }

    Ok(record.iter().map(|h| h.trim_end().to_string()).collect())
}

/// Header lists for each source, in the order given.
pub fn read_headers<P: AsRef<Path>>(paths: &[P]) -> ParasolResult<Vec<Vec<String>>> {
    paths.iter().map(|p| read_header(p.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        fs::write(&path, "mpg ,cylinders\t,origin\r\n18,8,usa\r\n").unwrap();

        assert_eq!(
            read_header(&path).unwrap(),
            vec!["mpg", "cylinders", "origin"]
        );
    }

    #[test]
    fn quoted_names_keep_their_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.csv");
        fs::write(&path, "\"cost, total\",id\n1,2\n").unwrap();

        assert_eq!(read_header(&path).unwrap(), vec!["cost, total", "id"]);
    }

    #[test]
    fn empty_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        assert!(read_header(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_header(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ParasolError::Io { .. }));
    }
}
