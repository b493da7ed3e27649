//! Dataset merger: join several delimited sources column-wise into one file.
//!
//! The merged file has no synthetic header of its own. Each source's header
//! row is row 0 of its table, so the first line of the output is the
//! concatenation of every source header, followed by the data rows.

pub mod headers;
pub mod table;

pub use headers::{read_header, read_headers};
pub use table::{Table, join_columns, read_table, write_table, write_text_atomic};

use crate::error::ParasolResult;
use std::path::{Path, PathBuf};

/// Result of a merge: where the joined file went and which columns came from
/// which source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDataset {
    pub path: PathBuf,
    /// One header list per input source, same order as the inputs.
    pub headers: Vec<Vec<String>>,
}

/// Merge `sources` column-wise into `out`.
///
/// Any unreadable source aborts the merge before `out` is touched.
#[tracing::instrument(skip(sources), fields(sources = sources.len()))]
pub fn merge_sources<P: AsRef<Path>>(sources: &[P], out: &Path) -> ParasolResult<MergedDataset> {
    let headers = read_headers(sources)?;

    let tables = sources
        .iter()
        .map(|p| read_table(p.as_ref()))
        .collect::<ParasolResult<Vec<_>>>()?;

    let joined = join_columns(&tables);
    write_table(&joined, out)?;

    tracing::debug!(
        rows = joined.height(),
        columns = joined.width,
        out = %out.display(),
        "merged sources"
    );

    Ok(MergedDataset {
        path: out.to_path_buf(),
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn headers_follow_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "x,y\n1,2\n").unwrap();
        fs::write(&b, "z\n3\n").unwrap();
        let out = dir.path().join("merged.csv");

        let merged = merge_sources(&[&b, &a], &out).unwrap();
        assert_eq!(merged.headers, vec![vec!["z"], vec!["x", "y"]]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "z,x,y\n3,1,2\n");
    }

    #[test]
    fn unreadable_source_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        fs::write(&a, "x\n1\n").unwrap();
        let out = dir.path().join("merged.csv");

        let result = merge_sources(&[a, dir.path().join("gone.csv")], &out);
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
