use super::Compiler;
use crate::error::{ParasolError, ParasolResult};
use crate::merge::{self, write_text_atomic};
use crate::render::{Document, render_document};
use crate::spec::validate;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The dataset a document loads, once sources have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Path as written into the document's data-loading call.
    pub reference: String,
    /// Per-plot source header lists. All empty when no merge happened.
    pub headers: Vec<Vec<String>>,
    /// On-disk location of the merged file, if one was produced.
    pub merged: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub document: PathBuf,
    pub dataset: Dataset,
    pub bytes: usize,
}

impl Compiler {
    /// Resolve the dataset for the current plots.
    ///
    /// If every plot reads the same file it is referenced relative to
    /// `out_dir`. Otherwise each plot's source (duplicates included,
    /// registration order) is merged into `out_dir/<merged_data_name>`.
    /// Either way the reference resolves from the document's directory.
    pub fn prepare_dataset(&self, out_dir: &Path) -> ParasolResult<Dataset> {
        let plots = &self.spec.plots;
        let Some(first) = plots.first() else {
            return Err(ParasolError::structure("no plots registered"));
        };

        if self.spec.single_source() {
            return Ok(Dataset {
                reference: relative_to(&first.source_file, out_dir)?
                    .to_string_lossy()
                    .into_owned(),
                headers: vec![Vec::new(); plots.len()],
                merged: None,
            });
        }

        let sources: Vec<&Path> = plots.iter().map(|p| p.source_file.as_path()).collect();
        let out = out_dir.join(&self.spec.merged_data_name);
        let merged = merge::merge_sources(&sources, &out)?;

        Ok(Dataset {
            reference: self.spec.merged_data_name.clone(),
            headers: merged.headers,
            merged: Some(merged.path),
        })
    }

    /// Render the document for `dataset` without writing anything.
    pub fn render(&self, dataset: &Dataset) -> ParasolResult<Document> {
        render_document(&self.spec, dataset)
    }

    /// Build into the configured output file.
    pub fn build(&self) -> ParasolResult<BuildReport> {
        self.build_to(&self.spec.output_file)
    }

    /// Build into `path` instead of the configured output file.
    ///
    /// Nothing is written when there are no plots; the document itself is
    /// written through a temporary file and only appears once complete.
    #[tracing::instrument(skip(self), fields(plots = self.spec.plots.len()))]
    pub fn build_to(&self, path: &Path) -> ParasolResult<BuildReport> {
        validate::document_name(path)?;
        if self.spec.plots.is_empty() {
            tracing::warn!("no plots registered, nothing to build");
            return Err(ParasolError::structure(
                "no plots registered; add a plot before building",
            ));
        }

        let out_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let dataset = self.prepare_dataset(out_dir)?;
        let text = self.render(&dataset)?.to_string();
        write_text_atomic(&text, path)?;

        tracing::info!(
            document = %path.display(),
            data = %dataset.reference,
            merged = dataset.merged.is_some(),
            "document written"
        );

        Ok(BuildReport {
            document: path.to_path_buf(),
            dataset,
            bytes: text.len(),
        })
    }
}

/// `target` as seen from directory `base`. Both must exist.
///
/// Falls back to the canonical `target` when the two share no root.
fn relative_to(target: &Path, base: &Path) -> ParasolResult<PathBuf> {
    let target = fs::canonicalize(target).map_err(|e| ParasolError::io(target, e))?;
    let base = fs::canonicalize(base).map_err(|e| ParasolError::io(base, e))?;

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return Ok(target);
    }

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &target_parts[common..] {
        out.push(part.as_os_str());
    }
    Ok(out)
}
