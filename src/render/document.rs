use super::section::{Context, Section, emit};
use crate::compiler::Dataset;
use crate::error::ParasolResult;
use crate::spec::ApplicationSpec;
use std::fmt;

/// A rendered document: one fragment per section, in `Section::ORDER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    fragments: Vec<(Section, String)>,
}

impl Document {
    pub fn section(&self, section: Section) -> &str {
        self.fragments
            .iter()
            .find(|(s, _)| *s == section)
            .map_or("", |(_, text)| text.as_str())
    }

    pub fn fragments(&self) -> impl Iterator<Item = (Section, &str)> {
        self.fragments.iter().map(|(s, t)| (*s, t.as_str()))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, text) in &self.fragments {
            f.write_str(text)?;
        }
        Ok(())
    }
}

/// Render `spec` against a resolved dataset.
pub fn render_document(spec: &ApplicationSpec, dataset: &Dataset) -> ParasolResult<Document> {
    let cx = Context { spec, dataset };
    let fragments = Section::ORDER
        .iter()
        .map(|&s| -> ParasolResult<(Section, String)> { Ok((s, emit(s, &cx)?)) })
        .collect::<ParasolResult<Vec<_>>>()?;
    Ok(Document { fragments })
}
