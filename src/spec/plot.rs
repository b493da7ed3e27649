use std::path::PathBuf;

/// One `(column, [min, max])` axis scale directive.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOverride {
    pub column: String,
    pub range: [f64; 2],
}

/// One registered parallel-coordinates plot.
///
/// Styling fields are `None` until explicitly set; unset styling is left to
/// the renderer's defaults and never emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub source_file: PathBuf,
    pub id: String,
    pub title: String,

    /// Explicit visible column order. When non-empty it wins over
    /// `columns_to_hide`.
    pub axes_layout: Vec<String>,
    pub columns_to_hide: Vec<String>,

    /// Append-only; later directives for the same column take effect last.
    pub scales: Vec<ScaleOverride>,

    pub color: Option<String>,
    pub alpha: Option<f64>,
    pub brushed_color: Option<String>,
    pub brushed_alpha: Option<f64>,
    pub reorderable: Option<bool>,
}

impl PlotSpec {
    pub fn new(source_file: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            id: id.into(),
            title: String::new(),
            axes_layout: Vec::new(),
            columns_to_hide: Vec::new(),
            scales: Vec::new(),
            color: None,
            alpha: None,
            brushed_color: None,
            brushed_alpha: None,
            reorderable: None,
        }
    }

    /// True if any per-plot styling directive would be emitted.
    pub fn has_styling(&self) -> bool {
        self.color.is_some()
            || self.alpha.is_some()
            || self.reorderable == Some(true)
            || self.brushed_color.is_some()
            || self.brushed_alpha.is_some()
            || !self.scales.is_empty()
    }
}

/// Arguments for registering a plot. Only `source_file` and `id` are required.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub source_file: PathBuf,
    pub id: String,
    pub title: Option<String>,
    pub columns_to_hide: Vec<String>,
    pub axes_layout: Vec<String>,
    pub color: Option<String>,
    pub brushed_color: Option<String>,
    pub alpha: Option<f64>,
    pub brushed_alpha: Option<f64>,
    pub reorderable: bool,
}

impl PlotOptions {
    pub fn new(source_file: impl Into<PathBuf>, id: impl ToString) -> Self {
        Self {
            source_file: source_file.into(),
            id: id.to_string(),
            title: None,
            columns_to_hide: Vec::new(),
            axes_layout: Vec::new(),
            color: None,
            brushed_color: None,
            alpha: None,
            brushed_alpha: None,
            reorderable: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn columns_to_hide<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_to_hide = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn axes_layout<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.axes_layout = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn brushed_color(mut self, color: impl Into<String>) -> Self {
        self.brushed_color = Some(color.into());
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn brushed_alpha(mut self, alpha: f64) -> Self {
        self.brushed_alpha = Some(alpha);
        self
    }

    pub fn reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }
}
