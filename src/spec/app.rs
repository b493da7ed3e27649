use crate::spec::PlotSpec;
use std::path::PathBuf;

pub const DEFAULT_TAB_TITLE: &str = "Parasol";
pub const DEFAULT_OUTPUT_NAME: &str = "parasol.html";
pub const DEFAULT_MERGED_DATA_NAME: &str = "output_data.csv";
pub const DEFAULT_CLUSTER_COLORS: u32 = 4;

/// Cross-plot brushing. `plots` holds resolved plot indices; `None` links all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linking {
    pub enabled: bool,
    pub plots: Option<Vec<usize>>,
}

impl Default for Linking {
    fn default() -> Self {
        Self {
            enabled: true,
            plots: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clustering {
    pub enabled: bool,
    pub color_count: u32,
    /// Columns to cluster on; `None` clusters on all of them.
    pub variables: Option<Vec<String>>,
    /// Plot indices that display the clustering; `None` means all.
    pub plots: Option<Vec<usize>>,
}

impl Default for Clustering {
    fn default() -> Self {
        Self {
            enabled: false,
            color_count: DEFAULT_CLUSTER_COLORS,
            variables: None,
            plots: None,
        }
    }
}

/// Weighted-sum composite column. Replaced wholesale on every assignment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedSum {
    /// `(column, weight)` pairs in assignment order.
    pub weights: Vec<(String, f64)>,
    pub plots: Option<Vec<usize>>,
}

/// The built-in control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    ExportBrushed,
    ExportMarked,
    ResetBrushed,
    ResetMarked,
}

impl ControlAction {
    pub const ALL: [ControlAction; 4] = [
        ControlAction::ExportBrushed,
        ControlAction::ExportMarked,
        ControlAction::ResetBrushed,
        ControlAction::ResetMarked,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ControlAction::ExportBrushed => "export_brushed",
            ControlAction::ExportMarked => "export_marked",
            ControlAction::ResetBrushed => "reset_brushed",
            ControlAction::ResetMarked => "reset_marked",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlAction::ExportBrushed => "Export Brushed Data",
            ControlAction::ExportMarked => "Export Marked Data",
            ControlAction::ResetBrushed => "Reset Brushed Data",
            ControlAction::ResetMarked => "Reset Marked Data",
        }
    }

    /// Renderer call made when the control is clicked.
    pub fn script(self) -> &'static str {
        match self {
            ControlAction::ExportBrushed => "ps.exportData(type='brushed')",
            ControlAction::ExportMarked => "ps.exportData(type='marked')",
            ControlAction::ResetBrushed => "ps.resetSelections('brushed')",
            ControlAction::ResetMarked => "ps.resetSelections('marked')",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.key() == key)
    }
}

/// A registered UI control. Keys outside `ControlAction` get markup but no wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub key: String,
    pub label: String,
}

impl Control {
    pub fn action(&self) -> Option<ControlAction> {
        ControlAction::from_key(&self.key)
    }
}

impl From<ControlAction> for Control {
    fn from(action: ControlAction) -> Self {
        Self {
            key: action.key().to_string(),
            label: action.label().to_string(),
        }
    }
}

/// Accumulated state of one compilation session.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSpec {
    pub page_title: String,
    pub tab_title: String,
    pub output_file: PathBuf,
    /// Name of the merged dataset, written next to the output document.
    pub merged_data_name: String,
    pub attach_grid: bool,
    pub linking: Linking,
    pub clustering: Clustering,
    pub weighted_sum: Option<WeightedSum>,
    pub controls: Vec<Control>,
    pub plots: Vec<PlotSpec>,
}

impl Default for ApplicationSpec {
    fn default() -> Self {
        Self {
            page_title: String::new(),
            tab_title: DEFAULT_TAB_TITLE.to_string(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_NAME),
            merged_data_name: DEFAULT_MERGED_DATA_NAME.to_string(),
            attach_grid: false,
            linking: Linking::default(),
            clustering: Clustering::default(),
            weighted_sum: None,
            controls: Vec::new(),
            plots: Vec::new(),
        }
    }
}

impl ApplicationSpec {
    /// True when every plot reads the same source file (or there are no plots).
    pub fn single_source(&self) -> bool {
        match self.plots.split_first() {
            Some((first, rest)) => rest.iter().all(|p| p.source_file == first.source_file),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_keys_round_trip() {
        for action in ControlAction::ALL {
            assert_eq!(ControlAction::from_key(action.key()), Some(action));
        }
        assert_eq!(ControlAction::from_key("export_everything"), None);
    }

    #[test]
    fn single_source_compares_paths() {
        let mut app = ApplicationSpec::default();
        app.plots.push(PlotSpec::new("a.csv", "p"));
        app.plots.push(PlotSpec::new("a.csv", "q"));
        assert!(app.single_source());

        app.plots.push(PlotSpec::new("b.csv", "r"));
        assert!(!app.single_source());
    }
}
