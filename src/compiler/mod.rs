//! Configuration compiler: validated mutations over an `ApplicationSpec`.
//!
//! Every setter validates its arguments before touching state, so an `Err`
//! always leaves the application spec as it was. Id-targeted setters return the
//! `Resolution` they applied to; an empty one means nothing changed.

mod build;

pub use build::{BuildReport, Dataset};

use crate::error::{ParasolError, ParasolResult};
use crate::spec::validate;
use crate::spec::{
    ApplicationSpec, Control, ControlAction, PlotOptions, PlotSpec, Resolution, ScaleOverride,
    Target, WeightedSum, resolve,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    spec: ApplicationSpec,
}

fn rejected(op: &'static str, err: ParasolError) -> ParasolError {
    tracing::warn!(op, error = %err, "setting rejected");
    err
}

/// Validate an optional plot field, dropping it with a warning if invalid.
fn optional<T, U>(
    id: &str,
    field: &'static str,
    value: Option<T>,
    check: impl FnOnce(T) -> ParasolResult<U>,
) -> Option<U> {
    match check(value?) {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(id, field, error = %err, "plot field rejected; leaving it unset");
            None
        }
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self) -> &ApplicationSpec {
        &self.spec
    }

    pub fn plots(&self) -> &[PlotSpec] {
        &self.spec.plots
    }

    /// First plot registered under `id`.
    pub fn plot(&self, id: &str) -> Option<&PlotSpec> {
        self.spec.plots.iter().find(|p| p.id == id)
    }

    pub fn resolve(&self, target: &Target) -> Resolution {
        resolve(&self.spec.plots, target)
    }

    fn apply_to(&mut self, target: Target, mut f: impl FnMut(&mut PlotSpec)) -> Resolution {
        let resolution = self.resolve(&target);
        for &i in resolution.indices() {
            f(&mut self.spec.plots[i]);
        }
        resolution
    }

    /// Subset for a global setting: `None` for all plots, the resolved
    /// indices otherwise. An id list matching nothing keeps `prior`.
    fn subset(
        &self,
        target: Target,
        prior: Option<Vec<usize>>,
    ) -> (Option<Vec<usize>>, Resolution) {
        let all = target == Target::All;
        let resolution = self.resolve(&target);
        let subset = if all {
            None
        } else if resolution.is_empty() {
            prior
        } else {
            Some(resolution.indices().to_vec())
        };
        (subset, resolution)
    }

    // ------------------------------------------------------------------
    // Plots
    // ------------------------------------------------------------------

    /// Register a plot. Returns its index.
    ///
    /// Only an unreadable source or an empty id fails the call. An invalid
    /// optional field is logged and left unset; the plot is still added.
    pub fn add_plot(&mut self, opts: PlotOptions) -> ParasolResult<usize> {
        let op = "add_plot";
        validate::readable_file(&opts.source_file).map_err(|e| rejected(op, e))?;
        validate::plot_id(&opts.id).map_err(|e| rejected(op, e))?;

        let id = opts.id.as_str();
        let columns_to_hide =
            optional(id, "columns_to_hide", Some(opts.columns_to_hide), |v| {
                validate::column_names("columns_to_hide", &v).map(|()| v)
            })
            .unwrap_or_default();
        let axes_layout = optional(id, "axes_layout", Some(opts.axes_layout), |v| {
            validate::column_names("axes_layout", &v).map(|()| v)
        })
        .unwrap_or_default();
        let color = optional(id, "color", opts.color.as_deref(), validate::color);
        let brushed_color = optional(
            id,
            "brushed_color",
            opts.brushed_color.as_deref(),
            validate::color,
        );
        let alpha = optional(id, "alpha", opts.alpha, validate::alpha);
        let brushed_alpha = optional(id, "brushed_alpha", opts.brushed_alpha, validate::alpha);

        if self.plot(&opts.id).is_some() {
            tracing::warn!(id = %opts.id, "plot id already registered; lookups will match both");
        }

        let mut plot = PlotSpec::new(opts.source_file, opts.id);
        plot.title = opts.title.unwrap_or_default();
        plot.axes_layout = axes_layout;
        plot.columns_to_hide = columns_to_hide;
        plot.color = color;
        plot.brushed_color = brushed_color;
        plot.alpha = alpha;
        plot.brushed_alpha = brushed_alpha;
        plot.reorderable = Some(opts.reorderable);

        tracing::debug!(id = %plot.id, source = %plot.source_file.display(), "plot added");
        self.spec.plots.push(plot);
        Ok(self.spec.plots.len() - 1)
    }

    pub fn set_plot_color(
        &mut self,
        color: &str,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let color = validate::color(color).map_err(|e| rejected("set_plot_color", e))?;
        Ok(self.apply_to(target.into(), |p| p.color = Some(color.clone())))
    }

    pub fn set_brushed_color(
        &mut self,
        color: &str,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let color = validate::color(color).map_err(|e| rejected("set_brushed_color", e))?;
        Ok(self.apply_to(target.into(), |p| p.brushed_color = Some(color.clone())))
    }

    pub fn set_plot_alpha(
        &mut self,
        alpha: f64,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let alpha = validate::alpha(alpha).map_err(|e| rejected("set_plot_alpha", e))?;
        Ok(self.apply_to(target.into(), |p| p.alpha = Some(alpha)))
    }

    pub fn set_brushed_alpha(
        &mut self,
        alpha: f64,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let alpha = validate::alpha(alpha).map_err(|e| rejected("set_brushed_alpha", e))?;
        Ok(self.apply_to(target.into(), |p| p.brushed_alpha = Some(alpha)))
    }

    pub fn set_reorderable(&mut self, reorderable: bool, target: impl Into<Target>) -> Resolution {
        self.apply_to(target.into(), |p| p.reorderable = Some(reorderable))
    }

    /// Append `(variable, [min, max])` scale directives to each targeted plot.
    ///
    /// Earlier directives for the same variable are kept; the renderer applies
    /// them in order, so the last one appended wins.
    pub fn append_scale<I, S>(
        &mut self,
        variables: I,
        ranges: Vec<[f64; 2]>,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let op = "append_scale";
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        validate::same_length("scales", variables.len(), ranges.len())
            .map_err(|e| rejected(op, e))?;
        validate::column_names("scales", &variables).map_err(|e| rejected(op, e))?;
        for range in &ranges {
            validate::scale_range(range).map_err(|e| rejected(op, e))?;
        }

        let directives: Vec<ScaleOverride> = variables
            .into_iter()
            .zip(ranges)
            .map(|(column, range)| ScaleOverride { column, range })
            .collect();
        Ok(self.apply_to(target.into(), |p| p.scales.extend(directives.iter().cloned())))
    }

    // ------------------------------------------------------------------
    // Application-wide settings
    // ------------------------------------------------------------------

    pub fn set_page_title(&mut self, title: impl Into<String>) {
        self.spec.page_title = title.into();
    }

    pub fn set_tab_title(&mut self, title: impl Into<String>) {
        self.spec.tab_title = title.into();
    }

    pub fn set_grid(&mut self, attach: bool) {
        self.spec.attach_grid = attach;
    }

    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) -> ParasolResult<()> {
        let path = path.into();
        validate::document_name(&path).map_err(|e| rejected("set_output_file", e))?;
        self.spec.output_file = path;
        Ok(())
    }

    pub fn set_merged_data_name(&mut self, name: impl Into<String>) -> ParasolResult<()> {
        let name = name.into();
        validate::data_name(&name).map_err(|e| rejected("set_merged_data_name", e))?;
        self.spec.merged_data_name = name;
        Ok(())
    }

    /// Enable or disable linking. `Target::All` links every plot; an id list
    /// restricts linking to the plots it resolves to.
    pub fn set_linked(&mut self, enabled: bool, target: impl Into<Target>) -> Resolution {
        let (plots, resolution) = self.subset(target.into(), self.spec.linking.plots.clone());
        self.spec.linking.enabled = enabled;
        self.spec.linking.plots = plots;
        resolution
    }

    pub fn set_color_cluster(
        &mut self,
        enabled: bool,
        variables: Option<Vec<String>>,
        color_count: u32,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let op = "set_color_cluster";
        let color_count = validate::color_count(color_count).map_err(|e| rejected(op, e))?;
        if enabled {
            if let Some(vars) = &variables {
                if vars.is_empty() {
                    return Err(rejected(
                        op,
                        ParasolError::validation("variables to cluster must name a column"),
                    ));
                }
                validate::column_names("cluster variables", vars).map_err(|e| rejected(op, e))?;
            }
        }

        let (plots, resolution) = self.subset(target.into(), self.spec.clustering.plots.clone());
        let clustering = &mut self.spec.clustering;
        clustering.enabled = enabled;
        clustering.color_count = color_count;
        clustering.variables = variables;
        clustering.plots = plots;
        Ok(resolution)
    }

    /// Replace the weighted-sum definition with `variables` x `weights`.
    pub fn replace_weights(
        &mut self,
        variables: Vec<String>,
        weights: Vec<f64>,
        target: impl Into<Target>,
    ) -> ParasolResult<Resolution> {
        let op = "replace_weights";
        validate::same_length("weighted sum", variables.len(), weights.len())
            .map_err(|e| rejected(op, e))?;
        validate::column_names("weighted sum", &variables).map_err(|e| rejected(op, e))?;
        for &w in &weights {
            validate::weight(w).map_err(|e| rejected(op, e))?;
        }

        let prior = self.spec.weighted_sum.as_ref().and_then(|w| w.plots.clone());
        let (plots, resolution) = self.subset(target.into(), prior);
        self.spec.weighted_sum = Some(WeightedSum {
            weights: variables.into_iter().zip(weights).collect(),
            plots,
        });
        Ok(resolution)
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    pub fn add_control(&mut self, action: ControlAction) {
        self.spec.controls.push(Control::from(action));
    }

    /// Register a control the renderer has no built-in action for. It gets
    /// markup but no click handler.
    pub fn add_custom_control(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.spec.controls.push(Control {
            key: key.into(),
            label: label.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        compiler: Compiler,
    }

    fn fixture(ids: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.csv");
        fs::write(&data, "a,b\n1,2\n").unwrap();
        let mut compiler = Compiler::new();
        for id in ids {
            compiler.add_plot(PlotOptions::new(&data, id)).unwrap();
        }
        Fixture {
            _dir: dir,
            compiler,
        }
    }

    #[test]
    fn add_plot_requires_a_readable_file() {
        let mut c = Compiler::new();
        let err = c
            .add_plot(PlotOptions::new("/definitely/not/here.csv", "p"))
            .unwrap_err();
        assert!(matches!(err, ParasolError::Io { .. }));
        assert!(c.plots().is_empty());
    }

    #[test]
    fn add_plot_defaults() {
        let f = fixture(&["p"]);
        let plot = &f.compiler.plots()[0];
        assert_eq!(plot.title, "");
        assert_eq!(plot.reorderable, Some(true));
        assert_eq!(plot.color, None);
        assert_eq!(plot.alpha, None);
    }

    #[test]
    fn add_plot_keeps_the_plot_and_drops_bad_styling() {
        let mut f = fixture(&[]);
        let data = f._dir.path().join("data.csv");
        let i = f
            .compiler
            .add_plot(
                PlotOptions::new(&data, "p")
                    .alpha(2.0)
                    .color("blue")
                    .brushed_color("00ff00")
                    .brushed_alpha(0.5),
            )
            .unwrap();

        let plot = &f.compiler.plots()[i];
        assert_eq!(plot.alpha, None);
        assert_eq!(plot.color, None);
        assert_eq!(plot.brushed_color.as_deref(), Some("#00ff00"));
        assert_eq!(plot.brushed_alpha, Some(0.5));
    }

    #[test]
    fn add_plot_drops_layout_with_empty_names() {
        let mut f = fixture(&[]);
        let data = f._dir.path().join("data.csv");
        f.compiler
            .add_plot(
                PlotOptions::new(&data, "p")
                    .axes_layout(["b", ""])
                    .columns_to_hide(["a"]),
            )
            .unwrap();

        let plot = &f.compiler.plots()[0];
        assert!(plot.axes_layout.is_empty());
        assert_eq!(plot.columns_to_hide, vec!["a".to_string()]);
    }

    #[test]
    fn unmatched_id_changes_nothing() {
        let mut f = fixture(&["a", "b"]);
        let before = f.compiler.spec().clone();

        let r = f
            .compiler
            .set_plot_color("#abcdef", ["nonexistent"])
            .unwrap();
        assert!(r.is_empty());
        assert_eq!(f.compiler.spec(), &before);
    }

    #[test]
    fn out_of_range_alpha_keeps_prior_value() {
        let mut f = fixture(&["a"]);
        assert!(f.compiler.set_plot_alpha(1.5, Target::All).is_err());
        assert_eq!(f.compiler.plots()[0].alpha, None);

        f.compiler.set_plot_alpha(0.4, Target::All).unwrap();
        assert!(f.compiler.set_plot_alpha(0.0, Target::All).is_err());
        assert_eq!(f.compiler.plots()[0].alpha, Some(0.4));
    }

    #[test]
    fn color_applies_to_targeted_plots_only() {
        let mut f = fixture(&["a", "b", "c"]);
        let r = f.compiler.set_plot_color("00ff00", ["a", "c"]).unwrap();
        assert_eq!(r.indices(), &[0, 2]);

        let colors: Vec<_> = f.compiler.plots().iter().map(|p| p.color.clone()).collect();
        assert_eq!(
            colors,
            vec![Some("#00ff00".to_string()), None, Some("#00ff00".to_string())]
        );
    }

    #[test]
    fn duplicate_ids_fan_out() {
        let mut f = fixture(&["a", "a"]);
        let r = f.compiler.set_brushed_alpha(0.3, "a").unwrap();
        assert_eq!(r.multiplicity("a"), 2);
        assert!(
            f.compiler
                .plots()
                .iter()
                .all(|p| p.brushed_alpha == Some(0.3))
        );
    }

    #[test]
    fn scales_accumulate_in_call_order() {
        let mut f = fixture(&["a"]);
        f.compiler
            .append_scale(["x"], vec![[0.0, 1.0]], "a")
            .unwrap();
        f.compiler
            .append_scale(["x"], vec![[5.0, 9.0]], "a")
            .unwrap();

        let ranges: Vec<_> = f.compiler.plots()[0]
            .scales
            .iter()
            .map(|s| (s.column.as_str(), s.range))
            .collect();
        assert_eq!(ranges, vec![("x", [0.0, 1.0]), ("x", [5.0, 9.0])]);
    }

    #[test]
    fn mismatched_scale_lists_are_rejected() {
        let mut f = fixture(&["a"]);
        let err = f
            .compiler
            .append_scale(["x", "y"], vec![[0.0, 1.0]], Target::All)
            .unwrap_err();
        assert!(matches!(err, ParasolError::Structure(_)));
        assert!(f.compiler.plots()[0].scales.is_empty());
    }

    #[test]
    fn weights_replace_rather_than_extend() {
        let mut f = fixture(&["a"]);
        f.compiler
            .replace_weights(vec!["x".into(), "y".into()], vec![1.0, 2.0], Target::All)
            .unwrap();
        f.compiler
            .replace_weights(vec!["z".into()], vec![0.5], Target::All)
            .unwrap();

        let ws = f.compiler.spec().weighted_sum.clone().unwrap();
        assert_eq!(ws.weights, vec![("z".to_string(), 0.5)]);
    }

    #[test]
    fn mismatched_weights_keep_prior_definition() {
        let mut f = fixture(&["a"]);
        f.compiler
            .replace_weights(vec!["x".into()], vec![1.0], Target::All)
            .unwrap();
        assert!(
            f.compiler
                .replace_weights(vec!["x".into(), "y".into()], vec![1.0], Target::All)
                .is_err()
        );
        assert_eq!(
            f.compiler.spec().weighted_sum.as_ref().unwrap().weights,
            vec![("x".to_string(), 1.0)]
        );
    }

    #[test]
    fn cluster_color_count_must_be_positive() {
        let mut f = fixture(&["a"]);
        assert!(
            f.compiler
                .set_color_cluster(true, None, 0, Target::All)
                .is_err()
        );
        assert!(!f.compiler.spec().clustering.enabled);
    }

    #[test]
    fn cluster_subset_is_resolved_to_indices() {
        let mut f = fixture(&["a", "b"]);
        f.compiler
            .set_color_cluster(true, Some(vec!["x".into()]), 3, "b")
            .unwrap();
        let c = &f.compiler.spec().clustering;
        assert!(c.enabled);
        assert_eq!(c.color_count, 3);
        assert_eq!(c.plots, Some(vec![1]));
    }

    #[test]
    fn linking_subset_survives_unmatched_ids() {
        let mut f = fixture(&["a", "b", "c"]);
        f.compiler.set_linked(true, ["a", "c"]);
        let r = f.compiler.set_linked(true, "typo");
        assert!(r.is_empty());
        assert_eq!(f.compiler.spec().linking.plots, Some(vec![0, 2]));

        f.compiler.set_linked(false, Target::All);
        assert!(!f.compiler.spec().linking.enabled);
        assert_eq!(f.compiler.spec().linking.plots, None);
    }

    #[test]
    fn output_file_needs_html_extension() {
        let mut c = Compiler::new();
        assert!(c.set_output_file("report.txt").is_err());
        assert_eq!(c.spec().output_file, PathBuf::from("parasol.html"));
        c.set_output_file("report.html").unwrap();
        assert_eq!(c.spec().output_file, PathBuf::from("report.html"));
    }

    #[test]
    fn controls_append_without_dedup() {
        let mut c = Compiler::new();
        c.add_control(ControlAction::ExportBrushed);
        c.add_control(ControlAction::ExportBrushed);
        c.add_custom_control("zoom", "Zoom");
        let keys: Vec<_> = c.spec().controls.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["export_brushed", "export_brushed", "zoom"]);
        assert_eq!(c.spec().controls[2].action(), None);
    }

    #[test]
    fn independent_compilers_do_not_share_state() {
        let mut a = fixture(&["a"]);
        let b = fixture(&["a"]);
        a.compiler.set_plot_color("#111111", Target::All).unwrap();
        assert_eq!(b.compiler.plots()[0].color, None);
    }
}
