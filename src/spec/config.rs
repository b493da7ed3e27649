//! JSON build description.
//!
//! JSON shape:
//! {
//!   "page_title": "Lower Rio Grande Valley case study",
//!   "tab_title": "LRGV Analysis",
//!   "output": "lrgv.html",
//!   "grid": true,
//!   "linked": true,                     // or { "enabled": true, "plots": ["obj"] }
//!   "plots": [
//!     {
//!       "file": "data/lrgv.csv",
//!       "id": "obj",
//!       "title": "Objectives",
//!       "axes_layout": ["rel. (-)", "cost ($)"],
//!       "alpha": 0.65
//!     }
//!   ],
//!   "cluster": { "enabled": true, "colors": 3, "variables": "cost ($)" },
//!   "weighted_sum": { "variables": ["a", "b"], "weights": [0.5, 2] },
//!   "scales": [ { "variables": "cost ($)", "ranges": [0, 100], "plots": "obj" } ],
//!   "controls": ["export_brushed", "reset_brushed"]
//! }
//!
//! `apply` replays the description through the compiler's setters in a fixed
//! order (globals, plots, linking, clustering, weights, scales, controls) and
//! stops at the first rejection.

use crate::compiler::Compiler;
use crate::error::{ParasolError, ParasolResult};
use crate::spec::{ControlAction, PlotOptions, Target};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A bare value or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

fn target(plots: Option<OneOrMany<String>>) -> Target {
    plots.map_or(Target::All, |ids| Target::Ids(ids.into_vec()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default)]
    pub page_title: Option<String>,

    #[serde(default)]
    pub tab_title: Option<String>,

    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub merged_data: Option<String>,

    #[serde(default)]
    pub grid: Option<bool>,

    #[serde(default)]
    pub linked: Option<LinkSpec>,

    #[serde(default)]
    pub plots: Vec<RawPlot>,

    #[serde(default)]
    pub cluster: Option<ClusterSpec>,

    #[serde(default)]
    pub weighted_sum: Option<WeightSpec>,

    #[serde(default)]
    pub scales: Vec<ScaleSpec>,

    #[serde(default)]
    pub controls: Vec<String>,
}

/// `"linked": true` or `"linked": { "enabled": true, "plots": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LinkSpec {
    Flag(bool),
    Explicit {
        enabled: bool,
        #[serde(default)]
        plots: Option<OneOrMany<String>>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlot {
    pub file: PathBuf,
    pub id: PlotId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub columns_to_hide: Vec<String>,

    #[serde(default)]
    pub axes_layout: Vec<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub brushed_color: Option<String>,

    #[serde(default)]
    pub alpha: Option<f64>,

    #[serde(default)]
    pub brushed_alpha: Option<f64>,

    /// Any non-boolean value counts as `true`.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub reorderable: Option<bool>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(b),
        _ => Some(true),
    })
}

/// Plot ids may be written as strings or numbers; both become strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlotId {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for PlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotId::Text(s) => f.write_str(s),
            PlotId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSpec {
    pub enabled: bool,

    #[serde(default)]
    pub variables: Option<OneOrMany<String>>,

    #[serde(default = "default_colors")]
    pub colors: u32,

    #[serde(default)]
    pub plots: Option<OneOrMany<String>>,
}

fn default_colors() -> u32 {
    crate::spec::DEFAULT_CLUSTER_COLORS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightSpec {
    pub variables: OneOrMany<String>,
    pub weights: OneOrMany<f64>,

    #[serde(default)]
    pub plots: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleSpec {
    pub variables: OneOrMany<String>,
    /// A single `[min, max]` or a list of them.
    pub ranges: ScaleRanges,

    #[serde(default)]
    pub plots: Option<OneOrMany<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScaleRanges {
    Many(Vec<Vec<f64>>),
    One(Vec<f64>),
}

impl ScaleRanges {
    fn validated(&self) -> ParasolResult<Vec<[f64; 2]>> {
        match self {
            ScaleRanges::One(pair) => Ok(vec![crate::spec::validate::scale_range(pair)?]),
            ScaleRanges::Many(pairs) => pairs
                .iter()
                .map(|p| crate::spec::validate::scale_range(p))
                .collect(),
        }
    }
}

impl BuildConfig {
    pub fn from_json(text: &str) -> ParasolResult<Self> {
        serde_json::from_str(text).map_err(|e| ParasolError::serde(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ParasolResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ParasolError::io(path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| ParasolError::serde(format!("{}: {}", path.display(), e)))
    }

    /// Replay this description onto `compiler`.
    pub fn apply(self, compiler: &mut Compiler) -> anyhow::Result<()> {
        if let Some(title) = self.page_title {
            compiler.set_page_title(title);
        }
        if let Some(title) = self.tab_title {
            compiler.set_tab_title(title);
        }
        if let Some(output) = self.output {
            compiler.set_output_file(output)?;
        }
        if let Some(name) = self.merged_data {
            compiler.set_merged_data_name(name)?;
        }
        if let Some(grid) = self.grid {
            compiler.set_grid(grid);
        }

        for (n, raw) in self.plots.into_iter().enumerate() {
            let id = raw.id.to_string();
            let mut opts = PlotOptions::new(raw.file, &id)
                .columns_to_hide(raw.columns_to_hide)
                .axes_layout(raw.axes_layout)
                .reorderable(raw.reorderable.unwrap_or(true));
            opts.title = raw.title;
            opts.color = raw.color;
            opts.brushed_color = raw.brushed_color;
            opts.alpha = raw.alpha;
            opts.brushed_alpha = raw.brushed_alpha;
            compiler
                .add_plot(opts)
                .with_context(|| format!("plots[{}] (id {:?})", n, id))?;
        }

        match self.linked {
            None => {}
            Some(LinkSpec::Flag(enabled)) => {
                compiler.set_linked(enabled, Target::All);
            }
            Some(LinkSpec::Explicit { enabled, plots }) => {
                compiler.set_linked(enabled, target(plots));
            }
        }

        if let Some(cluster) = self.cluster {
            compiler
                .set_color_cluster(
                    cluster.enabled,
                    cluster.variables.map(OneOrMany::into_vec),
                    cluster.colors,
                    target(cluster.plots),
                )
                .context("cluster")?;
        }

        if let Some(ws) = self.weighted_sum {
            compiler
                .replace_weights(
                    ws.variables.into_vec(),
                    ws.weights.into_vec(),
                    target(ws.plots),
                )
                .context("weighted_sum")?;
        }

        for (n, scale) in self.scales.into_iter().enumerate() {
            let ranges = scale
                .ranges
                .validated()
                .with_context(|| format!("scales[{}]", n))?;
            compiler
                .append_scale(scale.variables.into_vec(), ranges, target(scale.plots))
                .with_context(|| format!("scales[{}]", n))?;
        }

        for key in self.controls {
            match ControlAction::from_key(&key) {
                Some(action) => compiler.add_control(action),
                None => anyhow::bail!("unknown control {:?}", key),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_or_list_values_parse() {
        let cfg = BuildConfig::from_json(
            r#"{
                "cluster": { "enabled": true, "variables": "cost" },
                "weighted_sum": { "variables": ["a", "b"], "weights": [1, 0.5] },
                "scales": [
                    { "variables": "a", "ranges": [0, 10] },
                    { "variables": ["a", "b"], "ranges": [[0, 1], [2, 3]], "plots": "p" }
                ]
            }"#,
        )
        .unwrap();

        let cluster = cfg.cluster.unwrap();
        assert_eq!(cluster.colors, 4);
        assert_eq!(cluster.variables.unwrap().into_vec(), vec!["cost"]);
        assert_eq!(cfg.weighted_sum.unwrap().weights.into_vec(), vec![1.0, 0.5]);
        assert_eq!(cfg.scales[0].ranges.validated().unwrap(), vec![[0.0, 10.0]]);
        assert_eq!(
            cfg.scales[1].ranges.validated().unwrap(),
            vec![[0.0, 1.0], [2.0, 3.0]]
        );
    }

    #[test]
    fn numeric_plot_ids_become_strings() {
        let cfg =
            BuildConfig::from_json(r#"{ "plots": [ { "file": "a.csv", "id": 7 } ] }"#).unwrap();
        assert_eq!(cfg.plots[0].id.to_string(), "7");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = BuildConfig::from_json(r#"{ "titel": "x" }"#).unwrap_err();
        assert!(matches!(err, ParasolError::Serde(_)));
    }

    #[test]
    fn short_scale_pair_is_rejected() {
        let cfg = BuildConfig::from_json(r#"{ "scales": [ { "variables": "a", "ranges": [1] } ] }"#)
            .unwrap();
        assert!(cfg.scales[0].ranges.validated().is_err());
    }
}
