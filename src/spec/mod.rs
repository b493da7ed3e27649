//! Spec layer: the accumulated plot/application state plus its JSON form.
//!
//! It owns:
//! - PlotSpec / ApplicationSpec (what a build serializes)
//! - Target / Resolution (which plots a setting reaches)
//! - argument validation for setters
//! - BuildConfig (JSON build description)

pub mod app;
pub mod config;
pub mod plot;
pub mod target;
pub mod validate;

pub use app::{
    ApplicationSpec, Clustering, Control, ControlAction, DEFAULT_CLUSTER_COLORS,
    DEFAULT_MERGED_DATA_NAME, DEFAULT_OUTPUT_NAME, DEFAULT_TAB_TITLE, Linking, WeightedSum,
};
pub use config::{BuildConfig, OneOrMany};
pub use plot::{PlotOptions, PlotSpec, ScaleOverride};
pub use target::{Resolution, Target, resolve};
