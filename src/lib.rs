//! Compile linked parallel-coordinates plot descriptions into a Parasol page.
//!
//! A `Compiler` accumulates plots and settings through validated setters;
//! `build` merges multi-source data when needed and writes the HTML document.

pub mod compiler;
pub mod error;
pub mod merge;
pub mod render;
pub mod spec;

pub use compiler::{BuildReport, Compiler, Dataset};
pub use error::{ParasolError, ParasolResult};
pub use merge::{MergedDataset, merge_sources};
pub use render::{Document, Section};
pub use spec::{
    ApplicationSpec, BuildConfig, ControlAction, PlotOptions, PlotSpec, Resolution, Target,
};
