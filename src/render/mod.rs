//! Document emission. Each section is rendered independently and the
//! fragments are joined in a fixed order.

pub mod document;
pub mod section;

pub use document::{Document, render_document};
pub use section::{Section, axes_to_hide};
