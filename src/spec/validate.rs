//! Argument checks for setter inputs. Each returns the accepted (possibly
//! normalized) value or a `Validation` error with the reason.

use crate::error::{ParasolError, ParasolResult};
use regex::Regex;
use std::fs::File;
use std::path::Path;
use std::sync::LazyLock;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("valid color regex"));

/// Six hex digits, with or without a leading `#`. Returned with the `#`.
pub fn color(value: &str) -> ParasolResult<String> {
    let caps = HEX_COLOR_RE.captures(value.trim()).ok_or_else(|| {
        ParasolError::validation(format!("color {:?} is not a six digit hex code", value))
    })?;
    Ok(format!("#{}", &caps[1]))
}

/// Opacity in (0, 1].
pub fn alpha(value: f64) -> ParasolResult<f64> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ParasolError::validation(format!(
            "alpha {} is outside (0, 1]",
            value
        )))
    }
}

pub fn color_count(value: u32) -> ParasolResult<u32> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(ParasolError::validation(
            "number of cluster colors must be a positive integer",
        ))
    }
}

/// Output document name: must carry the `html` extension and a file stem.
pub fn document_name(path: &Path) -> ParasolResult<()> {
    let has_stem = path
        .file_stem()
        .is_some_and(|s| !s.is_empty() && !s.to_string_lossy().starts_with('.'));
    let is_html = path.extension().is_some_and(|e| e == "html");
    if has_stem && is_html {
        Ok(())
    } else {
        Err(ParasolError::validation(format!(
            "output document {} must end in .html",
            path.display()
        )))
    }
}

/// Merged dataset name: a bare `*.csv` file name.
pub fn data_name(name: &str) -> ParasolResult<()> {
    let path = Path::new(name);
    let bare = path.file_name().is_some_and(|f| f == path.as_os_str());
    let is_csv = path.extension().is_some_and(|e| e == "csv");
    if bare && is_csv {
        Ok(())
    } else {
        Err(ParasolError::validation(format!(
            "merged data name {:?} must be a bare .csv file name",
            name
        )))
    }
}

/// The source must exist and be openable now. The handle is dropped at once.
pub fn readable_file(path: &Path) -> ParasolResult<()> {
    File::open(path).map_err(|e| ParasolError::io(path, e))?;
    Ok(())
}

pub fn plot_id(id: &str) -> ParasolResult<()> {
    if id.is_empty() {
        Err(ParasolError::validation("plot id must not be empty"))
    } else {
        Ok(())
    }
}

/// Names supplied for columns must be non-empty.
pub fn column_names(what: &str, names: &[String]) -> ParasolResult<()> {
    if names.iter().any(|n| n.is_empty()) {
        return Err(ParasolError::validation(format!(
            "{} contains an empty column name",
            what
        )));
    }
    Ok(())
}

/// Paired lists must line up one to one.
pub fn same_length(what: &str, left: usize, right: usize) -> ParasolResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(ParasolError::structure(format!(
            "{}: {} names but {} values",
            what, left, right
        )))
    }
}

pub fn weight(value: f64) -> ParasolResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParasolError::validation(format!(
            "weight {} is not a finite number",
            value
        )))
    }
}

/// A `[min, max]` pair given as a slice; exactly two finite numbers.
pub fn scale_range(values: &[f64]) -> ParasolResult<[f64; 2]> {
    match values {
        [min, max] if min.is_finite() && max.is_finite() => Ok([*min, *max]),
        [_, _] => Err(ParasolError::validation(format!(
            "scale {:?} must hold finite numbers",
            values
        ))),
        _ => Err(ParasolError::validation(format!(
            "scale {:?} must have exactly two elements [min, max]",
            values
        ))),
    }
}
