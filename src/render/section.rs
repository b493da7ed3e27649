use crate::compiler::Dataset;
use crate::error::{ParasolError, ParasolResult};
use crate::spec::{ApplicationSpec, PlotSpec};
use serde::Serialize;
use std::fmt::Write as _;

/// Document sections in emission order. Every section is emitted on every
/// build, even when its fragment is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Head,
    Controls,
    PlotBodies,
    DataLoader,
    AxesToHide,
    AxesLayout,
    Weights,
    Parasol,
    PlotStyles,
    ControlWiring,
    Tail,
}

impl Section {
    pub const ORDER: [Section; 11] = [
        Section::Head,
        Section::Controls,
        Section::PlotBodies,
        Section::DataLoader,
        Section::AxesToHide,
        Section::AxesLayout,
        Section::Weights,
        Section::Parasol,
        Section::PlotStyles,
        Section::ControlWiring,
        Section::Tail,
    ];
}

pub struct Context<'a> {
    pub spec: &'a ApplicationSpec,
    pub dataset: &'a Dataset,
}

/// JSON literal safe to embed inside a `<script>` element.
fn js<T: Serialize + ?Sized>(value: &T) -> ParasolResult<String> {
    let text = serde_json::to_string(value).map_err(|e| ParasolError::serde(e.to_string()))?;
    Ok(text.replace("</", "<\\/"))
}

fn html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// `var name = {\nk: v,\nk: v\n};`
fn js_table(name: &str, entries: &[(String, String)]) -> String {
    let mut out = format!("var {} = {{\n", name);
    let body = entries
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(",\n");
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out.push_str("};\n");
    out
}

pub fn emit(section: Section, cx: &Context<'_>) -> ParasolResult<String> {
    match section {
        Section::Head => Ok(head(cx.spec)),
        Section::Controls => Ok(controls(cx.spec)),
        Section::PlotBodies => Ok(plot_bodies(cx.spec)),
        Section::DataLoader => data_loader(cx.dataset),
        Section::AxesToHide => axes_to_hide_table(cx.spec, cx.dataset),
        Section::AxesLayout => axes_layout_table(cx.spec),
        Section::Weights => weights(cx.spec),
        Section::Parasol => parasol(cx.spec),
        Section::PlotStyles => plot_styles(cx.spec),
        Section::ControlWiring => control_wiring(cx.spec),
        Section::Tail => Ok("});\n</script>\n</body>\n</html>\n".to_string()),
    }
}

fn head(spec: &ApplicationSpec) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n");
    out.push_str("<meta content=\"text/html;charset=utf-8\" http-equiv=\"Content-Type\">\n");
    out.push_str("<meta content=\"utf-8\" http-equiv=\"encoding\">\n");
    let _ = writeln!(out, "<title>{}</title>", html(&spec.tab_title));
    out.push_str("<link rel=\"stylesheet\" type=\"text/css\" href=\"parasol.css\">\n");
    out.push_str("<script src=\"d3.v5.min.js\"></script>\n");
    out.push_str("<script src=\"parasol.standalone.js\"></script>\n");
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", html(&spec.page_title));
    out
}

fn controls(spec: &ApplicationSpec) -> String {
    if spec.controls.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"widgets\">\n");
    for control in &spec.controls {
        let _ = writeln!(
            out,
            "<button id=\"{}\">{}</button>",
            attr(&control.key),
            html(&control.label)
        );
    }
    out.push_str("</div>\n");
    out
}

fn plot_bodies(spec: &ApplicationSpec) -> String {
    let mut out = String::new();
    for (i, plot) in spec.plots.iter().enumerate() {
        let _ = writeln!(out, "<h2>{}</h2>", html(&plot.title));
        let _ = writeln!(
            out,
            "<div id=\"p{}\" class=\"parcoords\" style=\"height:200px; width:850px;\"></div>",
            i
        );
    }
    if spec.attach_grid {
        out.push_str(
            "<div id=\"grid\" style=\"width:100%;height:700px;\" class=\"slickgrid-container\"></div>\n",
        );
    }
    out
}

fn data_loader(dataset: &Dataset) -> ParasolResult<String> {
    Ok(format!(
        "<script>\nd3.csv({}).then(function(data) {{\n",
        js(&dataset.reference)?
    ))
}

/// Columns each plot must hide.
///
/// A plot hides its own `columns_to_hide` plus, for every other plot reading a
/// different source file, all of that plot's source columns. `headers` is
/// parallel to `plots`; with a single shared source it is all empty lists.
pub fn axes_to_hide(plots: &[PlotSpec], headers: &[Vec<String>]) -> Vec<Vec<String>> {
    plots
        .iter()
        .enumerate()
        .map(|(i, plot)| {
            let mut hidden = plot.columns_to_hide.clone();
            for (j, other) in plots.iter().enumerate() {
                if j == i || other.source_file == plot.source_file {
                    continue;
                }
                if let Some(cols) = headers.get(j) {
                    hidden.extend(cols.iter().cloned());
                }
            }
            hidden
        })
        .collect()
}

fn axes_to_hide_table(spec: &ApplicationSpec, dataset: &Dataset) -> ParasolResult<String> {
    let entries = axes_to_hide(&spec.plots, &dataset.headers)
        .iter()
        .enumerate()
        .map(|(i, cols)| -> ParasolResult<(String, String)> {
            Ok((i.to_string(), js(cols)?))
        })
        .collect::<ParasolResult<Vec<_>>>()?;
    Ok(js_table("axes_to_hide", &entries))
}

fn axes_layout_table(spec: &ApplicationSpec) -> ParasolResult<String> {
    let entries = spec
        .plots
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.axes_layout.is_empty())
        .map(|(i, p)| -> ParasolResult<(String, String)> {
            Ok((i.to_string(), js(&p.axes_layout)?))
        })
        .collect::<ParasolResult<Vec<_>>>()?;
    Ok(js_table("axes_layout", &entries))
}

fn weights(spec: &ApplicationSpec) -> ParasolResult<String> {
    let Some(ws) = &spec.weighted_sum else {
        return Ok(String::new());
    };
    let entries = ws
        .weights
        .iter()
        .map(|(name, w)| -> ParasolResult<(String, String)> {
            Ok((js(name)?, js(w)?))
        })
        .collect::<ParasolResult<Vec<_>>>()?;
    Ok(js_table("weights", &entries))
}

/// The global configuration chain. `hideAxes` always precedes
/// `setAxesLayout` so an explicit layout is applied last.
fn parasol(spec: &ApplicationSpec) -> ParasolResult<String> {
    let mut lines = vec!["var ps = Parasol(data)('.parcoords')".to_string()];

    if spec.attach_grid {
        lines.push(".attachGrid({container: '#grid'})".to_string());
    }

    if spec.linking.enabled {
        match &spec.linking.plots {
            Some(ids) => lines.push(format!(".linked(chartIDs = {})", js(ids)?)),
            None => lines.push(".linked()".to_string()),
        }
    }

    let cluster = &spec.clustering;
    if cluster.enabled {
        let mut call = format!(".cluster({{k: {}", cluster.color_count);
        if let Some(ids) = &cluster.plots {
            let _ = write!(call, ", displayIDs: {}", js(ids)?);
        }
        if let Some(vars) = &cluster.variables {
            let _ = write!(call, ", vars: {}", js(vars)?);
        }
        call.push_str("})");
        lines.push(call);
    }

    if let Some(ws) = &spec.weighted_sum {
        let mut call = ".weightedSum({weights: weights".to_string();
        if let Some(ids) = &ws.plots {
            let _ = write!(call, ", displayIDs: {}", js(ids)?);
        }
        call.push_str("})");
        lines.push(call);
    }

    lines.push(".hideAxes(axes_to_hide)".to_string());
    lines.push(".setAxesLayout(axes_layout);".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

/// Per-plot directives, only for attributes that were set.
fn plot_styles(spec: &ApplicationSpec) -> ParasolResult<String> {
    let mut out = String::new();
    for (i, plot) in spec.plots.iter().enumerate() {
        if !plot.has_styling() {
            continue;
        }
        let _ = write!(out, "ps.charts[{}]", i);
        if let Some(color) = &plot.color {
            let _ = write!(out, ".color({})", js(color)?);
        }
        if let Some(alpha) = plot.alpha {
            let _ = write!(out, ".alpha({})", js(&alpha)?);
        }
        if plot.reorderable == Some(true) {
            out.push_str(".reorderable()");
        }
        if let Some(color) = &plot.brushed_color {
            let _ = write!(out, ".brushedColor({})", js(color)?);
        }
        if let Some(alpha) = plot.brushed_alpha {
            let _ = write!(out, ".alphaOnBrushed({})", js(&alpha)?);
        }
        for scale in &plot.scales {
            let _ = write!(out, ".scale({}, {})", js(&scale.column)?, js(&scale.range)?);
        }
        out.push_str(";\n");
    }
    Ok(out)
}

fn control_wiring(spec: &ApplicationSpec) -> ParasolResult<String> {
    let mut out = String::new();
    for control in &spec.controls {
        let Some(action) = control.action() else {
            continue;
        };
        let _ = writeln!(
            out,
            "d3.select({}).on('click', function() {{\n{};\n}});",
            js(&format!("#{}", control.key))?,
            action.script()
        );
    }
    Ok(out)
}
