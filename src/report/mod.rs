//! Chart rendering for the PCA cluster analysis.
//!
//! The scatter is drawn with the plotters SVG backend and embedded in a
//! self-contained HTML page together with a table of every plotted molecule.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use log::info;
use ndarray::Array2;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (900, 600);

/// Everything needed to draw one analysis.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub identifiers: Vec<String>,
    pub labels: Vec<usize>,
    /// `samples × components` projection; only the first two columns are
    /// plotted.
    pub projection: Array2<f64>,
    pub n_clusters: usize,
    pub explained_variance: Vec<f64>,
}

impl ChartData {
    /// Plot coordinates. With a single component the second axis is flat.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.projection
            .rows()
            .into_iter()
            .map(|row| (row[0], row.get(1).copied().unwrap_or(0.0)))
            .collect()
    }
}

/// Shows a rendered page to the user.
pub trait ChartViewer {
    fn show(&self, html: &str) -> Result<()>;
}

/// Writes the page into a directory (the system temp directory by default)
/// and logs where it went.
#[derive(Debug, Clone)]
pub struct TempFileViewer {
    directory: PathBuf,
    file_name: String,
}

impl TempFileViewer {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        TempFileViewer {
            directory: directory.into(),
            file_name: "pca_analysis_preview.html".to_string(),
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Temp-directory viewer whose page is named after `chart`, so analyses
    /// with different file names do not overwrite each other's preview.
    pub fn for_chart(chart: &Path) -> Self {
        TempFileViewer::default().file_name(preview_name(chart))
    }
}

/// `results/run.html` previews as `run_preview.html`.
fn preview_name(chart: &Path) -> String {
    let stem = chart
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("pca_analysis".into());
    format!("{}_preview.html", stem)
}

impl Default for TempFileViewer {
    fn default() -> Self {
        TempFileViewer::new(env::temp_dir())
    }
}

impl ChartViewer for TempFileViewer {
    fn show(&self, html: &str) -> Result<()> {
        let path = self.path();
        fs::write(&path, html)?;
        info!("PCA chart available at {}", path.display());
        Ok(())
    }
}

/// Writes the page to `path`, replacing any existing file.
pub fn write_chart(path: &Path, html: &str) -> std::io::Result<()> {
    fs::write(path, html)?;
    info!("PCA chart written to {}", path.display());
    Ok(())
}

pub fn render_scatter_svg(data: &ChartData) -> Result<String> {
    ensure!(
        data.identifiers.len() == data.labels.len() && data.labels.len() == data.projection.nrows(),
        "chart data is inconsistent: {} identifiers, {} labels, {} rows",
        data.identifiers.len(),
        data.labels.len(),
        data.projection.nrows()
    );
    ensure!(data.projection.ncols() > 0, "projection has no components");

    let points = data.points();
    let (x_range, y_range) = axis_ranges(&points);
    let y_desc = if data.projection.ncols() > 1 { "PC2" } else { "" };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc("PC1")
            .y_desc(y_desc)
            .draw()?;

        for cluster in 0..data.n_clusters {
            let color = Palette99::pick(cluster);
            chart
                .draw_series(
                    points
                        .iter()
                        .zip(&data.labels)
                        .filter(|&(_, &label)| label == cluster)
                        .map(|(&point, _)| Circle::new(point, 5, color.mix(0.8).filled())),
                )?
                .label(format!("cluster {}", cluster))
                .legend(move |(x, y)| Circle::new((x, y), 5, Palette99::pick(cluster).filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }
    Ok(svg)
}

pub fn render_html(data: &ChartData) -> Result<String> {
    let svg = render_scatter_svg(data)?;
    let points = data.points();

    let mut html = String::new();
    html.push_str(&html_header(&data.title));
    html.push_str(&format!("<h1>{}</h1>\n", escape(&data.title)));
    html.push_str(&summary_section(data));
    html.push_str("<div class=\"chart\">\n");
    html.push_str(&svg);
    html.push_str("\n</div>\n");

    html.push_str("<table>\n<tr><th>#</th><th>SMILES</th><th>Cluster</th><th>PC1</th><th>PC2</th></tr>\n");
    for (i, ((identifier, label), (x, y))) in data
        .identifiers
        .iter()
        .zip(&data.labels)
        .zip(&points)
        .enumerate()
    {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.4}</td><td>{:.4}</td></tr>\n",
            i,
            escape(identifier),
            label,
            x,
            y
        ));
    }
    html.push_str("</table>\n</body>\n</html>\n");

    Ok(html)
}

fn html_header(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}</title>
    <style>
        body {{ font-family: sans-serif; margin: 2rem; }}
        table {{ border-collapse: collapse; margin-top: 1rem; }}
        th, td {{ border: 1px solid #ccc; padding: 0.25rem 0.75rem; text-align: left; }}
        th {{ background: #f3f4f6; }}
    </style>
</head>
<body>
"#,
        escape(title)
    )
}

fn summary_section(data: &ChartData) -> String {
    let retained: f64 = data.explained_variance.iter().sum();
    let per_component = data
        .explained_variance
        .iter()
        .enumerate()
        .map(|(i, ratio)| format!("PC{}: {:.1}%", i + 1, ratio * 100.0))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "<p>{} molecules, {} clusters, {} components retaining {:.1}% of the variance ({})</p>\n",
        data.identifiers.len(),
        data.n_clusters,
        data.explained_variance.len(),
        retained * 100.0,
        per_component
    )
}

fn axis_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let range = |values: &mut dyn Iterator<Item = f64>| {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return -1.0..1.0;
        }
        let pad = ((max - min) * 0.1).max(1e-3);
        (min - pad)..(max + pad)
    };
    (
        range(&mut points.iter().map(|p| p.0)),
        range(&mut points.iter().map(|p| p.1)),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
