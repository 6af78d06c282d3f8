//! Officer dashboard bar chart.

use crate::dom::Dom;
use crate::errors::UiError;
use serde::Serialize;
use tracing::{debug, error};

pub const CANVAS_ID: &str = "performanceChart";

pub const LABELS: [&str; 4] = ["Pending", "In Progress", "Resolved", "Overdue"];
pub const COLORS: [&str; 4] = ["#ffc107", "#0dcaf0", "#198754", "#dc3545"];

/// The charting library the host page ships, if any.
pub trait ChartLibrary<N> {
    fn render(&self, canvas: &N, spec: &ChartSpec) -> Result<(), UiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartCounts {
    pub pending: f64,
    pub in_progress: f64,
    pub resolved: f64,
    pub overdue: f64,
}

impl ChartCounts {
    pub fn from_dataset<D: Dom>(dom: &D, canvas: &D::Node) -> Self {
        let read = |key: &str| coerce_number(dom.dataset(canvas, key).as_deref());
        Self {
            pending: read("pending"),
            in_progress: read("inprogress"),
            resolved: read("resolved"),
            overdue: read("overdue"),
        }
    }

    pub fn values(&self) -> [f64; 4] {
        [self.pending, self.in_progress, self.resolved, self.overdue]
    }
}

/// Missing, blank, or non-numeric attributes all count as zero.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Renders a number the way a browser prints it: no trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<&'static str>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub data: Vec<f64>,
    pub background_color: Vec<&'static str>,
    pub border_radius: u32,
    pub bar_thickness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub animation: Animation,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub duration: u32,
    pub easing: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub display: bool,
}

/// Tooltip text is `"<value><label_suffix>"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub label_suffix: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: LinearAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearAxis {
    pub begin_at_zero: bool,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticks {
    pub precision: u32,
}

impl ChartSpec {
    pub fn bar(counts: ChartCounts) -> Self {
        Self {
            kind: "bar",
            data: ChartData {
                labels: LABELS.to_vec(),
                datasets: vec![Dataset {
                    data: counts.values().to_vec(),
                    background_color: COLORS.to_vec(),
                    border_radius: 8,
                    bar_thickness: 40,
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                animation: Animation {
                    duration: 600,
                    easing: "easeOutQuart",
                },
                plugins: Plugins {
                    legend: Legend { display: false },
                    tooltip: Tooltip {
                        label_suffix: " cases",
                    },
                },
                scales: Scales {
                    y: LinearAxis {
                        begin_at_zero: true,
                        ticks: Ticks { precision: 0 },
                    },
                },
            },
        }
    }

    pub fn tooltip_label(&self, value: f64) -> String {
        format!(
            "{}{}",
            format_number(value),
            self.options.plugins.tooltip.label_suffix
        )
    }
}

/// Renders the chart once if both the canvas and a library are present.
/// Returns whether a chart was handed to the library.
pub fn render_chart<D, L>(dom: &D, library: Option<&L>) -> bool
where
    D: Dom,
    L: ChartLibrary<D::Node> + ?Sized,
{
    let Some(canvas) = dom.element_by_id(CANVAS_ID) else {
        debug!("no chart canvas on page");
        return false;
    };
    let Some(library) = library else {
        debug!("chart library not loaded");
        return false;
    };

    let spec = ChartSpec::bar(ChartCounts::from_dataset(dom, &canvas));
    match library.render(&canvas, &spec) {
        Ok(()) => true,
        Err(err) => {
            error!("chart render failed: {err}");
            false
        }
    }
}
