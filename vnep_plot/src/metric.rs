use crate::load;
use serde::{Deserialize, Serialize};
use std::fmt;
use vnep_eval::{McfResult, RandRoundResult, RoundingVariant};

/// Which solutions a heatmap metric needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatmapPlotType {
    /// Baseline MIP solutions only.
    SimpleMcf,
    /// Randomized rounding solutions only.
    SimpleRandRound,
    /// A baseline and a randomized rounding solution per scenario.
    ComparisonMcfVsRandRound,
}

impl HeatmapPlotType {
    pub fn all() -> impl Iterator<Item = Self> {
        vec![
            Self::SimpleMcf,
            Self::SimpleRandRound,
            Self::ComparisonMcfVsRandRound,
        ]
        .into_iter()
    }
}

/// Extracts the value of a metric from the solution(s) of one scenario. NaN
/// marks an inapplicable value.
#[derive(Clone, Copy)]
pub enum MetricLookup {
    Mcf(fn(&McfResult) -> f64),
    RandRound(fn(&RandRoundResult) -> f64),
    Comparison(fn(&McfResult, &RandRoundResult) -> f64),
}

impl MetricLookup {
    pub fn plot_type(&self) -> HeatmapPlotType {
        match self {
            Self::Mcf(_) => HeatmapPlotType::SimpleMcf,
            Self::RandRound(_) => HeatmapPlotType::SimpleRandRound,
            Self::Comparison(_) => HeatmapPlotType::ComparisonMcfVsRandRound,
        }
    }
}

impl fmt::Debug for MetricLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetricLookup::{:?}", self.plot_type())
    }
}

/// Display value of a heatmap cell: the number to color the cell with and the
/// text written on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellValue {
    pub value: f64,
    pub label: String,
}

impl CellValue {
    fn nan() -> Self {
        Self {
            value: f64::NAN,
            label: String::from("nan"),
        }
    }
}

/// Rounds to two decimals and then shows one.
pub fn default_rounding(mean: f64) -> CellValue {
    if mean.is_nan() {
        return CellValue::nan();
    }
    let rounded = (mean * 100.0).round() / 100.0;
    let label = format!("{:.1}", rounded);
    let value = label.parse().unwrap_or(rounded);
    CellValue { value, label }
}

pub fn round_to_integer(mean: f64) -> CellValue {
    if mean.is_nan() {
        return CellValue::nan();
    }
    let value = mean.round();
    CellValue {
        value,
        label: format!("{}", value as i64),
    }
}

pub fn two_decimals(mean: f64) -> CellValue {
    if mean.is_nan() {
        return CellValue::nan();
    }
    let label = format!("{:.2}", mean);
    let value = label.parse().unwrap_or(mean);
    CellValue { value, label }
}

/// Everything needed to compute and draw one kind of heatmap.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    /// Plot title.
    pub name: String,
    /// Prefix of the artifacts' file names.
    pub filename: &'static str,
    pub plot_type: HeatmapPlotType,
    pub vmin: f64,
    pub vmax: f64,
    pub colorbar_ticks: Vec<f64>,
    pub cmap: &'static str,
    pub lookup: MetricLookup,
    /// Values for which this returns false are dropped before aggregation.
    pub metric_filter: Option<fn(f64) -> bool>,
    /// Replaces `default_rounding`.
    pub rounding: Option<fn(f64) -> CellValue>,
}

impl MetricSpec {
    pub fn round(&self, mean: f64) -> CellValue {
        match self.rounding {
            Some(rounding) => rounding(mean),
            None => default_rounding(mean),
        }
    }
}

// ticks from `start` to `end` (inclusive)
fn ticks(start: usize, end: usize, step: usize) -> Vec<f64> {
    (start..=end).step_by(step).map(|tick| tick as f64).collect()
}

fn profit_ratio(
    mcf: &McfResult,
    randround: &RandRoundResult,
    variant: RoundingVariant,
) -> f64 {
    let objective = mcf.status.obj_value;
    if objective > 1e-6 {
        randround.variant(variant).profit / objective * 100.0
    } else {
        f64::NAN
    }
}

// tolerates solver noise around zero
fn non_negative(value: f64) -> bool {
    value >= -0.00001
}

fn randround_runtime(randround: &RandRoundResult) -> f64 {
    let meta = &randround.meta_data;
    meta.time_preprocessing + meta.time_optimization + meta.time_postprocessing
}

const MCF: &str = "$\\mathrm{MIP}_{\\mathrm{MCF}}$";
const COMPARISON_SUFFIX: &str =
    " / \\mathrm{Profit}({\\mathrm{MIP}_{\\mathrm{MCF}}})$ [%]     ";

/// Every heatmap metric, in plotting order.
pub fn all_metrics() -> Vec<MetricSpec> {
    let mcf_name = |metric: &str| format!("{}: {}", MCF, metric);
    let comparison_name = |title: &str, variant: &str| {
        format!(
            "{} Rounding Performance      \n$\\mathrm{{Profit}}({{\\mathrm{{RR}}_{{\\mathrm{{{}}}}}}}){}",
            title, variant, COMPARISON_SUFFIX
        )
    };
    vec![
        MetricSpec {
            name: mcf_name("Max. Node Load [%]"),
            filename: "max_node_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Oranges",
            lookup: MetricLookup::Mcf(load::max_node_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("Max. Edge Load [%]"),
            filename: "max_edge_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Purples",
            lookup: MetricLookup::Mcf(load::max_edge_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("Objective Gap [%]"),
            filename: "objective_gap",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 20.0,
            colorbar_ticks: ticks(0, 20, 4),
            cmap: "Blues",
            lookup: MetricLookup::Mcf(|mcf| mcf.status.obj_gap * 100.0),
            metric_filter: Some(non_negative),
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("Runtime [min]"),
            filename: "runtime",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 120.0,
            colorbar_ticks: ticks(0, 120, 15),
            cmap: "Greys",
            lookup: MetricLookup::Mcf(|mcf| {
                mcf.temporal_log
                    .log_entries
                    .last()
                    .map(|entry| entry.globaltime / 60.0)
                    .unwrap_or(f64::NAN)
            }),
            metric_filter: None,
            rounding: Some(round_to_integer),
        },
        MetricSpec {
            name: mcf_name("Acceptance Ratio [%]"),
            filename: "embedding_ratio",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Greens",
            lookup: MetricLookup::Mcf(|mcf| mcf.embedding_ratio * 100.0),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("Avg. Node Load [%]"),
            filename: "avg_node_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 60.0,
            colorbar_ticks: ticks(0, 60, 10),
            cmap: "Oranges",
            lookup: MetricLookup::Mcf(load::average_node_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("Avg. Edge Load [%]"),
            filename: "avg_edge_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 25.0,
            vmax: 75.0,
            colorbar_ticks: ticks(25, 75, 10),
            cmap: "Purples",
            lookup: MetricLookup::Mcf(load::average_edge_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("MaxLoad (Edge and Node)"),
            filename: "max_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Reds",
            lookup: MetricLookup::Mcf(load::max_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("AvgLoad (Edge and Node)"),
            filename: "avg_load",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Reds",
            lookup: MetricLookup::Mcf(load::average_load),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("#Feasible Requests"),
            filename: "real_req",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Greens",
            lookup: MetricLookup::Mcf(|mcf| mcf.nu_real_req),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: mcf_name("#Embedded / #Feasible [%]       "),
            filename: "cleaned_embedding_ratio",
            plot_type: HeatmapPlotType::SimpleMcf,
            vmin: 0.0,
            vmax: 100.0,
            colorbar_ticks: ticks(0, 100, 20),
            cmap: "Greens",
            lookup: MetricLookup::Mcf(|mcf| {
                if mcf.nu_real_req > 0.5 {
                    mcf.embedding_ratio * mcf.original_number_requests
                        / mcf.nu_real_req
                        * 100.0
                } else {
                    f64::NAN
                }
            }),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: String::from("$\\mathrm{LP}_{\\mathrm{novel}}$: Runtime Pre-Processing[s]"),
            filename: "randround_runtime_pre",
            plot_type: HeatmapPlotType::SimpleRandRound,
            vmin: 0.0,
            vmax: 50.0,
            colorbar_ticks: ticks(0, 50, 10),
            cmap: "Greys",
            lookup: MetricLookup::RandRound(|rr| rr.meta_data.time_preprocessing),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: String::from("$\\mathrm{LP}_{\\mathrm{novel}}$: Runtime Gurobi [min]"),
            filename: "randround_runtime_opt",
            plot_type: HeatmapPlotType::SimpleRandRound,
            vmin: 0.0,
            vmax: 5.0,
            colorbar_ticks: ticks(0, 5, 1),
            cmap: "Greys",
            lookup: MetricLookup::RandRound(|rr| {
                rr.meta_data.time_optimization / 60.0
            }),
            metric_filter: None,
            rounding: Some(two_decimals),
        },
        MetricSpec {
            name: String::from("$\\mathrm{LP}_{\\mathrm{novel}}$: Runtime Post-Processing [s]"),
            filename: "randround_runtime_post",
            plot_type: HeatmapPlotType::SimpleRandRound,
            vmin: 0.0,
            vmax: 180.0,
            colorbar_ticks: ticks(0, 180, 30),
            cmap: "Greys",
            lookup: MetricLookup::RandRound(|rr| rr.meta_data.time_postprocessing),
            metric_filter: None,
            rounding: Some(round_to_integer),
        },
        MetricSpec {
            name: comparison_name("Optimal", "MDK"),
            filename: "comparison_baseline_rr_mdk",
            plot_type: HeatmapPlotType::ComparisonMcfVsRandRound,
            vmin: 65.0,
            vmax: 100.0,
            colorbar_ticks: ticks(65, 100, 5),
            cmap: "Blues",
            lookup: MetricLookup::Comparison(|mcf, rr| {
                profit_ratio(mcf, rr, RoundingVariant::Mdk)
            }),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: comparison_name("Heuristic", "Heuristic"),
            filename: "comparison_baseline_rr_heuristic",
            plot_type: HeatmapPlotType::ComparisonMcfVsRandRound,
            vmin: 65.0,
            vmax: 100.0,
            colorbar_ticks: ticks(65, 100, 5),
            cmap: "Blues",
            lookup: MetricLookup::Comparison(|mcf, rr| {
                profit_ratio(mcf, rr, RoundingVariant::WoViol)
            }),
            metric_filter: None,
            rounding: None,
        },
        MetricSpec {
            name: comparison_name("Heuristic", "MinLoad"),
            filename: "comparison_baseline_rr_min_load",
            plot_type: HeatmapPlotType::ComparisonMcfVsRandRound,
            vmin: 95.0,
            vmax: 145.0,
            colorbar_ticks: ticks(95, 145, 10),
            cmap: "Blues",
            lookup: MetricLookup::Comparison(|mcf, rr| {
                profit_ratio(mcf, rr, RoundingVariant::MinAug)
            }),
            metric_filter: None,
            rounding: Some(round_to_integer),
        },
        MetricSpec {
            name: comparison_name("Heuristic", "MaxProfit"),
            filename: "comparison_baseline_rr_max_profit",
            plot_type: HeatmapPlotType::ComparisonMcfVsRandRound,
            vmin: 95.0,
            vmax: 145.0,
            colorbar_ticks: ticks(95, 145, 10),
            cmap: "Blues",
            lookup: MetricLookup::Comparison(|mcf, rr| {
                profit_ratio(mcf, rr, RoundingVariant::MaxProfit)
            }),
            metric_filter: None,
            rounding: Some(round_to_integer),
        },
        MetricSpec {
            name: String::from("$\\mathrm{LP}_{\\mathrm{novel}}$: Total Runtime [min]"),
            filename: "randround_runtime_total",
            plot_type: HeatmapPlotType::SimpleRandRound,
            vmin: 0.0,
            vmax: 5.0,
            colorbar_ticks: ticks(0, 5, 1),
            cmap: "Greys",
            lookup: MetricLookup::RandRound(|rr| randround_runtime(rr) / 60.0),
            metric_filter: None,
            rounding: Some(two_decimals),
        },
        MetricSpec {
            name: String::from("Runtime MDK [min]"),
            filename: "mdk_runtime_total",
            plot_type: HeatmapPlotType::SimpleRandRound,
            vmin: 0.0,
            vmax: 121.0,
            colorbar_ticks: ticks(0, 120, 20),
            cmap: "Greys",
            lookup: MetricLookup::RandRound(|rr| {
                let meta = &rr.mdk_meta_data;
                (meta.time_preprocessing
                    + meta.time_optimization
                    + meta.time_postprocessing)
                    / 60.0
            }),
            metric_filter: None,
            rounding: None,
        },
    ]
}

/// The metrics of `plot_type`, in plotting order.
pub fn metrics_for(plot_type: HeatmapPlotType) -> Vec<MetricSpec> {
    all_metrics()
        .into_iter()
        .filter(|metric| metric.plot_type == plot_type)
        .collect()
}
