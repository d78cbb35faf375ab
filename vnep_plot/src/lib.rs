#![deny(rust_2018_idioms)]

// This module contains the heatmap metric registry.
pub mod metric;

// This module contains the heatmap axes registry.
pub mod axis;

// This module contains load metrics of baseline solutions.
pub mod load;

// This module contains the substrate topology table.
pub mod topology;

// This module contains the fixed labels, colors and markers of each series.
pub mod fmt;

// This module contains the aggregation of metrics over the parameter grid.
pub mod heatmap;

// This module contains the ECDF and scatter data of the rounding comparison.
pub mod distribution;

// This module contains the comparison of incumbents over time.
pub mod temporal;

// This module contains the detection of suspicious baseline solutions.
pub mod diagnostics;

// This module contains the artifact layout.
pub mod output;

// This module contains the `Renderer` trait and the JSON renderer.
pub mod render;

// This module contains the configuration of an evaluation run.
pub mod config;

// This module contains the evaluation driver.
pub mod evaluate;

// This module contains the progress bar that logs go through.
pub mod progress;

// This module contains the matplotlib renderer.
#[cfg(feature = "pyo3")]
pub mod plot;

// This module contains NaN-aware reductions.
mod stats;

#[cfg(test)]
mod fixture;

// Re-exports.
pub use axis::{all_axes, AxisSpec};
pub use config::EvaluationConfig;
pub use distribution::{Ecdf, RoundingComparison};
pub use evaluate::{evaluate_baseline_and_randround, Plotter};
pub use heatmap::{Heatmap, HeatmapPlotter};
pub use metric::{all_metrics, metrics_for, HeatmapPlotType, MetricSpec};
pub use output::{Artifact, OutputConfig};
pub use render::{JsonRenderer, Renderer};
pub use topology::TopologySizes;

use serde::{Deserialize, Serialize};
use vnep_eval::RoundingVariant;

/// Series of the distributional plots: one per rounding variant plus the
/// baseline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    MinAug,
    MaxProfit,
    WoViol,
    Mdk,
    Baseline,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinAug => "min_aug",
            Self::MaxProfit => "max_profit",
            Self::WoViol => "wo_viol",
            Self::Mdk => "mdk",
            Self::Baseline => "baseline",
        }
    }

    /// The rounding variants, in plotting order.
    pub fn all_rounding() -> impl Iterator<Item = Self> {
        RoundingVariant::all().map(Self::from)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::all_rounding().chain(std::iter::once(Self::Baseline))
    }
}

impl From<RoundingVariant> for Algorithm {
    fn from(variant: RoundingVariant) -> Self {
        match variant {
            RoundingVariant::MinAug => Self::MinAug,
            RoundingVariant::MaxProfit => Self::MaxProfit,
            RoundingVariant::WoViol => Self::WoViol,
            RoundingVariant::Mdk => Self::Mdk,
        }
    }
}
