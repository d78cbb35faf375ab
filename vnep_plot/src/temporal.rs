use crate::distribution::RANDROUND_ALGORITHM;
use crate::evaluate::Plotter;
use crate::fmt::PlotFmt;
use crate::heatmap::{ComparisonSource, McfSource, RandRoundSource, SolutionSource};
use crate::output::OutputConfig;
use crate::render::Renderer;
use crate::stats;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use vnep_eval::{FilterSpec, RandRoundResult, ScenarioId, TemporalLog};

pub const TIME_RESOLUTION: f64 = 5.0;
pub const TIME_HORIZON: f64 = 7500.0;

pub const TITLE: &str = "Temporal Relative Performance: MDK vs MIP";
pub const X_LABEL: &str = "Time [s]";
pub const Y_LABEL: &str = "Relative Profit: (MDK[t] - MIP[t])/best";

/// Sampling times `5, 10, ..., 7500` seconds.
pub fn time_grid() -> Vec<f64> {
    let steps = (TIME_HORIZON / TIME_RESOLUTION) as usize;
    (1..=steps).map(|step| step as f64 * TIME_RESOLUTION).collect()
}

/// Value of the incumbent at each of `times`, where the log started at
/// `offset`. The root relaxation entry counts as an incumbent unless an
/// improvement was logged before it. Non-positive incumbents are NaN.
pub fn incumbent_series(log: &TemporalLog, offset: f64, times: &[f64]) -> Vec<f64> {
    let mut root = log.root_relaxation_entry.as_ref().filter(|root| {
        log.improved_entries
            .first()
            .map_or(true, |first| root.globaltime <= first.globaltime)
    });
    let improved = &log.improved_entries;

    let mut next = 0;
    let mut current = f64::NAN;
    times
        .iter()
        .map(|time| {
            if let Some(entry) = root.filter(|root| root.globaltime + offset < *time) {
                current = entry.data.objective_value;
                root = None;
            }
            while next < improved.len() && improved[next].globaltime + offset < *time {
                current = improved[next].data.objective_value;
                next += 1;
            }
            if current > 0.0 {
                current
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Time the rounding procedure spent before the MDK started.
pub fn mdk_offset(randround: &RandRoundResult) -> f64 {
    let meta_data = &randround.meta_data;
    meta_data.time_preprocessing + meta_data.time_optimization + meta_data.time_postprocessing
}

/// Difference of the incumbents relative to the best known solution. A
/// missing incumbent counts as zero; NaN if both are missing.
pub fn relative_value(base: f64, mdk: f64, best: f64) -> f64 {
    match (base.is_nan(), mdk.is_nan()) {
        (true, true) => f64::NAN,
        (true, false) => mdk / best,
        (false, true) => -base / best,
        (false, false) => (mdk - base) / best,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentile {
    Min,
    Median,
    Max,
    At(f64),
}

impl Percentile {
    /// The plotted percentiles, in plotting order.
    pub fn all() -> Vec<Self> {
        let mut all = vec![Self::Min, Self::Median, Self::Max];
        all.extend(
            [2.5, 5.0, 10.0, 20.0, 80.0, 90.0, 95.0, 97.5]
                .iter()
                .map(|p| Self::At(*p)),
        );
        all
    }

    pub fn is_named(&self) -> bool {
        !matches!(self, Self::At(_))
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Median => write!(f, "median"),
            Self::Max => write!(f, "max"),
            Self::At(p) => write!(f, "{:?}", p),
        }
    }
}

/// Percentile of the numbers in `column`, NaN if there are none.
pub fn percentile(column: &[f64], percentile: Percentile) -> f64 {
    let mut sorted: Vec<_> = column
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .collect();
    sorted.sort_by(f64::total_cmp);
    let k = sorted.len() as f64;
    let at = |p: f64| sorted.get((p * 0.01 * k) as usize).copied().unwrap_or(f64::NAN);
    match percentile {
        Percentile::Min => stats::nan_min(&sorted),
        Percentile::Max => stats::nan_max(&sorted),
        Percentile::Median => at(50.0),
        Percentile::At(p) => at(p),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PercentileSeries {
    pub label: String,
    pub color: &'static str,
    pub linewidth: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalPlot {
    pub times: Vec<f64>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<PercentileSeries>,
}

/// Compares the MDK incumbent against the baseline MIP incumbent over time.
pub struct TemporalComparison<'a> {
    source: ComparisonSource<'a>,
    forbidden: BTreeSet<ScenarioId>,
}

impl<'a> TemporalComparison<'a> {
    pub fn new(
        baseline: McfSource<'a>,
        randround: RandRoundSource<'a>,
        forbidden: BTreeSet<ScenarioId>,
    ) -> Result<Self, Report> {
        if randround.algorithm_id() != RANDROUND_ALGORITHM {
            eyre::bail!(
                "the temporal comparison needs MDK logs of {}, not {}",
                RANDROUND_ALGORITHM,
                randround.algorithm_id()
            );
        }
        Ok(Self {
            source: ComparisonSource::new(baseline, randround),
            forbidden,
        })
    }

    /// One row of relative values per scenario passing `filter`.
    pub fn relative_matrix(
        &self,
        filter: Option<&FilterSpec>,
        times: &[f64],
    ) -> Result<Vec<Vec<f64>>, Report> {
        let scenarios = self
            .source
            .scenario_filter()?
            .allowed_scenarios(filter, &self.forbidden)?;
        let mut rows = Vec::with_capacity(scenarios.len());
        for scenario_id in scenarios {
            let (baseline, randround) = self.source.solutions(scenario_id)?;
            let base = incumbent_series(&baseline.temporal_log, 0.0, times);
            let mdk = incumbent_series(
                &randround.mdk_meta_data.temporal_log,
                mdk_offset(randround),
                times,
            );
            let best = baseline
                .status
                .obj_value
                .max(randround.mdk.profit)
                .max(randround.wo_viol.profit);
            let row = base
                .into_iter()
                .zip(mdk)
                .map(|(base, mdk)| relative_value(base, mdk, best))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    pub fn compute(&self, filter: Option<&FilterSpec>) -> Result<TemporalPlot, Report> {
        let times = time_grid();
        let rows = self.relative_matrix(filter, &times)?;
        let columns: Vec<Vec<f64>> = (0..times.len())
            .map(|index| rows.iter().map(|row| row[index]).collect())
            .collect();
        let series = Percentile::all()
            .into_iter()
            .enumerate()
            .map(|(index, p)| PercentileSeries {
                label: p.to_string(),
                color: PlotFmt::percentile_color(index),
                linewidth: if p.is_named() { 3.0 } else { 2.0 },
                values: columns.iter().map(|column| percentile(column, p)).collect(),
            })
            .collect();
        Ok(TemporalPlot {
            times,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            series,
        })
    }
}

impl Plotter for TemporalComparison<'_> {
    fn name(&self) -> String {
        String::from("temporal comparison")
    }

    fn plot_figure(
        &self,
        filter: Option<&FilterSpec>,
        renderer: &mut dyn Renderer,
        output: &OutputConfig,
    ) -> Result<(), Report> {
        let artifact = output.artifact(None, "temporal_mdk_vs_mip", filter);
        if output.should_skip(&renderer.target(&artifact)) {
            return Ok(());
        }
        let data = self.compute(filter).wrap_err("temporal comparison")?;
        renderer.temporal(&data, TITLE, &artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, BASELINE, RANDROUND};
    use vnep_eval::{LogData, LogEntry, McfResult};

    fn entry(globaltime: f64, objective_value: f64) -> LogEntry {
        LogEntry {
            globaltime,
            data: LogData {
                objective_value,
                objective_bound: 0.0,
            },
        }
    }

    fn log(root: Option<LogEntry>, improved: Vec<LogEntry>) -> TemporalLog {
        TemporalLog {
            log_entries: Vec::new(),
            root_relaxation_entry: root,
            improved_entries: improved,
        }
    }

    #[test]
    fn grid() {
        let times = time_grid();
        assert_eq!(times.len(), 1500);
        assert_eq!(times[0], 5.0);
        assert_eq!(times[1499], 7500.0);
    }

    #[test]
    fn incumbents() {
        let times = [5.0, 10.0, 15.0, 20.0];
        let log = log(
            Some(entry(3.0, 1.0)),
            vec![entry(7.0, 4.0), entry(9.0, 6.0), entry(15.0, 8.0)],
        );
        // entries count strictly before each time
        let series = incumbent_series(&log, 0.0, &times);
        assert_eq!(series, vec![1.0, 6.0, 6.0, 8.0]);
        // the offset shifts every entry
        let series = incumbent_series(&log, 4.0, &times);
        assert!(series[0].is_nan());
        assert_eq!(&series[1..], &[1.0, 6.0, 8.0]);
    }

    #[test]
    fn nothing_before_the_root_entry() {
        let times = [5.0, 10.0, 15.0];
        let improving = log(Some(entry(7.0, 2.0)), vec![entry(12.0, 5.0)]);
        let series = incumbent_series(&improving, 0.0, &times);
        assert!(series[0].is_nan());
        assert_eq!(&series[1..], &[2.0, 5.0]);
        // a root relaxation without any improvement
        let root_only = log(Some(entry(7.0, 2.0)), Vec::new());
        let series = incumbent_series(&root_only, 0.0, &times);
        assert!(series[0].is_nan());
        assert_eq!(&series[1..], &[2.0, 2.0]);
    }

    #[test]
    fn late_root_entry_is_ignored() {
        let times = [5.0, 10.0];
        let log = log(Some(entry(6.0, 100.0)), vec![entry(2.0, 0.0), entry(8.0, 3.0)]);
        let series = incumbent_series(&log, 0.0, &times);
        // a zero incumbent is no incumbent
        assert!(series[0].is_nan());
        assert_eq!(series[1], 3.0);
        // no log at all
        let series = incumbent_series(&TemporalLog::default(), 0.0, &times);
        assert!(series.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn relative_values() {
        assert!(relative_value(f64::NAN, f64::NAN, 10.0).is_nan());
        assert_eq!(relative_value(f64::NAN, 5.0, 10.0), 0.5);
        assert_eq!(relative_value(5.0, f64::NAN, 10.0), -0.5);
        assert_eq!(relative_value(2.0, 7.0, 10.0), 0.5);
    }

    #[test]
    fn percentiles() {
        let labels: Vec<_> = Percentile::all().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            labels,
            vec!["min", "median", "max", "2.5", "5.0", "10.0", "20.0", "80.0", "90.0", "95.0", "97.5"]
        );

        let column = [4.0, f64::NAN, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&column, Percentile::Min), 1.0);
        assert_eq!(percentile(&column, Percentile::Max), 4.0);
        // index int(0.5 * 4)
        assert_eq!(percentile(&column, Percentile::Median), 3.0);
        assert_eq!(percentile(&column, Percentile::At(2.5)), 1.0);
        assert_eq!(percentile(&column, Percentile::At(80.0)), 4.0);
        assert!(percentile(&[f64::NAN], Percentile::Median).is_nan());
        assert!(percentile(&[], Percentile::Min).is_nan());
    }

    #[test]
    fn comparison() {
        let baseline = fixture::storage(BASELINE, |_| {
            let mut mcf = McfResult::default();
            mcf.status.obj_value = 10.0;
            mcf.temporal_log = log(None, vec![entry(7.0, 5.0), entry(100.0, 10.0)]);
            mcf
        });
        let randround = fixture::storage(RANDROUND, |id| {
            let mut rr = RandRoundResult::default();
            rr.meta_data.time_optimization = 20.0;
            rr.mdk.profit = if id == 1 { 20.0 } else { 8.0 };
            rr.mdk_meta_data.temporal_log = log(None, vec![entry(1.0, rr.mdk.profit)]);
            rr
        });
        let comparison = TemporalComparison::new(
            McfSource::new(&baseline, BASELINE, 0),
            RandRoundSource::new(&randround, RANDROUND, 0),
            BTreeSet::from([16]),
        )
        .unwrap();

        let times = [5.0, 10.0, 25.0, 200.0];
        let rows = comparison.relative_matrix(None, &times).unwrap();
        assert_eq!(rows.len(), 15);
        // the MDK is best in scenario 1
        assert!(rows[0][0].is_nan());
        assert_eq!(&rows[0][1..], &[-0.25, 0.75, 0.5]);
        assert_eq!(&rows[1][1..], &[-0.5, 0.3, -0.2]);

        let plot = comparison.compute(None).unwrap();
        assert_eq!(plot.times.len(), 1500);
        assert_eq!(plot.series.len(), 11);
        let max = &plot.series[2];
        assert_eq!(max.label, "max");
        assert_eq!(max.linewidth, 3.0);
        assert!(max.values[0].is_nan());
        assert_eq!(max.values[4], 0.75);
        assert_eq!(max.values[1499], 0.5);
        let min = &plot.series[0];
        assert_eq!(min.values[1499], -0.2);
        assert_eq!(plot.series[3].linewidth, 2.0);
    }

    #[test]
    fn only_for_triumvirate_results() {
        let baseline = fixture::storage(BASELINE, |_| McfResult::default());
        let randround = fixture::storage("RandomizedRounding", |_| RandRoundResult::default());
        let result = TemporalComparison::new(
            McfSource::new(&baseline, BASELINE, 0),
            RandRoundSource::new(&randround, "RandomizedRounding", 0),
            BTreeSet::new(),
        );
        assert!(result.is_err());
    }
}
