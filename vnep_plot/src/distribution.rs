use crate::evaluate::Plotter;
use crate::fmt::PlotFmt;
use crate::heatmap::{ComparisonSource, McfSource, RandRoundSource, SolutionSource};
use crate::load;
use crate::output::OutputConfig;
use crate::render::Renderer;
use crate::stats;
use crate::Algorithm;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use vnep_eval::{
    Filter, FilterSpec, McfResult, ParamValue, RandRoundResult, RoundingVariant,
    ScenarioFilter, ScenarioId,
};

/// The only randomized rounding algorithm computing every rounding variant.
pub const RANDROUND_ALGORITHM: &str = "RandomizedRoundingTriumvirate";

pub const LOAD_ECDF_TITLE: &str = "ECDF of Resource Loads";
pub const OBJECTIVE_ECDF_TITLE: &str = "ECDF of Relative Achieved Profit";
pub const BOUND_ECDF_TITLE: &str = "$\\mathrm{LP}_{\\mathrm{novel}}$: Formulation Strength";
pub const SCATTER_TITLE: &str = "Vanilla Rounding Performance";

const NUMBER_OF_REQUESTS: &str = "number_of_requests";
const NODE_RESOURCE_FACTOR: &str = "node_resource_factor";
const EDGE_RESOURCE_FACTOR: &str = "edge_resource_factor";

/// Profit of a rounding variant relative to the baseline objective, in
/// percent. NaN if the baseline objective is (close to) zero.
pub fn relative_profit(
    baseline: &McfResult,
    randround: &RandRoundResult,
    variant: RoundingVariant,
) -> f64 {
    let objective = baseline.status.obj_value;
    if objective > 0.00001 {
        randround.variant(variant).profit / objective * 100.0
    } else {
        f64::NAN
    }
}

/// The larger of the root relaxation bound and the bound of the first log
/// entry. NaN if neither is a usable bound.
pub fn initial_dual_bound(baseline: &McfResult) -> f64 {
    let log = &baseline.temporal_log;
    let root = log
        .root_relaxation_entry
        .as_ref()
        .map_or(-1e80, |entry| entry.data.objective_bound);
    let first = log
        .log_entries
        .first()
        .map_or(-1e80, |entry| entry.data.objective_bound);
    let bound = root.max(first);
    if bound < -1e40 {
        tracing::warn!("[distribution] the dual bound of the MIP is garbage: discarding it");
        f64::NAN
    } else {
        bound
    }
}

/// The smallest bound found over the whole log.
pub fn final_dual_bound(baseline: &McfResult) -> f64 {
    let bound = baseline
        .temporal_log
        .log_entries
        .iter()
        .map(|entry| entry.data.objective_bound)
        .fold(1e80, f64::min);
    if bound > 1e70 {
        tracing::warn!("[distribution] best bound of the MIP could not be determined");
        f64::NAN
    } else {
        bound
    }
}

/// `bound` divided by the bound of the rounding LP. Ratios above 1000 are
/// outliers and become NaN, as do ratios over a (close to) zero LP bound.
pub fn relative_dual_bound(bound: f64, randround: &RandRoundResult) -> f64 {
    let randround_bound = randround.meta_data.status.obj_value;
    if randround_bound <= 0.0001 {
        tracing::warn!("[distribution] the randround dual bound is zero: discarding value");
        return f64::NAN;
    }
    let ratio = bound / randround_bound;
    if ratio > 1000.0 {
        tracing::warn!(
            "[distribution] the relative dual bound {} = {} / {} is very high: discarding it",
            ratio,
            bound,
            randround_bound
        );
        return f64::NAN;
    }
    ratio
}

/// Empirical cumulative distribution function: the `k` numbers of the input
/// in ascending order, the `i`-th one at `i / k`. NaN is ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ecdf {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Ecdf {
    pub fn new(values: &[f64]) -> Self {
        let mut x: Vec<_> = values
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .collect();
        x.sort_by(f64::total_cmp);
        let k = x.len() as f64;
        let y = (1..=x.len()).map(|i| i as f64 / k).collect();
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.x.last().copied().unwrap_or(f64::NAN)
    }
}

fn max_of<'a>(ecdfs: impl Iterator<Item = &'a Ecdf>) -> f64 {
    let maxima: Vec<_> = ecdfs.map(Ecdf::max).collect();
    stats::nan_max(&maxima)
}

/// Maximum node and edge loads, in percent, one entry per scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxLoads {
    pub node: Vec<f64>,
    pub edge: Vec<f64>,
}

impl MaxLoads {
    /// The larger of node and edge load per scenario.
    pub fn combined(&self) -> Vec<f64> {
        self.node
            .iter()
            .zip(&self.edge)
            .map(|(node, edge)| {
                if node.is_nan() || edge.is_nan() {
                    f64::NAN
                } else {
                    node.max(*edge)
                }
            })
            .collect()
    }
}

/// Initial and final bound ratios of the scenarios with some number of
/// requests.
#[derive(Debug, Clone, PartialEq)]
pub struct DualBounds {
    pub number_of_requests: ParamValue,
    pub initial: Vec<f64>,
    pub best: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadSeries {
    pub algorithm: Algorithm,
    pub node: Ecdf,
    pub edge: Ecdf,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadEcdf {
    pub series: Vec<LoadSeries>,
    pub max_observed_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitSeries {
    pub algorithm: Algorithm,
    pub ecdf: Ecdf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveEcdf {
    pub series: Vec<ProfitSeries>,
    pub max_observed_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundSeries {
    pub number_of_requests: ParamValue,
    pub color: &'static str,
    pub initial: Ecdf,
    pub best: Ecdf,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundEcdf {
    pub series: Vec<BoundSeries>,
    pub max_observed_value: f64,
}

/// Scenarios with one combination of node and edge resource factor.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterSeries {
    pub node_resource_factor: ParamValue,
    pub edge_resource_factor: ParamValue,
    /// Index of the edge resource factor, which picks the color.
    pub edge_resource_factor_index: usize,
    pub relative_profit: Vec<f64>,
    pub max_load: Vec<f64>,
}

/// Relative profit against maximum load of one rounding variant.
#[derive(Debug, Clone, Serialize)]
pub struct Scatter {
    pub algorithm: Algorithm,
    /// `[[x_min, x_max], [y_min, y_max]]`
    pub bounding_box: [[f64; 2]; 2],
    pub series: Vec<ScatterSeries>,
    /// Coordinates outside of the bounding box; a point outside on both axes
    /// counts twice.
    pub points_outside: usize,
}

impl Scatter {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|series| series.relative_profit.len()).sum()
    }

    pub fn title(&self, paper_mode: bool) -> String {
        if paper_mode {
            return SCATTER_TITLE.to_string();
        }
        let profits: Vec<_> = self
            .series
            .iter()
            .flat_map(|series| series.relative_profit.iter().copied())
            .collect();
        let loads: Vec<_> = self
            .series
            .iter()
            .flat_map(|series| series.max_load.iter().copied())
            .collect();
        format!(
            "{}\nprofit: {}\nloads: {}\n{} of {} points lie outside the displayed area",
            SCATTER_TITLE,
            stats::summary(&profits),
            stats::summary(&loads),
            self.points_outside,
            self.point_count()
        )
    }
}

/// Compares the rounding variants with the baseline.
pub struct RoundingComparison<'a> {
    source: ComparisonSource<'a>,
    forbidden: BTreeSet<ScenarioId>,
}

impl<'a> RoundingComparison<'a> {
    pub fn new(
        baseline: McfSource<'a>,
        randround: RandRoundSource<'a>,
        forbidden: BTreeSet<ScenarioId>,
    ) -> Result<Self, Report> {
        if randround.algorithm_id() != RANDROUND_ALGORITHM {
            eyre::bail!(
                "the rounding comparison can only be applied to {} results, not {}",
                RANDROUND_ALGORITHM,
                randround.algorithm_id()
            );
        }
        Ok(Self {
            source: ComparisonSource::new(baseline, randround),
            forbidden,
        })
    }

    fn scenario_filter(&self) -> Result<ScenarioFilter<'_>, Report> {
        self.source.scenario_filter()
    }

    /// The scenarios passing `filter`, without the forbidden ones.
    pub fn scenarios(
        &self,
        filter: Option<&FilterSpec>,
    ) -> Result<BTreeSet<ScenarioId>, Report> {
        self.scenario_filter()?.allowed_scenarios(filter, &self.forbidden)
    }

    pub fn relative_profit_arrays(
        &self,
        scenarios: &BTreeSet<ScenarioId>,
    ) -> Result<IndexMap<Algorithm, Vec<f64>>, Report> {
        let mut result: IndexMap<_, _> = Algorithm::all_rounding()
            .map(|algorithm| (algorithm, Vec::with_capacity(scenarios.len())))
            .collect();
        for scenario_id in scenarios {
            let (baseline, randround) = self.source.solutions(*scenario_id)?;
            if baseline.status.obj_value <= 0.00001 {
                tracing::warn!(
                    "[distribution] the baseline objective of scenario {} is zero: discarding its profits",
                    scenario_id
                );
            }
            for variant in RoundingVariant::all() {
                if let Some(values) = result.get_mut(&Algorithm::from(variant)) {
                    values.push(relative_profit(baseline, randround, variant));
                }
            }
        }
        Ok(result)
    }

    pub fn max_load_arrays(
        &self,
        scenarios: &BTreeSet<ScenarioId>,
    ) -> Result<IndexMap<Algorithm, MaxLoads>, Report> {
        let mut result: IndexMap<_, _> = Algorithm::all()
            .map(|algorithm| (algorithm, MaxLoads::default()))
            .collect();
        for scenario_id in scenarios {
            let (baseline, randround) = self.source.solutions(*scenario_id)?;
            for variant in RoundingVariant::all() {
                let sample = randround.variant(variant);
                if let Some(loads) = result.get_mut(&Algorithm::from(variant)) {
                    loads.node.push(sample.max_node_load * 100.0);
                    loads.edge.push(sample.max_edge_load * 100.0);
                }
            }
            if let Some(loads) = result.get_mut(&Algorithm::Baseline) {
                loads.node.push(load::max_node_load(baseline));
                loads.edge.push(load::max_edge_load(baseline));
            }
        }
        Ok(result)
    }

    /// Bound ratios grouped by number of requests, in parameter space order.
    pub fn dual_bound_arrays(
        &self,
        scenarios: &BTreeSet<ScenarioId>,
    ) -> Result<Vec<DualBounds>, Report> {
        let scenario_filter = self.scenario_filter()?;
        let (_, numbers_of_requests) =
            scenario_filter.parameter_range(NUMBER_OF_REQUESTS)?;
        let mut result = Vec::with_capacity(numbers_of_requests.len());
        for number_of_requests in numbers_of_requests {
            let filter = FilterSpec::new(vec![Filter::new(
                NUMBER_OF_REQUESTS,
                number_of_requests.clone(),
            )]);
            let matching =
                scenario_filter.allowed_scenarios(Some(&filter), &BTreeSet::new())?;
            let mut bounds = DualBounds {
                number_of_requests,
                initial: Vec::new(),
                best: Vec::new(),
            };
            for scenario_id in matching.intersection(scenarios) {
                let (baseline, randround) = self.source.solutions(*scenario_id)?;
                bounds
                    .initial
                    .push(relative_dual_bound(initial_dual_bound(baseline), randround));
                bounds
                    .best
                    .push(relative_dual_bound(final_dual_bound(baseline), randround));
            }
            result.push(bounds);
        }
        Ok(result)
    }

    pub fn load_ecdf(&self, filter: Option<&FilterSpec>) -> Result<LoadEcdf, Report> {
        let scenarios = self.scenarios(filter)?;
        let series: Vec<_> = self
            .max_load_arrays(&scenarios)?
            .into_iter()
            .map(|(algorithm, loads)| LoadSeries {
                algorithm,
                node: Ecdf::new(&loads.node),
                edge: Ecdf::new(&loads.edge),
            })
            .collect();
        let max_observed_value = max_of(
            series
                .iter()
                .flat_map(|series| vec![&series.node, &series.edge]),
        );
        Ok(LoadEcdf {
            series,
            max_observed_value,
        })
    }

    pub fn objective_ecdf(
        &self,
        filter: Option<&FilterSpec>,
    ) -> Result<ObjectiveEcdf, Report> {
        let scenarios = self.scenarios(filter)?;
        let series: Vec<_> = self
            .relative_profit_arrays(&scenarios)?
            .into_iter()
            .map(|(algorithm, profits)| ProfitSeries {
                algorithm,
                ecdf: Ecdf::new(&profits),
            })
            .collect();
        let max_observed_value = max_of(series.iter().map(|series| &series.ecdf));
        Ok(ObjectiveEcdf {
            series,
            max_observed_value,
        })
    }

    /// Returns `None` if `filter` pins the number of requests, as the series
    /// are split by it.
    pub fn bound_ecdf(
        &self,
        filter: Option<&FilterSpec>,
    ) -> Result<Option<BoundEcdf>, Report> {
        if filter.map_or(false, |filter| filter.pins(NUMBER_OF_REQUESTS)) {
            tracing::info!(
                "[distribution] skipping the bound ECDF as the filter pins the {}",
                NUMBER_OF_REQUESTS
            );
            return Ok(None);
        }
        let scenarios = self.scenarios(filter)?;
        let series: Vec<_> = self
            .dual_bound_arrays(&scenarios)?
            .into_iter()
            .enumerate()
            .map(|(index, bounds)| BoundSeries {
                number_of_requests: bounds.number_of_requests,
                color: PlotFmt::bound_color(index),
                initial: Ecdf::new(&bounds.initial),
                best: Ecdf::new(&bounds.best),
            })
            .collect();
        let max_observed_value = max_of(
            series
                .iter()
                .flat_map(|series| vec![&series.initial, &series.best]),
        );
        Ok(Some(BoundEcdf {
            series,
            max_observed_value,
        }))
    }

    /// One series per combination of node and edge resource factor. Returns
    /// `None` if `filter` pins one of them.
    pub fn scatter(
        &self,
        variant: RoundingVariant,
        filter: Option<&FilterSpec>,
    ) -> Result<Option<Scatter>, Report> {
        let base = filter.cloned().unwrap_or_default();
        if let Some(conflict) =
            base.conflicting_filter(&[NODE_RESOURCE_FACTOR, EDGE_RESOURCE_FACTOR])
        {
            tracing::info!(
                "[distribution] skipping the {} scatter plot as the filter pins {}",
                variant.name(),
                conflict.parameter
            );
            return Ok(None);
        }

        let algorithm = Algorithm::from(variant);
        let bounding_box = PlotFmt::scatter_bounding_box(algorithm);
        let [x_box, y_box] = bounding_box;
        let outside = |value: f64, [min, max]: [f64; 2]| value < min || value > max;

        let scenario_filter = self.scenario_filter()?;
        let (_, node_resource_factors) =
            scenario_filter.parameter_range(NODE_RESOURCE_FACTOR)?;
        let (_, edge_resource_factors) =
            scenario_filter.parameter_range(EDGE_RESOURCE_FACTOR)?;

        let mut series = Vec::new();
        let mut points_outside = 0;
        for nrf in &node_resource_factors {
            for (index, erf) in edge_resource_factors.iter().enumerate() {
                let cell = base
                    .with(Filter::new(NODE_RESOURCE_FACTOR, nrf.clone()))
                    .with(Filter::new(EDGE_RESOURCE_FACTOR, erf.clone()));
                let scenarios = self.scenarios(Some(&cell))?;
                let relative_profit = self
                    .relative_profit_arrays(&scenarios)?
                    .swap_remove(&algorithm)
                    .unwrap_or_default();
                let max_load = self
                    .max_load_arrays(&scenarios)?
                    .swap_remove(&algorithm)
                    .unwrap_or_default()
                    .combined();
                points_outside += max_load
                    .iter()
                    .filter(|load| outside(**load, y_box))
                    .count();
                points_outside += relative_profit
                    .iter()
                    .filter(|profit| outside(**profit, x_box))
                    .count();
                series.push(ScatterSeries {
                    node_resource_factor: nrf.clone(),
                    edge_resource_factor: erf.clone(),
                    edge_resource_factor_index: index,
                    relative_profit,
                    max_load,
                });
            }
        }
        Ok(Some(Scatter {
            algorithm,
            bounding_box,
            series,
            points_outside,
        }))
    }
}

impl Plotter for RoundingComparison<'_> {
    fn name(&self) -> String {
        String::from("rounding comparison")
    }

    fn plot_figure(
        &self,
        filter: Option<&FilterSpec>,
        renderer: &mut dyn Renderer,
        output: &OutputConfig,
    ) -> Result<(), Report> {
        let artifact = output.artifact(None, "ECDF_load", filter);
        if !output.should_skip(&renderer.target(&artifact)) {
            let data = self.load_ecdf(filter).wrap_err("load ECDF")?;
            renderer.ecdf_load(&data, LOAD_ECDF_TITLE, &artifact)?;
        }

        let artifact = output.artifact(None, "ECDF_objective", filter);
        if !output.should_skip(&renderer.target(&artifact)) {
            let data = self.objective_ecdf(filter).wrap_err("objective ECDF")?;
            renderer.ecdf_objective(&data, OBJECTIVE_ECDF_TITLE, &artifact)?;
        }

        let artifact = output.artifact(None, "ECDF_bound", filter);
        if !output.should_skip(&renderer.target(&artifact)) {
            if let Some(data) = self.bound_ecdf(filter).wrap_err("bound ECDF")? {
                renderer.ecdf_bound(&data, BOUND_ECDF_TITLE, &artifact)?;
            }
        }

        for variant in RoundingVariant::all() {
            let stem = format!("SCATTER_obj_vs_load_{}", variant.name());
            let artifact = output.artifact(None, &stem, filter);
            if output.should_skip(&renderer.target(&artifact)) {
                continue;
            }
            let scatter = self
                .scatter(variant, filter)
                .wrap_err_with(|| format!("{} scatter plot", variant.name()))?;
            if let Some(scatter) = scatter {
                let title = scatter.title(output.paper_mode);
                renderer.scatter(&scatter, &title, &artifact)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, BASELINE, RANDROUND};
    use crate::load::tests::with_loads;
    use quickcheck_macros::quickcheck;
    use vnep_eval::{LogData, LogEntry, SolutionStorage};

    fn entry(globaltime: f64, objective_value: f64, objective_bound: f64) -> LogEntry {
        LogEntry {
            globaltime,
            data: LogData {
                objective_value,
                objective_bound,
            },
        }
    }

    #[test]
    fn profit_relative_to_baseline() {
        let mut baseline = McfResult::default();
        let mut randround = RandRoundResult::default();
        randround.wo_viol.profit = 30.0;
        baseline.status.obj_value = 40.0;
        assert_eq!(relative_profit(&baseline, &randround, RoundingVariant::WoViol), 75.0);
        baseline.status.obj_value = 0.0000001;
        assert!(relative_profit(&baseline, &randround, RoundingVariant::WoViol).is_nan());
    }

    #[test]
    fn dual_bounds() {
        let mut baseline = McfResult::default();
        // no log at all
        assert!(initial_dual_bound(&baseline).is_nan());
        assert!(final_dual_bound(&baseline).is_nan());

        baseline.temporal_log.root_relaxation_entry = Some(entry(1.0, 0.0, 120.0));
        baseline.temporal_log.log_entries =
            vec![entry(2.0, 10.0, 150.0), entry(3.0, 20.0, 90.0), entry(4.0, 30.0, 95.0)];
        assert_eq!(initial_dual_bound(&baseline), 150.0);
        assert_eq!(final_dual_bound(&baseline), 90.0);

        let mut randround = RandRoundResult::default();
        randround.meta_data.status.obj_value = 60.0;
        assert_eq!(relative_dual_bound(90.0, &randround), 1.5);
        // above the outlier threshold
        randround.meta_data.status.obj_value = 2.0;
        assert!(relative_dual_bound(2500.0, &randround).is_nan());
        // zero LP bound
        randround.meta_data.status.obj_value = 0.0;
        assert!(relative_dual_bound(90.0, &randround).is_nan());
        // garbage propagates
        randround.meta_data.status.obj_value = 60.0;
        assert!(relative_dual_bound(f64::NAN, &randround).is_nan());
    }

    #[test]
    fn ecdf() {
        let ecdf = Ecdf::new(&[3.0, f64::NAN, 1.0, 2.0, 2.0]);
        assert_eq!(ecdf.x, vec![1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ecdf.y, vec![0.25, 0.5, 0.75, 1.0]);
        assert_eq!(ecdf.max(), 3.0);
        assert!(Ecdf::new(&[f64::NAN]).is_empty());
        assert!(Ecdf::new(&[]).max().is_nan());
    }

    #[quickcheck]
    fn ecdf_steps(values: Vec<f64>) -> bool {
        let finite: Vec<_> = values.into_iter().filter(|value| value.is_finite()).collect();
        let ecdf = Ecdf::new(&finite);
        let k = finite.len();
        let sorted = ecdf.x.windows(2).all(|pair| pair[0] <= pair[1]);
        let steps = ecdf
            .y
            .iter()
            .enumerate()
            .all(|(i, y)| *y == (i + 1) as f64 / k as f64);
        ecdf.len() == k && sorted && steps
    }

    fn storages() -> (SolutionStorage<McfResult>, SolutionStorage<RandRoundResult>) {
        let baseline = fixture::storage(BASELINE, |id| {
            let (nr, _, _, erf) = fixture::indexes(id);
            let mut mcf = with_loads(&[50.0, 80.0], &[60.0 + erf as f64 * 30.0]);
            mcf.status.obj_value = if id == 16 { 0.0 } else { 100.0 };
            mcf.temporal_log.log_entries =
                vec![entry(1.0, 0.0, 300.0), entry(2.0, 50.0, 150.0 + nr as f64 * 50.0)];
            mcf
        });
        let randround = fixture::storage(RANDROUND, |id| {
            let (_, _, nrf, _) = fixture::indexes(id);
            let mut rr = RandRoundResult::default();
            rr.meta_data.status.obj_value = 100.0;
            rr.min_aug.profit = 120.0;
            rr.max_profit.profit = 150.0;
            rr.wo_viol.profit = 80.0;
            rr.mdk.profit = 90.0 + nrf as f64 * 5.0;
            rr.min_aug.max_node_load = 1.2;
            rr.min_aug.max_edge_load = 1.1;
            rr.mdk.max_node_load = 0.9;
            rr.mdk.max_edge_load = 1.5 - nrf as f64;
            rr
        });
        (baseline, randround)
    }

    fn comparison<'a>(
        baseline: &'a SolutionStorage<McfResult>,
        randround: &'a SolutionStorage<RandRoundResult>,
        forbidden: BTreeSet<ScenarioId>,
    ) -> RoundingComparison<'a> {
        RoundingComparison::new(
            McfSource::new(baseline, BASELINE, 0),
            RandRoundSource::new(randround, RANDROUND, 0),
            forbidden,
        )
        .unwrap()
    }

    #[test]
    fn only_for_triumvirate_results() {
        let (baseline, randround) = storages();
        let result = RoundingComparison::new(
            McfSource::new(&baseline, BASELINE, 0),
            RandRoundSource::new(&randround, "RandomizedRounding", 0),
            BTreeSet::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn arrays() {
        let (baseline, randround) = storages();
        let comparison = comparison(&baseline, &randround, BTreeSet::from([1]));
        let filter = FilterSpec::new(vec![Filter::new("topology", "Uunet")]);
        let scenarios = comparison.scenarios(Some(&filter)).unwrap();
        assert_eq!(scenarios.len(), 8);

        let profits = comparison.relative_profit_arrays(&scenarios).unwrap();
        assert_eq!(profits.len(), 4);
        assert_eq!(profits[&Algorithm::MinAug].len(), 8);
        assert!(profits[&Algorithm::MaxProfit][..7]
            .iter()
            .all(|profit| *profit == 150.0));
        // scenario 16 has a zero baseline objective
        assert!(profits[&Algorithm::MaxProfit][7].is_nan());

        let loads = comparison.max_load_arrays(&scenarios).unwrap();
        assert_eq!(loads.len(), 5);
        assert_eq!(loads[&Algorithm::MinAug].node[0], 120.0);
        assert_eq!(loads[&Algorithm::Baseline].node[0], 80.0);
        assert_eq!(loads[&Algorithm::Baseline].edge, vec![60.0, 90.0, 60.0, 90.0, 60.0, 90.0, 60.0, 90.0]);

        let bounds = comparison.dual_bound_arrays(&scenarios).unwrap();
        // in parameter space order, 60 is stored first
        assert_eq!(bounds[0].number_of_requests, ParamValue::from(60i64));
        assert_eq!(bounds[0].initial, vec![3.0; 4]);
        assert_eq!(bounds[0].best, vec![2.0; 4]);
        assert_eq!(bounds[1].number_of_requests, ParamValue::from(40i64));
        assert_eq!(bounds[1].best, vec![1.5; 4]);
    }

    #[test]
    fn ecdf_data() {
        let (baseline, randround) = storages();
        let comparison = comparison(&baseline, &randround, BTreeSet::new());

        let loads = comparison.load_ecdf(None).unwrap();
        assert_eq!(loads.series.len(), 5);
        assert_eq!(loads.max_observed_value, 150.0);

        let objective = comparison.objective_ecdf(None).unwrap();
        // scenario 16 is NaN and ignored
        assert!(objective.series.iter().all(|series| series.ecdf.len() == 15));
        assert_eq!(objective.max_observed_value, 150.0);

        let bound = comparison.bound_ecdf(None).unwrap().unwrap();
        assert_eq!(bound.series.len(), 2);
        assert_eq!(bound.series[0].color, "k");
        assert_eq!(bound.max_observed_value, 3.0);

        let filter =
            FilterSpec::new(vec![Filter::new("number_of_requests", 40i64)]);
        assert!(comparison.bound_ecdf(Some(&filter)).unwrap().is_none());
    }

    #[test]
    fn scatter() {
        let (baseline, randround) = storages();
        let comparison = comparison(&baseline, &randround, BTreeSet::new());
        let scatter = comparison
            .scatter(RoundingVariant::Mdk, None)
            .unwrap()
            .unwrap();
        assert_eq!(scatter.algorithm, Algorithm::Mdk);
        // two node times two edge resource factors
        assert_eq!(scatter.series.len(), 4);
        assert_eq!(scatter.point_count(), 16);
        // node resource factor 1.0 is stored first: loads of 90%
        assert!(scatter.series[0].max_load.iter().all(|load| *load == 90.0));
        assert_eq!(scatter.series[1].edge_resource_factor_index, 1);
        // with node resource factor 0.5 the load is 150%, outside of the box
        // [50, 105]; scenario 16 has no relative profit and isn't counted
        assert_eq!(scatter.points_outside, 8);
        assert_eq!(scatter.title(true), SCATTER_TITLE);
        assert!(scatter
            .title(false)
            .ends_with("8 of 16 points lie outside the displayed area"));

        // the user filter narrows every series
        let filter = FilterSpec::new(vec![Filter::new("topology", "Uunet")]);
        let scatter = comparison
            .scatter(RoundingVariant::Mdk, Some(&filter))
            .unwrap()
            .unwrap();
        assert_eq!(scatter.point_count(), 8);

        // unless it pins one of the factors
        let filter =
            FilterSpec::new(vec![Filter::new("edge_resource_factor", 0.5)]);
        assert!(comparison
            .scatter(RoundingVariant::Mdk, Some(&filter))
            .unwrap()
            .is_none());
    }
}
