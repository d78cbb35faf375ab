use crate::axis::AxisSpec;
use crate::evaluate::Plotter;
use crate::metric::{metrics_for, CellValue, HeatmapPlotType, MetricLookup, MetricSpec};
use crate::output::OutputConfig;
use crate::render::Renderer;
use crate::stats;
use crate::topology::TopologySizes;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use serde::Serialize;
use std::collections::BTreeSet;
use vnep_eval::{
    AlgorithmId, ExecutionId, FilterSpec, McfResult, ParamValue, ParameterPath,
    RandRoundResult, ScenarioFilter, ScenarioId, SolutionStorage,
};

/// Where a heatmap takes its solutions from.
pub trait SolutionSource {
    fn plot_type(&self) -> HeatmapPlotType;

    /// Filter over the scenarios this source has solutions for.
    fn scenario_filter(&self) -> Result<ScenarioFilter<'_>, Report>;

    /// Applies `lookup` to the solution(s) of `scenario_id`.
    fn value(
        &self,
        lookup: MetricLookup,
        scenario_id: ScenarioId,
    ) -> Result<f64, Report>;
}

/// Solutions of the baseline MIP.
pub struct McfSource<'a> {
    storage: &'a SolutionStorage<McfResult>,
    algorithm_id: AlgorithmId,
    execution_id: ExecutionId,
}

impl<'a> McfSource<'a> {
    pub fn new(
        storage: &'a SolutionStorage<McfResult>,
        algorithm_id: impl Into<AlgorithmId>,
        execution_id: ExecutionId,
    ) -> Self {
        Self {
            storage,
            algorithm_id: algorithm_id.into(),
            execution_id,
        }
    }

    pub(crate) fn solution(
        &self,
        scenario_id: ScenarioId,
    ) -> Result<&'a McfResult, Report> {
        self.storage
            .solution(&self.algorithm_id, scenario_id, self.execution_id)
    }
}

impl SolutionSource for McfSource<'_> {
    fn plot_type(&self) -> HeatmapPlotType {
        HeatmapPlotType::SimpleMcf
    }

    fn scenario_filter(&self) -> Result<ScenarioFilter<'_>, Report> {
        let ids = self.storage.scenario_ids(&self.algorithm_id)?;
        Ok(ScenarioFilter::new(
            &self.storage.scenario_parameter_container,
            ids,
        ))
    }

    fn value(
        &self,
        lookup: MetricLookup,
        scenario_id: ScenarioId,
    ) -> Result<f64, Report> {
        match lookup {
            MetricLookup::Mcf(lookup) => Ok(lookup(self.solution(scenario_id)?)),
            lookup => eyre::bail!(
                "{:?} can't be applied to baseline solutions",
                lookup
            ),
        }
    }
}

/// Solutions of the randomized rounding procedure.
pub struct RandRoundSource<'a> {
    storage: &'a SolutionStorage<RandRoundResult>,
    algorithm_id: AlgorithmId,
    execution_id: ExecutionId,
}

impl<'a> RandRoundSource<'a> {
    pub fn new(
        storage: &'a SolutionStorage<RandRoundResult>,
        algorithm_id: impl Into<AlgorithmId>,
        execution_id: ExecutionId,
    ) -> Self {
        Self {
            storage,
            algorithm_id: algorithm_id.into(),
            execution_id,
        }
    }

    pub fn algorithm_id(&self) -> &str {
        &self.algorithm_id
    }

    pub(crate) fn solution(
        &self,
        scenario_id: ScenarioId,
    ) -> Result<&'a RandRoundResult, Report> {
        self.storage
            .solution(&self.algorithm_id, scenario_id, self.execution_id)
    }
}

impl SolutionSource for RandRoundSource<'_> {
    fn plot_type(&self) -> HeatmapPlotType {
        HeatmapPlotType::SimpleRandRound
    }

    fn scenario_filter(&self) -> Result<ScenarioFilter<'_>, Report> {
        let ids = self.storage.scenario_ids(&self.algorithm_id)?;
        Ok(ScenarioFilter::new(
            &self.storage.scenario_parameter_container,
            ids,
        ))
    }

    fn value(
        &self,
        lookup: MetricLookup,
        scenario_id: ScenarioId,
    ) -> Result<f64, Report> {
        match lookup {
            MetricLookup::RandRound(lookup) => {
                Ok(lookup(self.solution(scenario_id)?))
            }
            lookup => eyre::bail!(
                "{:?} can't be applied to randomized rounding solutions",
                lookup
            ),
        }
    }
}

/// Pairs of a baseline and a randomized rounding solution. Scenarios are
/// selected through the baseline storage.
pub struct ComparisonSource<'a> {
    baseline: McfSource<'a>,
    randround: RandRoundSource<'a>,
}

impl<'a> ComparisonSource<'a> {
    pub fn new(baseline: McfSource<'a>, randround: RandRoundSource<'a>) -> Self {
        Self {
            baseline,
            randround,
        }
    }

    pub fn randround(&self) -> &RandRoundSource<'a> {
        &self.randround
    }

    pub(crate) fn solutions(
        &self,
        scenario_id: ScenarioId,
    ) -> Result<(&'a McfResult, &'a RandRoundResult), Report> {
        let baseline = self.baseline.solution(scenario_id)?;
        let randround = self.randround.solution(scenario_id)?;
        Ok((baseline, randround))
    }
}

impl SolutionSource for ComparisonSource<'_> {
    fn plot_type(&self) -> HeatmapPlotType {
        HeatmapPlotType::ComparisonMcfVsRandRound
    }

    fn scenario_filter(&self) -> Result<ScenarioFilter<'_>, Report> {
        self.baseline.scenario_filter()
    }

    fn value(
        &self,
        lookup: MetricLookup,
        scenario_id: ScenarioId,
    ) -> Result<f64, Report> {
        match lookup {
            MetricLookup::Comparison(lookup) => {
                let (baseline, randround) = self.solutions(scenario_id)?;
                Ok(lookup(baseline, randround))
            }
            lookup => eyre::bail!(
                "{:?} can't be applied to pairs of solutions",
                lookup
            ),
        }
    }
}

/// A metric aggregated over a grid of two generation parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub metric_name: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// Row `i` holds the cells of the `i`-th y axis value.
    pub cells: Vec<Vec<CellValue>>,
    pub vmin: f64,
    pub vmax: f64,
    pub colorbar_ticks: Vec<f64>,
    pub cmap: String,
    pub min_values_per_cell: usize,
    pub max_values_per_cell: usize,
    /// Every value that went into some cell.
    #[serde(skip)]
    pub observed_values: Vec<f64>,
}

impl Heatmap {
    /// Display values, row by row.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.value).collect())
            .collect()
    }

    pub fn solution_count_string(&self) -> String {
        if self.min_values_per_cell == self.max_values_per_cell {
            format!("{} values per square", self.min_values_per_cell)
        } else {
            format!(
                "between {} and {} values per square",
                self.min_values_per_cell, self.max_values_per_cell
            )
        }
    }

    /// Outside of paper mode, the title also describes the filter and the
    /// observed values.
    pub fn title(&self, paper_mode: bool, filter: Option<&FilterSpec>) -> String {
        if paper_mode {
            return self.metric_name.clone();
        }
        let mut title = format!("{}\n", self.metric_name);
        if let Some(filter) = filter.filter(|filter| !filter.is_empty()) {
            title.push_str(&filter.title());
            title.push('\n');
        }
        title.push_str(&self.solution_count_string());
        title.push('\n');
        title.push_str(&stats::summary(&self.observed_values));
        title
    }
}

/// Draws every metric over every pair of axes.
pub struct HeatmapPlotter<S> {
    source: S,
    axes: Vec<AxisSpec>,
    metrics: Vec<MetricSpec>,
    forbidden: BTreeSet<ScenarioId>,
    topology_sizes: TopologySizes,
}

impl<S> HeatmapPlotter<S>
where
    S: SolutionSource,
{
    /// An empty `metrics` selects every registered metric of `plot_type`.
    pub fn new(
        plot_type: HeatmapPlotType,
        source: S,
        axes: Vec<AxisSpec>,
        metrics: Vec<MetricSpec>,
        forbidden: BTreeSet<ScenarioId>,
    ) -> Result<Self, Report> {
        if source.plot_type() != plot_type {
            eyre::bail!(
                "solutions for {:?} heatmaps can't be used for {:?} heatmaps",
                source.plot_type(),
                plot_type
            );
        }
        if axes.is_empty() {
            eyre::bail!("axes need to be provided");
        }
        let metrics = if metrics.is_empty() {
            metrics_for(plot_type)
        } else {
            if let Some(metric) =
                metrics.iter().find(|metric| metric.plot_type != plot_type)
            {
                eyre::bail!(
                    "the metric {:?} ({:?}) does not agree with the plot type {:?}",
                    metric.filename,
                    metric.plot_type,
                    plot_type
                );
            }
            metrics
        };
        Ok(Self {
            source,
            axes,
            metrics,
            forbidden,
            topology_sizes: TopologySizes::default(),
        })
    }

    pub fn with_topology_sizes(mut self, topology_sizes: TopologySizes) -> Self {
        self.topology_sizes = topology_sizes;
        self
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    /// Aggregates `metric` over the scenarios generated with `x_value` and
    /// `y_value` that pass `filter`. Returns the display value and the values
    /// it was computed from.
    pub fn aggregate_cell(
        &self,
        metric: &MetricSpec,
        axes: &AxisSpec,
        x_value: &ParamValue,
        y_value: &ParamValue,
        filter: Option<&FilterSpec>,
    ) -> Result<(CellValue, Vec<f64>), Report> {
        let scenario_filter = self.source.scenario_filter()?;
        let (x_path, _) = scenario_filter.parameter_range(&axes.x_axis_parameter)?;
        let (y_path, _) = scenario_filter.parameter_range(&axes.y_axis_parameter)?;
        let allowed = scenario_filter.allowed_scenarios(filter, &self.forbidden)?;
        let x_ids = scenario_filter.axis_scenarios(&x_path, x_value)?;
        let y_ids = scenario_filter.axis_scenarios(&y_path, y_value)?;
        let values = self.cell_values(metric, x_ids, y_ids, &allowed)?;
        Ok((metric.round(stats::nan_mean(&values)), values))
    }

    /// Aggregates `metric` over the whole grid of `axes`. Returns `None` if
    /// `filter` pins one of the axes.
    pub fn aggregate(
        &self,
        metric: &MetricSpec,
        axes: &AxisSpec,
        filter: Option<&FilterSpec>,
    ) -> Result<Option<Heatmap>, Report> {
        if let Some(conflict) =
            filter.and_then(|filter| filter.conflicting_filter(&axes.parameters()))
        {
            tracing::debug!(
                "[heatmap] skipping {} in {}: filter {}={} conflicts with the axes",
                metric.filename,
                axes.foldername,
                conflict.parameter,
                conflict.value
            );
            return Ok(None);
        }

        let scenario_filter = self.source.scenario_filter()?;
        let (x_path, mut x_values) =
            scenario_filter.parameter_range(&axes.x_axis_parameter)?;
        let (y_path, mut y_values) =
            scenario_filter.parameter_range(&axes.y_axis_parameter)?;
        x_values.sort();
        y_values.sort();
        let x_labels = labels(&x_values);
        let y_labels = if y_path.contains_key("topology") {
            self.topology_sizes
                .order_axis(&mut y_values)
                .wrap_err_with(|| format!("order y axis of {}", axes.foldername))?
        } else {
            labels(&y_values)
        };

        let allowed = scenario_filter.allowed_scenarios(filter, &self.forbidden)?;
        let x_ids = axis_scenarios(&scenario_filter, &x_path, &x_values)?;
        let y_ids = axis_scenarios(&scenario_filter, &y_path, &y_values)?;

        let mut cells = Vec::with_capacity(y_ids.len());
        let mut counts = Vec::new();
        let mut observed_values = Vec::new();
        for y_ids in &y_ids {
            let mut row = Vec::with_capacity(x_ids.len());
            for x_ids in &x_ids {
                let values = self.cell_values(metric, x_ids, y_ids, &allowed)?;
                let mean = stats::nan_mean(&values);
                if mean.is_nan() {
                    tracing::warn!(
                        "[heatmap] no value of {} for a cell of {}",
                        metric.filename,
                        axes.foldername
                    );
                }
                row.push(metric.round(mean));
                counts.push(values.len());
                observed_values.extend(values);
            }
            cells.push(row);
        }

        Ok(Some(Heatmap {
            metric_name: metric.name.clone(),
            x_axis_title: axes.x_axis_title.clone(),
            y_axis_title: axes.y_axis_title.clone(),
            x_labels,
            y_labels,
            cells,
            vmin: metric.vmin,
            vmax: metric.vmax,
            colorbar_ticks: metric.colorbar_ticks.clone(),
            cmap: metric.cmap.to_string(),
            min_values_per_cell: counts.iter().copied().min().unwrap_or(0),
            max_values_per_cell: counts.iter().copied().max().unwrap_or(0),
            observed_values,
        }))
    }

    fn cell_values(
        &self,
        metric: &MetricSpec,
        x_ids: &BTreeSet<ScenarioId>,
        y_ids: &BTreeSet<ScenarioId>,
        allowed: &BTreeSet<ScenarioId>,
    ) -> Result<Vec<f64>, Report> {
        let mut values = Vec::new();
        let scenarios = allowed
            .iter()
            .filter(|id| x_ids.contains(id) && y_ids.contains(id));
        for scenario_id in scenarios {
            let value = self
                .source
                .value(metric.lookup, *scenario_id)
                .wrap_err_with(|| format!("compute {}", metric.filename))?;
            if metric.metric_filter.map_or(true, |keep| keep(value)) {
                values.push(value);
            }
        }
        Ok(values)
    }
}

fn labels(values: &[ParamValue]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn axis_scenarios<'a>(
    scenario_filter: &ScenarioFilter<'a>,
    path: &ParameterPath,
    values: &[ParamValue],
) -> Result<Vec<&'a BTreeSet<ScenarioId>>, Report> {
    values
        .iter()
        .map(|value| scenario_filter.axis_scenarios(path, value))
        .collect()
}

impl<S> Plotter for HeatmapPlotter<S>
where
    S: SolutionSource,
{
    fn name(&self) -> String {
        format!("{:?} heatmaps", self.source.plot_type())
    }

    fn plot_figure(
        &self,
        filter: Option<&FilterSpec>,
        renderer: &mut dyn Renderer,
        output: &OutputConfig,
    ) -> Result<(), Report> {
        for axes in &self.axes {
            for metric in &self.metrics {
                let artifact =
                    output.artifact(Some(&axes.foldername), metric.filename, filter);
                if output.should_skip(&renderer.target(&artifact)) {
                    continue;
                }
                let heatmap = self.aggregate(metric, axes, filter).wrap_err_with(|| {
                    format!("aggregate {} over {}", metric.filename, axes.foldername)
                })?;
                if let Some(heatmap) = heatmap {
                    let title = heatmap.title(output.paper_mode, filter);
                    renderer.heatmap(&heatmap, &title, &artifact)?;
                }
            }
        }
        Ok(())
    }
}
