use crate::axis::all_axes;
use crate::config::EvaluationConfig;
use crate::distribution::RoundingComparison;
use crate::heatmap::{ComparisonSource, HeatmapPlotter, McfSource, RandRoundSource};
use crate::metric::HeatmapPlotType;
use crate::output::OutputConfig;
use crate::progress::TracingProgressBar;
use crate::render::Renderer;
use crate::temporal::TemporalComparison;
use crate::topology::TopologySizes;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use vnep_eval::{
    construct_filter_specs, exclude_generation_parameters, FilterSpec, McfResult,
    RandRoundResult, SolutionStorage,
};

/// Produces one family of plots for a filter.
pub trait Plotter {
    fn name(&self) -> String;

    /// Aggregates every plot of this family for `filter` and hands them to
    /// `renderer`, skipping the artifacts `output` says to keep.
    fn plot_figure(
        &self,
        filter: Option<&FilterSpec>,
        renderer: &mut dyn Renderer,
        output: &OutputConfig,
    ) -> Result<(), Report>;
}

/// Generates every plot comparing the baseline with the randomized rounding
/// solutions, once per filter spec.
///
/// Excluded generation parameter values are removed from the parameter
/// spaces of both storages before any plot is generated, so that they show
/// up neither on axes nor in filter specs.
pub fn evaluate_baseline_and_randround(
    baseline: &mut SolutionStorage<McfResult>,
    randround: &mut SolutionStorage<RandRoundResult>,
    config: &EvaluationConfig,
    topology_sizes: &TopologySizes,
    renderer: &mut dyn Renderer,
    progress: &TracingProgressBar,
) -> Result<(), Report> {
    let mut forbidden = config.forbidden_scenario_ids.clone();
    let excluded = exclude_generation_parameters(
        &mut baseline.scenario_parameter_container,
        &mut [&mut randround.scenario_parameter_container.parameter_space],
        &config.exclude_generation_parameters,
    )
    .wrap_err("exclude generation parameters")?;
    forbidden.extend(excluded);
    let baseline = &*baseline;
    let randround = &*randround;

    let filter_specs = match &config.parameter_filter_keys {
        Some(keys) => {
            construct_filter_specs(baseline.parameter_space(), keys, config.max_depth_filter)?
        }
        None => vec![None],
    };

    let baseline_source = || {
        McfSource::new(
            baseline,
            config.baseline_algorithm_id.clone(),
            config.baseline_execution_id,
        )
    };
    let randround_source = || {
        RandRoundSource::new(
            randround,
            config.randround_algorithm_id.clone(),
            config.randround_execution_id,
        )
    };

    let mut plotters: Vec<Box<dyn Plotter + '_>> = vec![
        Box::new(RoundingComparison::new(
            baseline_source(),
            randround_source(),
            forbidden.clone(),
        )?),
        Box::new(
            HeatmapPlotter::new(
                HeatmapPlotType::SimpleMcf,
                baseline_source(),
                all_axes(),
                Vec::new(),
                forbidden.clone(),
            )?
            .with_topology_sizes(topology_sizes.clone()),
        ),
        Box::new(
            HeatmapPlotter::new(
                HeatmapPlotType::SimpleRandRound,
                randround_source(),
                all_axes(),
                Vec::new(),
                forbidden.clone(),
            )?
            .with_topology_sizes(topology_sizes.clone()),
        ),
        Box::new(
            HeatmapPlotter::new(
                HeatmapPlotType::ComparisonMcfVsRandRound,
                ComparisonSource::new(baseline_source(), randround_source()),
                all_axes(),
                Vec::new(),
                forbidden.clone(),
            )?
            .with_topology_sizes(topology_sizes.clone()),
        ),
    ];
    if config.temporal {
        plotters.push(Box::new(TemporalComparison::new(
            baseline_source(),
            randround_source(),
            forbidden.clone(),
        )?));
    }

    tracing::info!(
        "[evaluate] {} plotters, {} filter specs and {} forbidden scenarios",
        plotters.len(),
        filter_specs.len(),
        forbidden.len()
    );
    progress.set_length((filter_specs.len() * plotters.len()) as u64);

    for filter in &filter_specs {
        let filter = filter.as_ref();
        tracing::debug!(
            "[evaluate] filter: {}",
            filter.map_or_else(|| String::from("none"), |filter| filter.title())
        );
        for plotter in &plotters {
            progress.set_message(plotter.name());
            plotter
                .plot_figure(filter, renderer, &config.output)
                .wrap_err_with(|| format!("plot {}", plotter.name()))?;
            progress.inc();
        }
    }
    progress.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, BASELINE, RANDROUND};
    use crate::output::OutputConfig;
    use crate::render::JsonRenderer;
    use indexmap::IndexMap;
    use std::path::PathBuf;
    use vnep_eval::ParamValue;

    fn storages() -> (SolutionStorage<McfResult>, SolutionStorage<RandRoundResult>) {
        let baseline = fixture::storage(BASELINE, |id| {
            let mut mcf = McfResult::default();
            mcf.status.obj_value = 100.0;
            mcf.runtime = id as f64;
            mcf.embedding_ratio = 0.5;
            mcf
        });
        let randround = fixture::storage(RANDROUND, |_| {
            let mut rr = RandRoundResult::default();
            rr.meta_data.status.obj_value = 120.0;
            rr.mdk.profit = 90.0;
            rr.wo_viol.profit = 80.0;
            rr
        });
        (baseline, randround)
    }

    fn config(name: &str) -> EvaluationConfig {
        EvaluationConfig {
            baseline_algorithm_id: BASELINE.to_string(),
            randround_algorithm_id: RANDROUND.to_string(),
            output: OutputConfig {
                output_path: std::env::temp_dir()
                    .join(format!("vnep_{}_{}", name, std::process::id())),
                date: String::from("2019-03-01"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn general_plot(config: &EvaluationConfig, path: &str) -> PathBuf {
        config
            .output
            .output_path
            .join("2019-03-01/png/general_plots")
            .join(path)
    }

    #[test]
    fn every_plotter_for_every_filter() {
        let (mut baseline, mut randround) = storages();
        let mut config = config("evaluate");
        config.parameter_filter_keys = Some(vec![String::from("topology")]);
        config.max_depth_filter = 1;
        config.temporal = true;
        let mut renderer = JsonRenderer::new(true);
        let progress = TracingProgressBar::hidden();

        evaluate_baseline_and_randround(
            &mut baseline,
            &mut randround,
            &config,
            &TopologySizes::default(),
            &mut renderer,
            &progress,
        )
        .unwrap();

        // no filter plus one per topology, times five plotters
        assert_eq!(progress.position(), 15);
        assert!(renderer.written() > 0);
        assert!(general_plot(&config, "ECDF_load_no_filter.json").is_file());
        assert!(general_plot(&config, "temporal_mdk_vs_mip_no_filter.json").is_file());
        assert!(general_plot(
            &config,
            "topology_Uunet/ECDF_objective_topology_Uunet.json"
        )
        .is_file());
        assert!(config
            .output
            .output_path
            .join("2019-03-01/png/AXES_RESOURCES/runtime_no_filter.json")
            .is_file());

        std::fs::remove_dir_all(&config.output.output_path).unwrap();
    }

    #[test]
    fn existing_artifacts_are_kept() {
        let mut config = config("keep");
        config.output.overwrite_existing_files = false;
        config.temporal = true;
        let progress = TracingProgressBar::hidden();

        let mut written = Vec::new();
        for _ in 0..2 {
            let (mut baseline, mut randround) = storages();
            let mut renderer = JsonRenderer::new(true);
            evaluate_baseline_and_randround(
                &mut baseline,
                &mut randround,
                &config,
                &TopologySizes::default(),
                &mut renderer,
                &progress,
            )
            .unwrap();
            written.push(renderer.written());
        }
        assert!(written[0] > 0);
        assert_eq!(written[1], 0);

        std::fs::remove_dir_all(&config.output.output_path).unwrap();
    }

    #[test]
    fn excluded_values_leave_the_parameter_space() {
        let (mut baseline, mut randround) = storages();
        let mut config = config("exclude");
        config
            .exclude_generation_parameters
            .insert(String::from("topology"), vec![ParamValue::from("Geant2012")]);
        config.parameter_filter_keys = Some(vec![String::from("topology")]);
        config.output.save_plot = false;
        let mut renderer = JsonRenderer::new(config.output.save_plot);
        let progress = TracingProgressBar::hidden();

        evaluate_baseline_and_randround(
            &mut baseline,
            &mut randround,
            &config,
            &TopologySizes::default(),
            &mut renderer,
            &progress,
        )
        .unwrap();

        // no filter plus Uunet, times four plotters
        assert_eq!(progress.position(), 8);
        for storage_space in [baseline.parameter_space(), randround.parameter_space()] {
            let (_, topologies) = storage_space.parameter_range("topology").unwrap();
            assert_eq!(topologies, vec![ParamValue::from("Uunet")]);
        }
        assert_eq!(renderer.written(), 0);
    }

    #[test]
    fn unknown_exclusion() {
        let (mut baseline, mut randround) = storages();
        let mut config = config("unknown");
        let mut exclusions = IndexMap::new();
        exclusions.insert(String::from("topology"), vec![ParamValue::from("Ntt")]);
        config.exclude_generation_parameters = exclusions;
        let result = evaluate_baseline_and_randround(
            &mut baseline,
            &mut randround,
            &config,
            &TopologySizes::default(),
            &mut JsonRenderer::new(false),
            &TracingProgressBar::hidden(),
        );
        assert!(result.is_err());
    }
}
