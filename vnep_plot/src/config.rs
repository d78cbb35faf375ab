use crate::distribution::RANDROUND_ALGORITHM;
use crate::output::OutputConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use vnep_eval::{AlgorithmId, ExecutionId, ParamValue, ScenarioId};

fn default_baseline_algorithm_id() -> AlgorithmId {
    AlgorithmId::from("ClassicMCF")
}

fn default_randround_algorithm_id() -> AlgorithmId {
    AlgorithmId::from(RANDROUND_ALGORITHM)
}

fn default_max_depth_filter() -> usize {
    2
}

/// Everything an evaluation run needs besides the solution storages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_baseline_algorithm_id")]
    pub baseline_algorithm_id: AlgorithmId,
    #[serde(default)]
    pub baseline_execution_id: ExecutionId,
    #[serde(default = "default_randround_algorithm_id")]
    pub randround_algorithm_id: AlgorithmId,
    #[serde(default)]
    pub randround_execution_id: ExecutionId,
    /// Generation parameter values whose scenarios are dropped from both
    /// storages, e.g. `{"number_of_requests": [20]}`.
    #[serde(default)]
    pub exclude_generation_parameters: IndexMap<String, Vec<ParamValue>>,
    /// Parameters to build filter combinations from; all plots are
    /// generated once without filter if unset.
    #[serde(default)]
    pub parameter_filter_keys: Option<Vec<String>>,
    #[serde(default)]
    pub forbidden_scenario_ids: BTreeSet<ScenarioId>,
    /// Maximum number of filters combined.
    #[serde(default = "default_max_depth_filter")]
    pub max_depth_filter: usize,
    /// Whether to compare incumbents over time.
    #[serde(default)]
    pub temporal: bool,
    #[serde(flatten)]
    pub output: OutputConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            baseline_algorithm_id: default_baseline_algorithm_id(),
            baseline_execution_id: 0,
            randround_algorithm_id: default_randround_algorithm_id(),
            randround_execution_id: 0,
            exclude_generation_parameters: IndexMap::new(),
            parameter_filter_keys: None,
            forbidden_scenario_ids: BTreeSet::new(),
            max_depth_filter: default_max_depth_filter(),
            temporal: false,
            output: OutputConfig::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("open config {}", path.display()))?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))
            .wrap_err_with(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }
}
