use crate::id::{AlgorithmId, ExecutionId, ScenarioId};
use crate::scenario::ScenarioParameterDict;
use crate::space::ParameterSpace;
use crate::SerializationFormat;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Final status reported by a solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStatus {
    pub obj_value: f64,
    pub obj_bound: f64,
    pub obj_gap: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogData {
    pub objective_value: f64,
    pub objective_bound: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Seconds since the solver started.
    pub globaltime: f64,
    pub data: LogData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalLog {
    pub log_entries: Vec<LogEntry>,
    pub root_relaxation_entry: Option<LogEntry>,
    /// Entries at which the incumbent improved.
    pub improved_entries: Vec<LogEntry>,
}

/// A substrate resource.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Resource {
    Node { node_type: String, node: String },
    Edge { tail: String, head: String },
}

impl Resource {
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }
}

/// Solution of the baseline multi-commodity flow MIP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McfResult {
    pub status: SolverStatus,
    pub temporal_log: TemporalLog,
    /// Fraction of the requests that were embedded.
    pub embedding_ratio: f64,
    pub original_number_requests: f64,
    /// Number of requests that can be embedded at all.
    pub nu_real_req: f64,
    pub runtime: f64,
    /// Load of each resource, in percent.
    pub loads: Vec<(Resource, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandRoundMetaData {
    pub time_preprocessing: f64,
    pub time_optimization: f64,
    pub time_postprocessing: f64,
    /// Status of the LP relaxation; its objective is the LP bound.
    pub status: SolverStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MdkMetaData {
    pub time_preprocessing: f64,
    pub time_optimization: f64,
    pub time_postprocessing: f64,
    pub temporal_log: TemporalLog,
}

/// Outcome of one rounding variant. Loads are fractions of the capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundingSample {
    pub profit: f64,
    pub max_node_load: f64,
    pub max_edge_load: f64,
}

/// The rounding variants computed by the randomized rounding procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingVariant {
    MinAug,
    MaxProfit,
    WoViol,
    Mdk,
}

impl RoundingVariant {
    pub fn all() -> impl Iterator<Item = Self> {
        vec![Self::MinAug, Self::MaxProfit, Self::WoViol, Self::Mdk].into_iter()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MinAug => "min_aug",
            Self::MaxProfit => "max_profit",
            Self::WoViol => "wo_viol",
            Self::Mdk => "mdk",
        }
    }
}

/// Solution of the randomized rounding procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandRoundResult {
    pub meta_data: RandRoundMetaData,
    pub mdk_meta_data: MdkMetaData,
    /// Best sample minimizing resource augmentation.
    pub min_aug: RoundingSample,
    /// Best sample maximizing profit.
    pub max_profit: RoundingSample,
    /// Heuristic sample without capacity violations.
    pub wo_viol: RoundingSample,
    /// Multi-dimensional knapsack based rounding.
    pub mdk: RoundingSample,
}

impl RandRoundResult {
    pub fn variant(&self, variant: RoundingVariant) -> &RoundingSample {
        match variant {
            RoundingVariant::MinAug => &self.min_aug,
            RoundingVariant::MaxProfit => &self.max_profit,
            RoundingVariant::WoViol => &self.wo_viol,
            RoundingVariant::Mdk => &self.mdk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameterContainer {
    pub parameter_space: ParameterSpace,
    pub scenario_parameter_dict: ScenarioParameterDict,
}

/// Results of one experiment: the scenario parameters plus, for each
/// algorithm, the executions on each scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionStorage<S> {
    pub scenario_parameter_container: ScenarioParameterContainer,
    pub algorithm_scenario_solution_dictionary:
        IndexMap<AlgorithmId, BTreeMap<ScenarioId, Vec<S>>>,
}

impl<S> SolutionStorage<S> {
    pub fn parameter_space(&self) -> &ParameterSpace {
        &self.scenario_parameter_container.parameter_space
    }

    pub fn scenario_parameter_dict(&self) -> &ScenarioParameterDict {
        &self.scenario_parameter_container.scenario_parameter_dict
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &AlgorithmId> {
        self.algorithm_scenario_solution_dictionary.keys()
    }

    /// Returns the scenarios with solutions of `algorithm_id`.
    pub fn scenario_ids(
        &self,
        algorithm_id: &str,
    ) -> Result<impl Iterator<Item = ScenarioId> + '_, Report> {
        let scenarios = self
            .algorithm_scenario_solution_dictionary
            .get(algorithm_id)
            .ok_or_else(|| {
                eyre::eyre!("algorithm {:?} not found in storage", algorithm_id)
            })?;
        Ok(scenarios.keys().copied())
    }

    pub fn solution(
        &self,
        algorithm_id: &str,
        scenario_id: ScenarioId,
        execution_id: ExecutionId,
    ) -> Result<&S, Report> {
        self.algorithm_scenario_solution_dictionary
            .get(algorithm_id)
            .and_then(|scenarios| scenarios.get(&scenario_id))
            .and_then(|executions| executions.get(execution_id))
            .ok_or_else(|| {
                eyre::eyre!(
                    "no solution of algorithm {:?} for scenario {} and execution {}",
                    algorithm_id,
                    scenario_id,
                    execution_id
                )
            })
    }
}

impl<S> SolutionStorage<S>
where
    S: DeserializeOwned,
{
    pub fn load(
        path: impl AsRef<Path>,
        format: SerializationFormat,
    ) -> Result<Self, Report> {
        let path = path.as_ref();
        crate::deserialize(path, format).wrap_err_with(|| {
            format!("load solution storage from {}", path.display())
        })
    }
}
