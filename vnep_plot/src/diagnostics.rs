use color_eyre::Report;
use vnep_eval::{ExecutionId, McfResult, ScenarioId, SolutionStorage};

/// Gap above which a baseline solution is suspicious.
pub const MAX_OBJECTIVE_GAP: f64 = 100.0;

/// Returns the scenarios whose baseline solution has a very high objective
/// gap or no embeddable requests, logging the generation parameters of each.
/// A scenario matching both criteria is returned once.
pub fn select_suspicious_scenarios(
    storage: &SolutionStorage<McfResult>,
    algorithm_id: &str,
    execution_id: ExecutionId,
) -> Result<Vec<ScenarioId>, Report> {
    let mut result = Vec::new();
    for scenario_id in storage.scenario_ids(algorithm_id)? {
        let solution = storage.solution(algorithm_id, scenario_id, execution_id)?;
        let status = &solution.status;
        let high_gap = status.obj_gap > MAX_OBJECTIVE_GAP;
        let no_requests = solution.nu_real_req < 0.5;
        if high_gap {
            tracing::warn!(
                "[diagnostics] scenario {} has a gap of {} with objective bound {} and objective value {}",
                scenario_id,
                status.obj_gap,
                status.obj_bound,
                status.obj_value
            );
        }
        if no_requests {
            tracing::warn!(
                "[diagnostics] scenario {} contains no embeddable requests",
                scenario_id
            );
        }
        if !(high_gap || no_requests) {
            continue;
        }

        tracing::warn!(
            "[diagnostics] the computation of scenario {} took {} seconds",
            scenario_id,
            solution.runtime
        );
        let parameters = storage
            .scenario_parameter_dict()
            .extract_generation_parameters(scenario_id)
            .unwrap_or_default();
        for parameter in parameters {
            tracing::warn!("[diagnostics] scenario {}: {}", scenario_id, parameter);
        }
        result.push(scenario_id);
    }
    tracing::info!(
        "[diagnostics] {} scenarios have a very high gap or contain no requests",
        result.len()
    );
    Ok(result)
}
