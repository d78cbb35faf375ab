/// Identifier of a generated scenario. Never reused within a run.
pub type ScenarioId = u64;

/// Index of an execution of some algorithm on some scenario.
pub type ExecutionId = usize;

/// Identifier of the solution-producing procedure (e.g. the baseline MIP).
pub type AlgorithmId = String;
