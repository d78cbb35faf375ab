// Sixteen scenarios covering every combination of two numbers of requests,
// two topologies and two node and edge resource factors. The scenario id is
// `1 + (nr * 8 + topology * 4 + nrf * 2 + erf)` where each parameter is given
// by the index of its value.

use indexmap::IndexMap;
use vnep_eval::{
    ParamValue, ParameterSpace, ScenarioId, ScenarioNode,
    ScenarioParameterContainer, ScenarioParameterDict, SolutionStorage,
    SpaceNode,
};

pub const BASELINE: &str = "ClassicMCF";
pub const RANDROUND: &str = "RandomizedRoundingTriumvirate";

pub const NUMBER_OF_REQUESTS: [i64; 2] = [40, 60];
pub const TOPOLOGIES: [&str; 2] = ["Geant2012", "Uunet"];
pub const FACTORS: [f64; 2] = [0.5, 1.0];

pub fn scenario_ids() -> impl Iterator<Item = ScenarioId> {
    1..=16
}

pub fn scenario_id(nr: usize, topology: usize, nrf: usize, erf: usize) -> ScenarioId {
    1 + (nr * 8 + topology * 4 + nrf * 2 + erf) as ScenarioId
}

/// Returns the value indexes `(nr, topology, nrf, erf)` of a scenario.
pub fn indexes(scenario_id: ScenarioId) -> (usize, usize, usize, usize) {
    let bit = |shift: u32| (((scenario_id - 1) >> shift) & 1) as usize;
    (bit(3), bit(2), bit(1), bit(0))
}

fn leaf(values: Vec<ParamValue>, shift: u32) -> ScenarioNode {
    let entries: Vec<_> = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let ids: Vec<_> = scenario_ids()
                .filter(|id| (((id - 1) >> shift) & 1) as usize == index)
                .collect();
            (value, ids)
        })
        .collect();
    ScenarioNode::leaf(entries)
}

fn values<T: Copy + Into<ParamValue>>(values: &[T]) -> Vec<ParamValue> {
    values.iter().map(|value| (*value).into()).collect()
}

pub fn container() -> ScenarioParameterContainer {
    // value lists are stored unsorted on purpose
    let parameter_space = ParameterSpace::new(SpaceNode::branch(vec![
        (
            "request_generation",
            SpaceNode::repeated(SpaceNode::branch(vec![(
                "ServiceChainGenerator",
                SpaceNode::branch(vec![(
                    "number_of_requests",
                    SpaceNode::leaf(vec![60i64, 40]),
                )]),
            )])),
        ),
        (
            "substrate_generation",
            SpaceNode::repeated(SpaceNode::branch(vec![(
                "TopologyZooReader",
                SpaceNode::branch(vec![
                    ("topology", SpaceNode::leaf(vec!["Uunet", "Geant2012"])),
                    ("node_resource_factor", SpaceNode::leaf(vec![1.0, 0.5])),
                    ("edge_resource_factor", SpaceNode::leaf(vec![0.5, 1.0])),
                ]),
            )])),
        ),
    ]));
    let scenario_parameter_dict = ScenarioParameterDict::new(ScenarioNode::branch(vec![
        (
            "request_generation",
            ScenarioNode::repeated(ScenarioNode::branch(vec![(
                "ServiceChainGenerator",
                ScenarioNode::branch(vec![(
                    "number_of_requests",
                    leaf(values(&NUMBER_OF_REQUESTS), 3),
                )]),
            )])),
        ),
        (
            "substrate_generation",
            ScenarioNode::repeated(ScenarioNode::branch(vec![(
                "TopologyZooReader",
                ScenarioNode::branch(vec![
                    ("topology", leaf(values(&TOPOLOGIES), 2)),
                    ("node_resource_factor", leaf(values(&FACTORS), 1)),
                    ("edge_resource_factor", leaf(values(&FACTORS), 0)),
                ]),
            )])),
        ),
    ]));
    ScenarioParameterContainer {
        parameter_space,
        scenario_parameter_dict,
    }
}

/// A storage with one execution of `algorithm_id` per scenario.
pub fn storage<S>(
    algorithm_id: &str,
    solution: impl Fn(ScenarioId) -> S,
) -> SolutionStorage<S> {
    let scenarios = scenario_ids().map(|id| (id, vec![solution(id)])).collect();
    let mut algorithm_scenario_solution_dictionary = IndexMap::new();
    algorithm_scenario_solution_dictionary.insert(algorithm_id.to_string(), scenarios);
    SolutionStorage {
        scenario_parameter_container: container(),
        algorithm_scenario_solution_dictionary,
    }
}

#[test]
fn scenario_id_indexes() {
    for id in scenario_ids() {
        let (nr, topology, nrf, erf) = indexes(id);
        assert_eq!(scenario_id(nr, topology, nrf, erf), id);
    }
}
