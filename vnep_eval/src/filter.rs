use crate::id::ScenarioId;
use crate::scenario::ScenarioParameterDict;
use crate::solution::ScenarioParameterContainer;
use crate::space::{ParameterPath, ParameterSpace};
use crate::value::ParamValue;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use indexmap::IndexMap;
use permutator::Combination;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Restricts the scenarios to those generated with `value` for `parameter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub parameter: String,
    pub value: ParamValue,
}

impl Filter {
    pub fn new(parameter: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    fn key(&self) -> String {
        format!("{}_{}", self.parameter, self.value)
    }
}

/// Conjunction of filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(Vec<Filter>);

impl FilterSpec {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new spec with `filter` appended.
    pub fn with(&self, filter: Filter) -> Self {
        let mut filters = self.0.clone();
        filters.push(filter);
        Self(filters)
    }

    /// Whether some filter pins `parameter`.
    pub fn pins(&self, parameter: &str) -> bool {
        self.0.iter().any(|filter| filter.parameter == parameter)
    }

    /// Returns the first filter pinning one of `parameters`.
    pub fn conflicting_filter(&self, parameters: &[&str]) -> Option<&Filter> {
        self.0
            .iter()
            .find(|filter| parameters.contains(&filter.parameter.as_str()))
    }

    /// One `parameter=value` line per filter.
    pub fn title(&self) -> String {
        let lines: Vec<_> = self
            .0
            .iter()
            .map(|filter| format!("{}={}", filter.parameter, filter.value))
            .collect();
        lines.join(";\n")
    }

    /// Returns the directory (one `parameter_value` level per filter) and the
    /// file name suffix used by artifacts of this filter.
    pub fn path_and_filename(&self, filetype: &str) -> (String, String) {
        let keys: Vec<_> = self.0.iter().map(Filter::key).collect();
        let path = keys.join("/");
        let filename = format!("{}.{}", keys.join("_"), filetype);
        (path, filename)
    }
}

/// Computes scenario subsets of one solution storage.
#[derive(Debug, Clone)]
pub struct ScenarioFilter<'a> {
    parameter_space: &'a ParameterSpace,
    scenario_parameter_dict: &'a ScenarioParameterDict,
    all_scenario_ids: BTreeSet<ScenarioId>,
}

impl<'a> ScenarioFilter<'a> {
    /// `all_scenario_ids` are the scenarios solved by the algorithm under
    /// evaluation.
    pub fn new(
        container: &'a ScenarioParameterContainer,
        all_scenario_ids: impl IntoIterator<Item = ScenarioId>,
    ) -> Self {
        Self {
            parameter_space: &container.parameter_space,
            scenario_parameter_dict: &container.scenario_parameter_dict,
            all_scenario_ids: all_scenario_ids.into_iter().collect(),
        }
    }

    pub fn parameter_space(&self) -> &'a ParameterSpace {
        self.parameter_space
    }

    pub fn all_scenario_ids(&self) -> &BTreeSet<ScenarioId> {
        &self.all_scenario_ids
    }

    pub fn parameter_range(
        &self,
        parameter: &str,
    ) -> Result<(ParameterPath, Vec<ParamValue>), Report> {
        self.parameter_space.parameter_range(parameter)
    }

    /// Returns the scenarios matching every filter of `filter`, without the
    /// `forbidden` ones.
    pub fn allowed_scenarios(
        &self,
        filter: Option<&FilterSpec>,
        forbidden: &BTreeSet<ScenarioId>,
    ) -> Result<BTreeSet<ScenarioId>, Report> {
        let mut allowed = self.all_scenario_ids.clone();
        if let Some(filter) = filter {
            for entry in filter.filters() {
                let matching = self
                    .matching(&entry.parameter, &entry.value)
                    .wrap_err_with(|| format!("apply filter {:?}", entry))?;
                allowed.retain(|id| matching.contains(id));
            }
        }
        allowed.retain(|id| !forbidden.contains(id));
        Ok(allowed)
    }

    /// Returns the scenarios generated with `value` at an already resolved
    /// axis `path`.
    pub fn axis_scenarios(
        &self,
        path: &ParameterPath,
        value: &ParamValue,
    ) -> Result<&'a BTreeSet<ScenarioId>, Report> {
        self.scenario_parameter_dict.lookup_scenarios(path, value)
    }

    fn matching(
        &self,
        parameter: &str,
        value: &ParamValue,
    ) -> Result<&'a BTreeSet<ScenarioId>, Report> {
        let (path, _) = self.parameter_space.parameter_range(parameter)?;
        self.scenario_parameter_dict.lookup_scenarios(&path, value)
    }
}

/// Builds every filter spec over `keys` with at most `max_depth` filters. The
/// first entry is `None` (no filter); then, for each depth, every combination
/// of keys and every product of their values.
pub fn construct_filter_specs(
    space: &ParameterSpace,
    keys: &[String],
    max_depth: usize,
) -> Result<Vec<Option<FilterSpec>>, Report> {
    let mut ranges: IndexMap<&str, Vec<ParamValue>> = IndexMap::new();
    for key in keys {
        let (_, values) = space
            .parameter_range(key)
            .wrap_err("construct filter specs")?;
        ranges.insert(key.as_str(), values);
    }
    let keys: Vec<&str> = ranges.keys().copied().collect();

    let mut specs = vec![None];
    for depth in 1..=max_depth.min(keys.len()) {
        for combination in keys.combination(depth) {
            let value_lists: Vec<&Vec<ParamValue>> = combination
                .iter()
                .filter_map(|key| ranges.get(**key))
                .collect();
            for values in product(&value_lists) {
                let filters = combination
                    .iter()
                    .zip(values)
                    .map(|(key, value)| Filter::new(**key, value))
                    .collect();
                specs.push(Some(FilterSpec::new(filters)));
            }
        }
    }
    tracing::debug!(
        "[filter] {} filter specs over {:?} with max depth {}",
        specs.len(),
        keys,
        max_depth
    );
    Ok(specs)
}

// cartesian product, the last list varying fastest
fn product(lists: &[&Vec<ParamValue>]) -> Vec<Vec<ParamValue>> {
    lists.iter().fold(vec![Vec::new()], |acc, list| {
        acc.into_iter()
            .flat_map(|prefix| {
                list.iter().map(move |value| {
                    let mut tuple = prefix.clone();
                    tuple.push(value.clone());
                    tuple
                })
            })
            .collect()
    })
}

/// Excludes generation parameter values from the evaluation: returns the
/// scenarios generated with them and removes the values from `container`'s
/// parameter space and from `others`, so that they no longer show up on axes
/// or in filter specs.
pub fn exclude_generation_parameters(
    container: &mut ScenarioParameterContainer,
    others: &mut [&mut ParameterSpace],
    exclusions: &IndexMap<String, Vec<ParamValue>>,
) -> Result<BTreeSet<ScenarioId>, Report> {
    let mut forbidden = BTreeSet::new();
    for (parameter, excluded) in exclusions {
        let (path, values) = container.parameter_space.parameter_range(parameter)?;
        for value in excluded {
            if !values.contains(value) {
                eyre::bail!(
                    "the value {} is not contained in the list of parameter values {:?} for key {}",
                    value,
                    values,
                    parameter
                );
            }
            let ids = container
                .scenario_parameter_dict
                .lookup_scenarios(&path, value)?;
            forbidden.extend(ids.iter().copied());
        }
        tracing::info!(
            "[filter] excluding {:?} = {:?}: {} forbidden scenarios so far",
            parameter,
            excluded,
            forbidden.len()
        );
        container.parameter_space.remove_values(&path, excluded)?;
        for space in others.iter_mut() {
            space.remove_values(&path, excluded)?;
        }
    }
    Ok(forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::tests::dict;
    use crate::scenario::ScenarioNode;
    use crate::space::tests::space;
    use crate::space::SpaceNode;
    use quickcheck_macros::quickcheck;

    fn container() -> ScenarioParameterContainer {
        ScenarioParameterContainer {
            parameter_space: space(),
            scenario_parameter_dict: dict(),
        }
    }

    fn candidates() -> Vec<Filter> {
        vec![
            Filter::new("node_resource_factor", 0.5),
            Filter::new("node_resource_factor", 1.0),
            Filter::new("number_of_requests", 40i64),
            Filter::new("number_of_requests", 60i64),
            Filter::new("topology", "Geant2012"),
            Filter::new("topology", "Uunet"),
        ]
    }

    #[test]
    fn single_filter() {
        let container = ScenarioParameterContainer {
            parameter_space: ParameterSpace::new(SpaceNode::branch(vec![(
                "gen_a",
                SpaceNode::branch(vec![(
                    "node_resource_factor",
                    SpaceNode::leaf(vec![0.5, 1.0]),
                )]),
            )])),
            scenario_parameter_dict: ScenarioParameterDict::new(
                ScenarioNode::branch(vec![(
                    "gen_a",
                    ScenarioNode::branch(vec![(
                        "node_resource_factor",
                        ScenarioNode::leaf(vec![
                            (0.5, vec![1, 2]),
                            (1.0, vec![3, 4]),
                        ]),
                    )]),
                )]),
            ),
        };
        let filter = ScenarioFilter::new(&container, vec![1, 2, 3, 4]);
        let spec = FilterSpec::new(vec![Filter::new("node_resource_factor", 0.5)]);
        let allowed = filter
            .allowed_scenarios(Some(&spec), &BTreeSet::new())
            .unwrap();
        assert_eq!(allowed, BTreeSet::from([1, 2]));
    }

    #[test]
    fn conjunction_and_forbidden() {
        let container = container();
        let filter = ScenarioFilter::new(&container, 1..=8);
        let spec = FilterSpec::new(vec![
            Filter::new("node_resource_factor", 1.0),
            Filter::new("topology", "Uunet"),
        ]);
        let allowed = filter
            .allowed_scenarios(Some(&spec), &BTreeSet::from([8]))
            .unwrap();
        assert_eq!(allowed, BTreeSet::from([6]));
        // no filter: everything but the forbidden ones
        let allowed = filter
            .allowed_scenarios(None, &BTreeSet::from([1, 2]))
            .unwrap();
        assert_eq!(allowed, (3..=8).collect());
    }

    #[test]
    fn integer_filter_matches_float_values() {
        let container = container();
        let filter = ScenarioFilter::new(&container, 1..=8);
        let spec = FilterSpec::new(vec![Filter::new("node_resource_factor", 1i64)]);
        let allowed = filter
            .allowed_scenarios(Some(&spec), &BTreeSet::new())
            .unwrap();
        assert_eq!(allowed, BTreeSet::from([5, 6, 7, 8]));
    }

    #[test]
    fn unknown_filter_is_an_error() {
        let container = container();
        let filter = ScenarioFilter::new(&container, 1..=8);
        let spec = FilterSpec::new(vec![Filter::new("edge_resource_factor", 1.0)]);
        assert!(filter.allowed_scenarios(Some(&spec), &BTreeSet::new()).is_err());
        let spec = FilterSpec::new(vec![Filter::new("topology", "Ntt")]);
        assert!(filter.allowed_scenarios(Some(&spec), &BTreeSet::new()).is_err());
    }

    #[quickcheck]
    fn filters_only_shrink(choices: Vec<u8>, forbidden: Vec<u8>) -> bool {
        let container = container();
        let filter = ScenarioFilter::new(&container, 1..=8);
        let candidates = candidates();
        let forbidden: BTreeSet<ScenarioId> =
            forbidden.into_iter().map(|id| id as ScenarioId % 10).collect();

        let mut spec = FilterSpec::default();
        let mut previous = filter.allowed_scenarios(None, &forbidden).unwrap();
        for choice in choices.into_iter().take(6) {
            spec = spec.with(candidates[choice as usize % candidates.len()].clone());
            let allowed = filter.allowed_scenarios(Some(&spec), &forbidden).unwrap();
            if !allowed.is_subset(&previous) || !allowed.is_disjoint(&forbidden) {
                return false;
            }
            previous = allowed;
        }
        true
    }

    #[test]
    fn conflicts() {
        let spec = FilterSpec::new(vec![
            Filter::new("number_of_requests", 40i64),
            Filter::new("topology", "Uunet"),
        ]);
        let conflict = spec.conflicting_filter(&["node_resource_factor", "topology"]);
        assert_eq!(conflict, Some(&Filter::new("topology", "Uunet")));
        assert!(spec
            .conflicting_filter(&["node_resource_factor", "edge_resource_factor"])
            .is_none());
        assert!(spec.pins("number_of_requests"));
    }

    #[test]
    fn title_and_paths() {
        let spec = FilterSpec::new(vec![
            Filter::new("node_resource_factor", 0.5),
            Filter::new("number_of_requests", 40i64),
        ]);
        assert_eq!(spec.title(), "node_resource_factor=0.5;\nnumber_of_requests=40");
        let (path, filename) = spec.path_and_filename("png");
        assert_eq!(path, "node_resource_factor_0.5/number_of_requests_40");
        assert_eq!(filename, "node_resource_factor_0.5_number_of_requests_40.png");
    }

    #[test]
    fn filter_specs() {
        let keys = vec![
            String::from("number_of_requests"),
            String::from("topology"),
            String::from("number_of_requests"),
        ];
        let specs = construct_filter_specs(&space(), &keys, 2).unwrap();
        // none, 2 + 2 single filters, 2 * 2 pairs
        assert_eq!(specs.len(), 9);
        assert_eq!(specs[0], None);
        let singles: BTreeSet<_> = specs[1..5]
            .iter()
            .map(|spec| spec.as_ref().unwrap().filters().len())
            .collect();
        assert_eq!(singles, BTreeSet::from([1]));
        let pairs: Vec<_> = specs[5..].iter().map(|spec| spec.clone().unwrap()).collect();
        assert_eq!(
            pairs[0],
            FilterSpec::new(vec![
                Filter::new("number_of_requests", 40i64),
                Filter::new("topology", "Geant2012"),
            ])
        );
        assert_eq!(
            pairs[1],
            FilterSpec::new(vec![
                Filter::new("number_of_requests", 40i64),
                Filter::new("topology", "Uunet"),
            ])
        );

        // depth 0 keeps only the unfiltered spec
        assert_eq!(construct_filter_specs(&space(), &keys, 0).unwrap(), vec![None]);
        // unknown keys are an error
        let keys = vec![String::from("edge_resource_factor")];
        assert!(construct_filter_specs(&space(), &keys, 1).is_err());
    }

    #[test]
    fn exclusion() {
        let mut container = container();
        let mut other = space();
        let mut exclusions = IndexMap::new();
        exclusions.insert(String::from("topology"), vec![ParamValue::from("Uunet")]);
        let forbidden = exclude_generation_parameters(
            &mut container,
            &mut [&mut other],
            &exclusions,
        )
        .unwrap();
        assert_eq!(forbidden, BTreeSet::from([2, 4, 6, 8]));
        for space in vec![&container.parameter_space, &other] {
            let (_, values) = space.parameter_range("topology").unwrap();
            assert_eq!(values, vec![ParamValue::from("Geant2012")]);
        }

        // excluding a value that was never used is an error
        let mut exclusions = IndexMap::new();
        exclusions.insert(String::from("number_of_requests"), vec![ParamValue::from(80i64)]);
        assert!(exclude_generation_parameters(&mut container, &mut [], &exclusions).is_err());
    }
}
