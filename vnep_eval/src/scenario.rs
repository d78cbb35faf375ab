use crate::id::ScenarioId;
use crate::space::{ParameterPath, PathStep};
use crate::value::ParamValue;
use color_eyre::eyre;
use color_eyre::Report;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A node of the scenario parameter dict. It mirrors the shape of the
/// parameter space, but its leaves map each value to the scenarios generated
/// with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioNode {
    Branch(IndexMap<String, ScenarioNode>),
    Repeated(Box<ScenarioNode>),
    Leaf(Vec<(ParamValue, BTreeSet<ScenarioId>)>),
    /// The `all` sentinel: every scenario of a generator, regardless of its
    /// values. Ignored by lookups.
    All(BTreeSet<ScenarioId>),
}

impl ScenarioNode {
    pub fn branch<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, ScenarioNode)>,
        K: Into<String>,
    {
        Self::Branch(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    pub fn repeated(node: ScenarioNode) -> Self {
        Self::Repeated(Box::new(node))
    }

    pub fn leaf<I, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (V, S)>,
        V: Into<ParamValue>,
        S: IntoIterator<Item = ScenarioId>,
    {
        Self::Leaf(
            entries
                .into_iter()
                .map(|(value, ids)| (value.into(), ids.into_iter().collect()))
                .collect(),
        )
    }
}

/// One generation parameter of a scenario: the generator names leading to the
/// parameter (the parameter name included) and the value used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParameter {
    pub path: Vec<String>,
    pub value: ParamValue,
}

impl fmt::Display for GenerationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.path.join("/"), self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioParameterDict(ScenarioNode);

impl ScenarioParameterDict {
    pub fn new(root: ScenarioNode) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &ScenarioNode {
        &self.0
    }

    /// Returns the scenarios generated with `value` at `path`.
    ///
    /// An index step descends into a repeated wrapper. Dicts written without
    /// the wrapper are accepted as well: there the index step is skipped.
    pub fn lookup_scenarios(
        &self,
        path: &ParameterPath,
        value: &ParamValue,
    ) -> Result<&BTreeSet<ScenarioId>, Report> {
        let mut node = &self.0;
        for step in path.steps() {
            node = match (step, node) {
                (PathStep::Key(key), ScenarioNode::Branch(children)) => {
                    match children.get(key) {
                        Some(child) => child,
                        None => eyre::bail!(
                            "key {:?} of path {} not found in the scenario parameter dict",
                            key,
                            path
                        ),
                    }
                }
                (PathStep::Index(0), ScenarioNode::Repeated(child)) => child,
                (PathStep::Index(0), node) => node,
                (step, _) => eyre::bail!(
                    "step {} of path {} doesn't match the scenario parameter dict",
                    step,
                    path
                ),
            };
        }
        match node {
            ScenarioNode::Leaf(entries) => entries
                .iter()
                .find(|(candidate, _)| candidate == value)
                .map(|(_, ids)| ids)
                .ok_or_else(|| {
                    eyre::eyre!(
                        "value {} not found at path {} of the scenario parameter dict",
                        value,
                        path
                    )
                }),
            _ => eyre::bail!(
                "path {} doesn't end at a value mapping of the scenario parameter dict",
                path
            ),
        }
    }

    /// Returns every generation parameter used by `scenario_id`, or `None` if
    /// the scenario appears nowhere in the dict.
    pub fn extract_generation_parameters(
        &self,
        scenario_id: ScenarioId,
    ) -> Option<Vec<GenerationParameter>> {
        extract(&self.0, scenario_id)
    }
}

fn extract(
    node: &ScenarioNode,
    scenario_id: ScenarioId,
) -> Option<Vec<GenerationParameter>> {
    match node {
        ScenarioNode::Branch(children) => {
            let mut results = Vec::new();
            for (name, child) in children {
                if let Some(found) = extract(child, scenario_id) {
                    results.extend(found.into_iter().map(|mut param| {
                        param.path.insert(0, name.clone());
                        param
                    }));
                }
            }
            if results.is_empty() {
                None
            } else {
                Some(results)
            }
        }
        ScenarioNode::Repeated(child) => extract(child, scenario_id),
        ScenarioNode::Leaf(entries) => entries
            .iter()
            .find(|(_, ids)| ids.contains(&scenario_id))
            .map(|(value, _)| {
                vec![GenerationParameter {
                    path: Vec::new(),
                    value: value.clone(),
                }]
            }),
        ScenarioNode::All(_) => None,
    }
}
