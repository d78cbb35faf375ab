use crate::value::ParamValue;
use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the parameter space tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpaceNode {
    /// Generator (or parameter) name to child node, in insertion order.
    Branch(IndexMap<String, SpaceNode>),
    /// The one-element list wrapping repeated generator configurations.
    Repeated(Box<SpaceNode>),
    /// The values used for a parameter.
    Leaf(Vec<ParamValue>),
}

impl SpaceNode {
    pub fn branch<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, SpaceNode)>,
        K: Into<String>,
    {
        Self::Branch(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    pub fn repeated(node: SpaceNode) -> Self {
        Self::Repeated(Box::new(node))
    }

    pub fn leaf<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Self::Leaf(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    Key(String),
    /// Descend into the sole element of a repeated wrapper.
    Index(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Sequence of steps addressing a parameter leaf, both in the parameter space
/// and in the scenario parameter dict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterPath(Vec<PathStep>);

impl ParameterPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0
            .iter()
            .any(|step| matches!(step, PathStep::Key(k) if k == key))
    }

    fn prepend(&mut self, steps: impl IntoIterator<Item = PathStep>) {
        let mut path: Vec<_> = steps.into_iter().collect();
        path.append(&mut self.0);
        self.0 = path;
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<_> = self.0.iter().map(|step| step.to_string()).collect();
        write!(f, "{}", steps.join("/"))
    }
}

/// Nested description of the parameter values used to generate scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpace(SpaceNode);

impl ParameterSpace {
    pub fn new(root: SpaceNode) -> Self {
        Self(root)
    }

    pub fn root(&self) -> &SpaceNode {
        &self.0
    }

    /// Resolves a parameter name to the path of its leaf and the values it
    /// takes. When several generators declare the same parameter name, the
    /// first one in insertion order wins.
    pub fn resolve_parameter_path(
        &self,
        parameter: &str,
    ) -> Result<Option<(ParameterPath, Vec<ParamValue>)>, Report> {
        match &self.0 {
            SpaceNode::Branch(children) => resolve(children, parameter),
            _ => eyre::bail!(
                "parameter space root must be a mapping of generator names"
            ),
        }
    }

    /// Same as `resolve_parameter_path`, but a missing parameter is an error.
    pub fn parameter_range(
        &self,
        parameter: &str,
    ) -> Result<(ParameterPath, Vec<ParamValue>), Report> {
        self.resolve_parameter_path(parameter)?.ok_or_else(|| {
            eyre::eyre!(
                "parameter {:?} not found in the parameter space",
                parameter
            )
        })
    }

    /// Removes `values` from the leaf at `path`. Values not in the leaf are
    /// ignored.
    pub fn remove_values(
        &mut self,
        path: &ParameterPath,
        values: &[ParamValue],
    ) -> Result<(), Report> {
        let mut node = &mut self.0;
        for step in path.steps() {
            node = match (step, node) {
                (PathStep::Key(key), SpaceNode::Branch(children)) => children
                    .get_mut(key)
                    .ok_or_else(|| eyre::eyre!("missing key {:?}", key))
                    .wrap_err_with(|| format!("walking path {}", path))?,
                (PathStep::Index(0), SpaceNode::Repeated(child)) => child,
                (step, _) => eyre::bail!(
                    "step {} of path {} doesn't match the parameter space",
                    step,
                    path
                ),
            };
        }
        match node {
            SpaceNode::Leaf(leaf) => {
                leaf.retain(|value| !values.contains(value));
                Ok(())
            }
            _ => eyre::bail!("path {} doesn't end at a parameter leaf", path),
        }
    }
}

fn resolve(
    children: &IndexMap<String, SpaceNode>,
    parameter: &str,
) -> Result<Option<(ParameterPath, Vec<ParamValue>)>, Report> {
    for (name, child) in children {
        if name == parameter {
            return match child {
                SpaceNode::Leaf(values) => Ok(Some((
                    ParameterPath::new(vec![PathStep::Key(name.clone())]),
                    values.clone(),
                ))),
                _ => eyre::bail!(
                    "parameter {:?} names a generator, not a value list",
                    parameter
                ),
            };
        }
        let (prefix, found) = match child {
            SpaceNode::Repeated(inner) => match inner.as_ref() {
                SpaceNode::Branch(grandchildren) => (
                    vec![PathStep::Key(name.clone()), PathStep::Index(0)],
                    resolve(grandchildren, parameter)?,
                ),
                _ => continue,
            },
            SpaceNode::Branch(grandchildren) => (
                vec![PathStep::Key(name.clone())],
                resolve(grandchildren, parameter)?,
            ),
            SpaceNode::Leaf(_) => continue,
        };
        if let Some((mut path, values)) = found {
            path.prepend(prefix);
            return Ok(Some((path, values)));
        }
    }
    Ok(None)
}
