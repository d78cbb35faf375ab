use color_eyre::eyre::{self, WrapErr};
use color_eyre::Report;
use csv::Reader;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use vnep_eval::ParamValue;

/// Two-letter label of a substrate topology.
pub fn short_name(topology: &str) -> Option<&'static str> {
    match topology {
        "Uunet" => Some("UU"),
        "Surfnet" => Some("SN"),
        "Geant2012" => Some("GE"),
        "Ntt" => Some("NT"),
        "DeutscheTelekom" => Some("DT"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct TopologyRow {
    name: String,
    nodes: usize,
}

/// Number of nodes of each substrate topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologySizes {
    sizes: HashMap<String, usize>,
}

impl Default for TopologySizes {
    fn default() -> Self {
        Self::new(vec![
            ("DeutscheTelekom", 39),
            ("Geant2012", 40),
            ("Ntt", 47),
            ("Uunet", 49),
            ("Surfnet", 50),
        ])
    }
}

impl TopologySizes {
    pub fn new<I, N>(sizes: I) -> Self
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        Self {
            sizes: sizes
                .into_iter()
                .map(|(name, nodes)| (name.into(), nodes))
                .collect(),
        }
    }

    /// Loads a `name,nodes` CSV file (with header).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Report> {
        let path = path.as_ref();
        let file = File::open(path).wrap_err_with(|| {
            format!("open topology sizes {}", path.display())
        })?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        let mut sizes = HashMap::new();
        for record in reader.deserialize() {
            let row: TopologyRow = record.wrap_err("parse topology size")?;
            sizes.insert(row.name, row.nodes);
        }
        Ok(Self { sizes })
    }

    pub fn nodes(&self, topology: &str) -> Option<usize> {
        self.sizes.get(topology).copied()
    }

    /// Sorts topology axis values by node count and returns their labels.
    /// Unknown or unlabeled topologies are configuration errors.
    pub fn order_axis(
        &self,
        values: &mut Vec<ParamValue>,
    ) -> Result<Vec<String>, Report> {
        let mut keyed = Vec::with_capacity(values.len());
        for value in values.drain(..) {
            let name = match value.as_str() {
                Some(name) => name,
                None => eyre::bail!("topology {} is not a name", value),
            };
            let nodes = match self.nodes(name) {
                Some(nodes) => nodes,
                None => eyre::bail!("unknown size of topology {:?}", name),
            };
            keyed.push((nodes, value));
        }
        // stable: equal sizes keep their (sorted) order
        keyed.sort_by_key(|(nodes, _)| *nodes);

        let mut labels = Vec::with_capacity(keyed.len());
        for (_, value) in keyed {
            let label = value.as_str().and_then(short_name).ok_or_else(|| {
                eyre::eyre!("no short name for topology {}", value)
            })?;
            labels.push(label.to_string());
            values.push(value);
        }
        Ok(labels)
    }
}
