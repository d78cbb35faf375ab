use vnep_eval::{McfResult, Resource};

fn loads<'a>(
    mcf: &'a McfResult,
    select: impl Fn(&Resource) -> bool + 'a,
) -> impl Iterator<Item = f64> + 'a {
    mcf.loads
        .iter()
        .filter(move |(resource, _)| select(resource))
        .map(|(_, load)| *load)
}

fn mean(values: impl Iterator<Item = f64>, what: &str) -> f64 {
    let (sum, count) = values.fold((0.0, 0), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 {
        tracing::warn!("[load] no {} loads in solution", what);
        return f64::NAN;
    }
    sum / count as f64
}

fn max(values: impl Iterator<Item = f64>, what: &str) -> f64 {
    let max = values.fold(None, |max: Option<f64>, value| {
        Some(max.map_or(value, |max| max.max(value)))
    });
    max.unwrap_or_else(|| {
        tracing::warn!("[load] no {} loads in solution", what);
        f64::NAN
    })
}

/// Average load over all nodes, in percent.
pub fn average_node_load(mcf: &McfResult) -> f64 {
    mean(loads(mcf, Resource::is_node), "node")
}

pub fn average_edge_load(mcf: &McfResult) -> f64 {
    mean(loads(mcf, Resource::is_edge), "edge")
}

pub fn max_node_load(mcf: &McfResult) -> f64 {
    max(loads(mcf, Resource::is_node), "node")
}

pub fn max_edge_load(mcf: &McfResult) -> f64 {
    max(loads(mcf, Resource::is_edge), "edge")
}

/// Average load over nodes and edges.
pub fn average_load(mcf: &McfResult) -> f64 {
    mean(loads(mcf, |_| true), "resource")
}

pub fn max_load(mcf: &McfResult) -> f64 {
    max(loads(mcf, |_| true), "resource")
}
