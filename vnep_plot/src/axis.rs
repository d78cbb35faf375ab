use serde::{Deserialize, Serialize};

/// The parameters shown on the axes of a heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub x_axis_parameter: String,
    pub y_axis_parameter: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Folder of the heatmaps with these axes.
    pub foldername: String,
}

impl AxisSpec {
    pub fn new(
        x_axis_parameter: &str,
        y_axis_parameter: &str,
        x_axis_title: &str,
        y_axis_title: &str,
        foldername: &str,
    ) -> Self {
        Self {
            x_axis_parameter: x_axis_parameter.to_string(),
            y_axis_parameter: y_axis_parameter.to_string(),
            x_axis_title: x_axis_title.to_string(),
            y_axis_title: y_axis_title.to_string(),
            foldername: foldername.to_string(),
        }
    }

    pub fn parameters(&self) -> [&str; 2] {
        [&self.x_axis_parameter, &self.y_axis_parameter]
    }
}

pub fn all_axes() -> Vec<AxisSpec> {
    vec![
        AxisSpec::new(
            "number_of_requests",
            "edge_resource_factor",
            "Number of Requests",
            "Edge Resource Factor",
            "AXES_NO_REQ_vs_EDGE_RF",
        ),
        AxisSpec::new(
            "node_resource_factor",
            "edge_resource_factor",
            "Node Resource Factor",
            "Edge Resource Factor",
            "AXES_RESOURCES",
        ),
        AxisSpec::new(
            "number_of_requests",
            "node_resource_factor",
            "Number of Requests",
            "Node Resource Factor",
            "AXES_NO_REQ_vs_NODE_RF",
        ),
        AxisSpec::new(
            "number_of_requests",
            "topology",
            "Number of Requests",
            "Substrate",
            "AXES_NO_REQ_vs_SUBSTRATES",
        ),
        AxisSpec::new(
            "edge_resource_factor",
            "topology",
            "Edge Resource Factor",
            "Substrate",
            "AXES_EDGE_RF_vs_SUBSTRATES",
        ),
        AxisSpec::new(
            "node_resource_factor",
            "topology",
            "Node Resource Factor",
            "Substrate",
            "AXES_NODE_RF_vs_SUBSTRATES",
        ),
    ]
}
