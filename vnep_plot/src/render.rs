use crate::distribution::{BoundEcdf, LoadEcdf, ObjectiveEcdf, Scatter};
use crate::heatmap::Heatmap;
use crate::output::Artifact;
use crate::temporal::TemporalPlot;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use serde::Serialize;
use std::path::PathBuf;

/// Draws aggregated plot data into an artifact. Whether the artifact is shown
/// or saved is up to each renderer.
pub trait Renderer {
    /// The file this renderer writes for `artifact`.
    fn target(&self, artifact: &Artifact) -> PathBuf {
        artifact.file.clone()
    }

    fn heatmap(
        &mut self,
        heatmap: &Heatmap,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;

    fn ecdf_load(
        &mut self,
        data: &LoadEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;

    fn ecdf_objective(
        &mut self,
        data: &ObjectiveEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;

    fn ecdf_bound(
        &mut self,
        data: &BoundEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;

    fn scatter(
        &mut self,
        data: &Scatter,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;

    fn temporal(
        &mut self,
        data: &TemporalPlot,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report>;
}

#[derive(Serialize)]
struct Document<'a, T> {
    title: &'a str,
    data: &'a T,
}

/// Writes the data of each plot as JSON next to where the figure would be.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    save: bool,
    written: usize,
}

impl JsonRenderer {
    pub fn new(save: bool) -> Self {
        Self { save, written: 0 }
    }

    /// Number of documents written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write<T: Serialize>(
        &mut self,
        data: &T,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        if !self.save {
            return Ok(());
        }
        std::fs::create_dir_all(&artifact.dir).wrap_err_with(|| {
            format!("create output directory {}", artifact.dir.display())
        })?;
        let path = self.target(artifact);
        let file = std::fs::File::create(&path)
            .wrap_err_with(|| format!("create {}", path.display()))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &Document { title, data })
            .wrap_err_with(|| format!("write {}", path.display()))?;
        tracing::debug!("[render] wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}

impl Renderer for JsonRenderer {
    fn target(&self, artifact: &Artifact) -> PathBuf {
        artifact.with_extension("json")
    }

    fn heatmap(
        &mut self,
        heatmap: &Heatmap,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(heatmap, title, artifact)
    }

    fn ecdf_load(
        &mut self,
        data: &LoadEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(data, title, artifact)
    }

    fn ecdf_objective(
        &mut self,
        data: &ObjectiveEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(data, title, artifact)
    }

    fn ecdf_bound(
        &mut self,
        data: &BoundEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(data, title, artifact)
    }

    fn scatter(
        &mut self,
        data: &Scatter,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(data, title, artifact)
    }

    fn temporal(
        &mut self,
        data: &TemporalPlot,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        self.write(data, title, artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Ecdf;
    use crate::distribution::ProfitSeries;
    use crate::output::OutputConfig;
    use crate::Algorithm;

    fn data() -> ObjectiveEcdf {
        ObjectiveEcdf {
            series: vec![ProfitSeries {
                algorithm: Algorithm::WoViol,
                ecdf: Ecdf::new(&[80.0, f64::NAN, 60.0]),
            }],
            max_observed_value: 80.0,
        }
    }

    #[test]
    fn json_document() {
        let output = OutputConfig {
            output_path: std::env::temp_dir()
                .join(format!("vnep_render_{}", std::process::id())),
            ..Default::default()
        };
        let artifact = output.artifact(None, "ECDF_objective", None);
        let mut renderer = JsonRenderer::new(true);
        renderer
            .ecdf_objective(&data(), "ECDF of Relative Achieved Profit", &artifact)
            .unwrap();
        assert_eq!(renderer.written(), 1);

        let path = renderer.target(&artifact);
        assert!(path.ends_with("ECDF_objective_no_filter.json"));
        let document: serde_json::Value =
            serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(document["title"], "ECDF of Relative Achieved Profit");
        let series = &document["data"]["series"][0];
        assert_eq!(series["algorithm"], "wo_viol");
        assert_eq!(series["ecdf"]["x"], serde_json::json!([60.0, 80.0]));
        assert_eq!(series["ecdf"]["y"], serde_json::json!([0.5, 1.0]));

        std::fs::remove_dir_all(&output.output_path).unwrap();
    }

    #[test]
    fn nothing_written_without_save() {
        let output = OutputConfig {
            output_path: std::env::temp_dir()
                .join(format!("vnep_render_nosave_{}", std::process::id())),
            ..Default::default()
        };
        let artifact = output.artifact(None, "ECDF_objective", None);
        let mut renderer = JsonRenderer::new(false);
        renderer.ecdf_objective(&data(), "title", &artifact).unwrap();
        assert_eq!(renderer.written(), 0);
        assert!(!artifact.dir.exists());
    }
}
