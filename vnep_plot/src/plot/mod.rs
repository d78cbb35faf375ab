// Turns a `PyResult` into an early `Report`, printing the python traceback.
macro_rules! pytry {
    ($py:expr, $e:expr) => {{
        match $e {
            Ok(value) => value,
            Err(e) => {
                e.print($py);
                color_eyre::eyre::bail!("python error: {}", e)
            }
        }
    }};
}

// Builds a `PyResult<&PyDict>` from `(key, value)` pairs.
macro_rules! pydict {
    ($py:expr, $($tup:expr),* $(,)?) => {{
        let dict = pyo3::types::PyDict::new($py);
        let mut result: pyo3::PyResult<&pyo3::types::PyDict> = Ok(dict);
        $(
            let (key, value) = $tup;
            if let Err(e) = dict.set_item(key, value) {
                result = Err(e);
            }
        )*
        result
    }};
}

pub mod axes;
pub mod figure;
pub mod pyplot;

use crate::distribution::{BoundEcdf, LoadEcdf, ObjectiveEcdf, Scatter};
use crate::fmt::PlotFmt;
use crate::heatmap::Heatmap;
use crate::output::Artifact;
use crate::render::Renderer;
use crate::temporal::TemporalPlot;
use axes::Axes;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use figure::Figure;
use pyo3::prelude::*;
use pyplot::PyPlot;

const TITLE_FONTSIZE: usize = 15;
const LABEL_FONTSIZE: usize = 14;
const LEGEND_FONTSIZE: usize = 11;

/// Draws figures with matplotlib.
#[derive(Debug, Clone)]
pub struct Matplotlib {
    show: bool,
    save: bool,
}

impl Matplotlib {
    pub fn new(show: bool, save: bool) -> Self {
        Self { show, save }
    }

    fn labels(&self, py: Python<'_>, ax: &Axes<'_>, x: &str, y: &str) -> Result<(), Report> {
        let kwargs = pytry!(py, pydict!(py, ("fontsize", LABEL_FONTSIZE)));
        pytry!(py, ax.set_xlabel(x, Some(kwargs)));
        pytry!(py, ax.set_ylabel(y, Some(kwargs)));
        Ok(())
    }

    fn title(&self, py: Python<'_>, ax: &Axes<'_>, title: &str) -> Result<(), Report> {
        let kwargs = pytry!(py, pydict!(py, ("fontsize", TITLE_FONTSIZE)));
        pytry!(py, ax.set_title(title, Some(kwargs)));
        Ok(())
    }

    fn legend(&self, py: Python<'_>, ax: &Axes<'_>, loc: &str) -> Result<(), Report> {
        let kwargs = pytry!(
            py,
            pydict!(py, ("loc", loc), ("fontsize", LEGEND_FONTSIZE))
        );
        pytry!(py, ax.legend(Some(kwargs)));
        Ok(())
    }

    fn finish(
        &self,
        py: Python<'_>,
        plt: &PyPlot<'_>,
        fig: Figure<'_>,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        if self.save {
            std::fs::create_dir_all(&artifact.dir).wrap_err_with(|| {
                format!("create output directory {}", artifact.dir.display())
            })?;
            let path = artifact.file.to_string_lossy();
            let kwargs = pytry!(py, pydict!(py, ("bbox_inches", "tight")));
            pytry!(py, plt.savefig(&path, Some(kwargs)));
            tracing::debug!("[plot] saved {}", path);
        }
        if self.show {
            pytry!(py, plt.show());
        }
        pytry!(py, plt.close(fig));
        Ok(())
    }
}

impl Renderer for Matplotlib {
    fn heatmap(
        &mut self,
        heatmap: &Heatmap,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (5.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));

            let kwargs = pytry!(
                py,
                pydict!(
                    py,
                    ("cmap", heatmap.cmap.as_str()),
                    ("vmin", heatmap.vmin),
                    ("vmax", heatmap.vmax)
                )
            );
            let mesh = pytry!(py, ax.pcolor(heatmap.values(), Some(kwargs)));

            // write each cell's label on it
            let kwargs = pytry!(
                py,
                pydict!(
                    py,
                    ("horizontalalignment", "center"),
                    ("verticalalignment", "center"),
                    ("fontsize", 9)
                )
            );
            for (y, row) in heatmap.cells.iter().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    let position = (x as f64 + 0.5, y as f64 + 0.5);
                    pytry!(py, ax.text(position.0, position.1, &cell.label, Some(kwargs)));
                }
            }

            let centers = |n: usize| (0..n).map(|i| i as f64 + 0.5).collect::<Vec<_>>();
            let kwargs = pytry!(py, pydict!(py, ("fontsize", LEGEND_FONTSIZE)));
            pytry!(py, ax.set_xticks(centers(heatmap.x_labels.len())));
            pytry!(py, ax.set_xticklabels(heatmap.x_labels.clone(), Some(kwargs)));
            pytry!(py, ax.set_yticks(centers(heatmap.y_labels.len())));
            pytry!(py, ax.set_yticklabels(heatmap.y_labels.clone(), Some(kwargs)));

            self.title(py, &ax, title)?;
            self.labels(py, &ax, &heatmap.x_axis_title, &heatmap.y_axis_title)?;

            let kwargs = pytry!(py, pydict!(py, ("ticks", heatmap.colorbar_ticks.clone())));
            pytry!(py, fig.colorbar(mesh, &ax, Some(kwargs)));
            self.finish(py, &plt, fig, artifact)
        })
    }

    fn ecdf_load(
        &mut self,
        data: &LoadEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (5.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));

            // solid node loads, dashed edge loads
            for series in &data.series {
                let color = PlotFmt::color(series.algorithm);
                let label = PlotFmt::math_label_name(series.algorithm);
                for (ecdf, linestyle, label) in [
                    (&series.node, "-", Some(label)),
                    (&series.edge, "--", None),
                ] {
                    let kwargs = pytry!(
                        py,
                        pydict!(py, ("color", color), ("linestyle", linestyle), ("linewidth", 2))
                    );
                    if let Some(label) = label {
                        pytry!(py, kwargs.set_item("label", label));
                    }
                    pytry!(py, ax.plot(ecdf.x.clone(), ecdf.y.clone(), None, Some(kwargs)));
                }
            }

            let kwargs = pytry!(py, pydict!(py, ("left", 0.0), ("right", data.max_observed_value * 1.05)));
            pytry!(py, ax.set_xlim(Some(kwargs)));
            pytry!(py, ax.grid(Some(pytry!(py, pydict!(py, ("linestyle", ":"))))));
            self.title(py, &ax, title)?;
            self.labels(py, &ax, "Maximum Load [%]", "ECDF")?;
            self.legend(py, &ax, "lower right")?;
            self.finish(py, &plt, fig, artifact)
        })
    }

    fn ecdf_objective(
        &mut self,
        data: &ObjectiveEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (5.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));

            for series in &data.series {
                let kwargs = pytry!(
                    py,
                    pydict!(
                        py,
                        ("color", PlotFmt::color(series.algorithm)),
                        ("label", PlotFmt::math_label_name(series.algorithm)),
                        ("linewidth", 2)
                    )
                );
                let ecdf = &series.ecdf;
                pytry!(py, ax.plot(ecdf.x.clone(), ecdf.y.clone(), None, Some(kwargs)));
            }

            pytry!(py, ax.grid(Some(pytry!(py, pydict!(py, ("linestyle", ":"))))));
            self.title(py, &ax, title)?;
            self.labels(py, &ax, "Relative Profit [%]", "ECDF")?;
            self.legend(py, &ax, "lower right")?;
            self.finish(py, &plt, fig, artifact)
        })
    }

    fn ecdf_bound(
        &mut self,
        data: &BoundEcdf,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (5.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));

            // dashed initial bounds, solid final bounds
            for series in &data.series {
                for (ecdf, linestyle, label) in [
                    (&series.initial, "--", None),
                    (&series.best, "-", Some(series.number_of_requests.to_string())),
                ] {
                    let kwargs = pytry!(
                        py,
                        pydict!(
                            py,
                            ("color", series.color),
                            ("linestyle", linestyle),
                            ("linewidth", 2)
                        )
                    );
                    if let Some(label) = label {
                        pytry!(py, kwargs.set_item("label", label));
                    }
                    pytry!(py, ax.plot(ecdf.x.clone(), ecdf.y.clone(), None, Some(kwargs)));
                }
            }

            pytry!(py, ax.set_xscale("log"));
            pytry!(py, ax.grid(Some(pytry!(py, pydict!(py, ("which", "both"), ("linestyle", ":"))))));
            self.title(py, &ax, title)?;
            self.labels(py, &ax, "Relative Dual Bound", "ECDF")?;
            self.legend(py, &ax, "lower right")?;
            self.finish(py, &plt, fig, artifact)
        })
    }

    fn scatter(
        &mut self,
        data: &Scatter,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (5.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));
            let inferno = pytry!(
                py,
                PyModule::import(py, "matplotlib.cm").and_then(|cm| cm.getattr("inferno"))
            );

            let colors = data
                .series
                .iter()
                .map(|series| series.edge_resource_factor_index)
                .max()
                .unwrap_or(0)
                + 2;
            for series in &data.series {
                let fraction = (series.edge_resource_factor_index + 1) as f64 / colors as f64;
                let color = pytry!(py, inferno.call1((fraction,)));
                let label = format!(
                    "{} / {}",
                    series.node_resource_factor, series.edge_resource_factor
                );
                let kwargs = pytry!(
                    py,
                    pydict!(
                        py,
                        ("color", color),
                        ("marker", PlotFmt::marker(data.algorithm)),
                        ("s", 8),
                        ("label", label)
                    )
                );
                pytry!(
                    py,
                    ax.scatter(
                        series.relative_profit.clone(),
                        series.max_load.clone(),
                        Some(kwargs)
                    )
                );
            }

            let [x_box, y_box] = data.bounding_box;
            let kwargs = pytry!(py, pydict!(py, ("left", x_box[0]), ("right", x_box[1])));
            pytry!(py, ax.set_xlim(Some(kwargs)));
            let kwargs = pytry!(py, pydict!(py, ("bottom", y_box[0]), ("top", y_box[1])));
            pytry!(py, ax.set_ylim(Some(kwargs)));
            pytry!(py, ax.grid(Some(pytry!(py, pydict!(py, ("linestyle", ":"))))));
            self.title(py, &ax, title)?;
            self.labels(py, &ax, "Relative Profit [%]", "Maximum Load [%]")?;
            self.legend(py, &ax, "upper left")?;
            self.finish(py, &plt, fig, artifact)
        })
    }

    fn temporal(
        &mut self,
        data: &TemporalPlot,
        title: &str,
        artifact: &Artifact,
    ) -> Result<(), Report> {
        Python::with_gil(|py| {
            let plt = pytry!(py, PyPlot::new(py));
            let kwargs = pytry!(py, pydict!(py, ("figsize", (10.0, 4.0))));
            let (fig, ax) = pytry!(py, plt.subplots(Some(kwargs)));

            for series in &data.series {
                let kwargs = pytry!(
                    py,
                    pydict!(
                        py,
                        ("color", series.color),
                        ("linestyle", "-"),
                        ("linewidth", series.linewidth),
                        ("label", series.label.as_str())
                    )
                );
                pytry!(
                    py,
                    ax.plot(data.times.clone(), series.values.clone(), None, Some(kwargs))
                );
            }

            pytry!(py, ax.set_xscale("log"));
            pytry!(py, ax.grid(Some(pytry!(py, pydict!(py, ("which", "both"), ("linestyle", ":"))))));
            self.title(py, &ax, title)?;
            self.labels(py, &ax, data.x_label, data.y_label)?;
            self.legend(py, &ax, "best")?;
            self.finish(py, &plt, fig, artifact)
        })
    }
}
