use crate::plot::axes::Axes;
use crate::plot::figure::Figure;
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct PyPlot<'p> {
    plt: &'p PyModule,
}

impl<'p> PyPlot<'p> {
    pub fn new(py: Python<'p>) -> PyResult<Self> {
        let plt = PyModule::import(py, "matplotlib.pyplot")?;
        Ok(Self { plt })
    }

    pub fn subplots(&self, kwargs: Option<&PyDict>) -> PyResult<(Figure<'p>, Axes<'p>)> {
        let result = self.plt.getattr("subplots")?.call((), kwargs)?;
        let (fig, ax): (&PyAny, &PyAny) = result.extract()?;
        Ok((Figure::new(fig), Axes::new(ax)))
    }

    pub fn savefig(&self, path: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.plt.getattr("savefig")?.call((path,), kwargs)?;
        Ok(())
    }

    pub fn show(&self) -> PyResult<()> {
        self.plt.getattr("show")?.call0()?;
        Ok(())
    }

    pub fn close(&self, figure: Figure<'_>) -> PyResult<()> {
        self.plt.getattr("close")?.call1((figure.fig(),))?;
        Ok(())
    }
}
