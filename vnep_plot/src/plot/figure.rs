use crate::plot::axes::Axes;
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct Figure<'a> {
    fig: &'a PyAny,
}

impl<'a> Figure<'a> {
    pub fn new(fig: &'a PyAny) -> Self {
        Self { fig }
    }

    pub fn fig(&self) -> &PyAny {
        self.fig
    }

    /// Adds a colorbar for `mappable` (e.g. the result of `Axes::pcolor`)
    /// next to `ax`.
    pub fn colorbar(
        &self,
        mappable: &PyAny,
        ax: &Axes<'_>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<&'a PyAny> {
        let kwargs = match kwargs {
            Some(kwargs) => kwargs,
            None => PyDict::new(self.fig.py()),
        };
        kwargs.set_item("ax", ax.ax())?;
        self.fig.call_method("colorbar", (mappable,), Some(kwargs))
    }
}
