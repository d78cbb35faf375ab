use pyo3::prelude::*;
use pyo3::types::PyDict;

pub struct Axes<'a> {
    ax: &'a PyAny,
}

impl<'a> Axes<'a> {
    pub fn new(ax: &'a PyAny) -> Self {
        Self { ax }
    }

    pub fn ax(&self) -> &'a PyAny {
        self.ax
    }

    pub fn set_title(&self, title: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("set_title", (title,), kwargs)?;
        Ok(())
    }

    pub fn set_xlabel(&self, label: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("set_xlabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_ylabel(&self, label: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("set_ylabel", (label,), kwargs)?;
        Ok(())
    }

    pub fn set_xticks<T>(&self, ticks: Vec<T>) -> PyResult<()>
    where
        T: IntoPy<PyObject>,
    {
        self.ax.call_method1("set_xticks", (ticks,))?;
        Ok(())
    }

    pub fn set_yticks<T>(&self, ticks: Vec<T>) -> PyResult<()>
    where
        T: IntoPy<PyObject>,
    {
        self.ax.call_method1("set_yticks", (ticks,))?;
        Ok(())
    }

    pub fn set_xticklabels<L>(&self, labels: Vec<L>, kwargs: Option<&PyDict>) -> PyResult<()>
    where
        L: IntoPy<PyObject>,
    {
        self.ax.call_method("set_xticklabels", (labels,), kwargs)?;
        Ok(())
    }

    pub fn set_yticklabels<L>(&self, labels: Vec<L>, kwargs: Option<&PyDict>) -> PyResult<()>
    where
        L: IntoPy<PyObject>,
    {
        self.ax.call_method("set_yticklabels", (labels,), kwargs)?;
        Ok(())
    }

    pub fn set_xscale(&self, value: &str) -> PyResult<()> {
        self.ax.call_method1("set_xscale", (value,))?;
        Ok(())
    }

    pub fn set_xlim(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("set_xlim", (), kwargs)?;
        Ok(())
    }

    pub fn set_ylim(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("set_ylim", (), kwargs)?;
        Ok(())
    }

    pub fn grid(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("grid", (true,), kwargs)?;
        Ok(())
    }

    pub fn legend(&self, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("legend", (), kwargs)?;
        Ok(())
    }

    pub fn plot<X, Y>(
        &self,
        x: Vec<X>,
        y: Vec<Y>,
        fmt: Option<&str>,
        kwargs: Option<&PyDict>,
    ) -> PyResult<()>
    where
        X: IntoPy<PyObject>,
        Y: IntoPy<PyObject>,
    {
        if let Some(fmt) = fmt {
            self.ax.call_method("plot", (x, y, fmt), kwargs)?;
        } else {
            self.ax.call_method("plot", (x, y), kwargs)?;
        };
        Ok(())
    }

    pub fn scatter<X, Y>(&self, x: Vec<X>, y: Vec<Y>, kwargs: Option<&PyDict>) -> PyResult<()>
    where
        X: IntoPy<PyObject>,
        Y: IntoPy<PyObject>,
    {
        self.ax.call_method("scatter", (x, y), kwargs)?;
        Ok(())
    }

    /// Colors a grid with one cell per value; returns the mappable needed
    /// by `Figure::colorbar`.
    pub fn pcolor(&self, values: Vec<Vec<f64>>, kwargs: Option<&PyDict>) -> PyResult<&'a PyAny> {
        self.ax.call_method("pcolor", (values,), kwargs)
    }

    pub fn text(&self, x: f64, y: f64, text: &str, kwargs: Option<&PyDict>) -> PyResult<()> {
        self.ax.call_method("text", (x, y, text), kwargs)?;
        Ok(())
    }
}
