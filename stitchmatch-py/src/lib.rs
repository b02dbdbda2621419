//! Python bindings for the stitchmatch overlap search.
//!
//! Images cross the boundary as `(height, width, 4)` uint8 numpy arrays.

use numpy::{PyArray1, PyArray3, PyArrayMethods, PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use stitchmatch::{
    from_fn, Attempt as RustAttempt, MatchConfig as RustMatchConfig, OverlapSearch, RasterView,
    SearchEvent, SearchOutcome as RustSearchOutcome, StitchMatchError,
};

/// Convert a StitchMatchError to a Python exception.
fn to_py_err(err: StitchMatchError) -> PyErr {
    match err {
        StitchMatchError::WorkerPanicked | StitchMatchError::ImageIo { .. } => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Borrow an RGBA array as a raster view.
fn rgba_view<'a>(array: &'a PyReadonlyArray3<'_, u8>) -> PyResult<RasterView<'a>> {
    let shape = array.shape();
    if shape[2] != 4 {
        return Err(PyValueError::new_err(format!(
            "expected an array of shape (height, width, 4), got {shape:?}"
        )));
    }
    let data = array.as_slice()?;
    RasterView::from_slice(data, shape[1], shape[0]).map_err(to_py_err)
}

/// One overlap attempt reported during a search.
#[pyclass]
#[derive(Clone)]
pub struct Attempt {
    /// Horizontal displacement of the lower image.
    #[pyo3(get)]
    pub x_offset: isize,
    /// Number of top-image rows overlapped by the lower image.
    #[pyo3(get)]
    pub y_offset: usize,
    /// Consecutive matching rows found so far.
    #[pyo3(get)]
    pub lines: usize,
}

#[pymethods]
impl Attempt {
    fn __repr__(&self) -> String {
        format!(
            "Attempt(x_offset={}, y_offset={}, lines={})",
            self.x_offset, self.y_offset, self.lines
        )
    }
}

impl From<RustAttempt> for Attempt {
    fn from(a: RustAttempt) -> Self {
        Self {
            x_offset: a.x_offset,
            y_offset: a.y_offset,
            lines: a.lines,
        }
    }
}

/// Result of a completed search.
#[pyclass]
#[derive(Clone)]
pub struct SearchOutcome {
    /// Deepest run of matching rows seen.
    #[pyo3(get)]
    pub best_lines: usize,
    /// Attempt that set the record, if any.
    #[pyo3(get)]
    pub best: Option<Attempt>,
    /// Number of candidate offsets evaluated.
    #[pyo3(get)]
    pub candidates_evaluated: usize,
    /// Whether the best depth reaches `min_matching_lines`.
    #[pyo3(get)]
    pub matched: bool,
}

#[pymethods]
impl SearchOutcome {
    fn __repr__(&self) -> String {
        let best = self
            .best
            .as_ref()
            .map_or_else(|| "None".to_string(), Attempt::__repr__);
        format!(
            "SearchOutcome(best_lines={}, best={}, candidates_evaluated={}, matched={})",
            self.best_lines,
            best,
            self.candidates_evaluated,
            if self.matched { "True" } else { "False" }
        )
    }
}

impl From<RustSearchOutcome> for SearchOutcome {
    fn from(outcome: RustSearchOutcome) -> Self {
        Self {
            best_lines: outcome.best_lines,
            best: outcome.best.map(Attempt::from),
            candidates_evaluated: outcome.candidates_evaluated,
            matched: outcome.matched().is_some(),
        }
    }
}

/// Configuration for the overlap search.
#[pyclass]
#[derive(Clone)]
pub struct MatchConfig {
    inner: RustMatchConfig,
}

#[pymethods]
impl MatchConfig {
    /// Create a new MatchConfig.
    ///
    /// Args:
    ///     provisional_match_width_factor: Share of the narrower width compared per row (default: 0.5)
    ///     min_matching_lines: Rows required to accept an overlap (default: 8)
    ///     max_horizontal_offset: Largest sideways shift tried, in pixels (default: 32)
    ///     max_y_offset_factor: Largest overlap relative to the top height (default: 1.0)
    ///     parallel: Use all cores in find_best (default: False)
    #[new]
    #[pyo3(signature = (
        provisional_match_width_factor = 0.5,
        min_matching_lines = 8,
        max_horizontal_offset = 32,
        max_y_offset_factor = 1.0,
        parallel = false
    ))]
    fn new(
        provisional_match_width_factor: f64,
        min_matching_lines: usize,
        max_horizontal_offset: usize,
        max_y_offset_factor: f64,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustMatchConfig {
            provisional_match_width_factor,
            min_matching_lines,
            max_horizontal_offset,
            max_y_offset_factor,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Validate the configuration.
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchConfig(provisional_match_width_factor={}, min_matching_lines={}, max_horizontal_offset={}, max_y_offset_factor={}, parallel={})",
            self.inner.provisional_match_width_factor,
            self.inner.min_matching_lines,
            self.inner.max_horizontal_offset,
            self.inner.max_y_offset_factor,
            if self.inner.parallel { "True" } else { "False" }
        )
    }
}

/// Overlap search bound to one configuration.
#[pyclass]
pub struct OverlapMatcher {
    inner: OverlapSearch,
}

#[pymethods]
impl OverlapMatcher {
    /// Args:
    ///     config: MatchConfig (default: MatchConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<MatchConfig>) -> Self {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        Self {
            inner: OverlapSearch::new(cfg),
        }
    }

    /// Run the full search, reporting every attempt.
    ///
    /// Args:
    ///     top: uint8 array (height x width x 4), the upper capture
    ///     bottom: uint8 array (height x width x 4), the lower capture
    ///     on_attempt: callable receiving each Attempt in order (optional)
    ///
    /// Returns:
    ///     SearchOutcome
    ///
    /// An exception raised by `on_attempt` stops further callbacks and is
    /// re-raised once the search has finished.
    #[pyo3(signature = (top, bottom, on_attempt = None))]
    fn run(
        &self,
        top: PyReadonlyArray3<'_, u8>,
        bottom: PyReadonlyArray3<'_, u8>,
        on_attempt: Option<Bound<'_, PyAny>>,
    ) -> PyResult<SearchOutcome> {
        let top = rgba_view(&top)?;
        let bottom = rgba_view(&bottom)?;
        let Some(callback) = on_attempt else {
            return self
                .inner
                .find_best(top, bottom)
                .map(SearchOutcome::from)
                .map_err(to_py_err);
        };

        let mut failure: Option<PyErr> = None;
        let mut sink = from_fn(|event| {
            if failure.is_some() {
                return;
            }
            if let SearchEvent::Attempt(attempt) = event {
                if let Err(err) = callback.call1((Attempt::from(attempt),)) {
                    failure = Some(err);
                }
            }
        });
        let outcome = self.inner.run(top, bottom, &mut sink).map_err(to_py_err)?;
        match failure {
            Some(err) => Err(err),
            None => Ok(outcome.into()),
        }
    }

    /// Search without progress reporting, in parallel if the config asks for it.
    fn find_best(
        &self,
        top: PyReadonlyArray3<'_, u8>,
        bottom: PyReadonlyArray3<'_, u8>,
    ) -> PyResult<SearchOutcome> {
        let top = rgba_view(&top)?;
        let bottom = rgba_view(&bottom)?;
        let outcome = self.inner.find_best(top, bottom).map_err(to_py_err)?;
        Ok(outcome.into())
    }

    fn __repr__(&self) -> String {
        "OverlapMatcher()".to_string()
    }
}

/// Convenience function to find the overlap of two captures.
///
/// Args:
///     top: uint8 array (height x width x 4), the upper capture
///     bottom: uint8 array (height x width x 4), the lower capture
///     min_matching_lines: Rows required to accept an overlap (default: 8)
///     max_horizontal_offset: Largest sideways shift tried, in pixels (default: 32)
///     parallel: Use all cores (default: False)
///
/// Returns:
///     The matching Attempt, or None when no overlap qualifies
#[pyfunction]
#[pyo3(signature = (top, bottom, min_matching_lines = 8, max_horizontal_offset = 32, parallel = false))]
fn find_overlap(
    top: PyReadonlyArray3<'_, u8>,
    bottom: PyReadonlyArray3<'_, u8>,
    min_matching_lines: usize,
    max_horizontal_offset: usize,
    parallel: bool,
) -> PyResult<Option<Attempt>> {
    let cfg = RustMatchConfig {
        min_matching_lines,
        max_horizontal_offset,
        parallel,
        ..RustMatchConfig::default()
    };
    let top = rgba_view(&top)?;
    let bottom = rgba_view(&bottom)?;
    let outcome = OverlapSearch::new(cfg)
        .find_best(top, bottom)
        .map_err(to_py_err)?;
    Ok(outcome.matched().map(Attempt::from))
}

/// Load an image file as a (height, width, 4) RGBA array.
#[pyfunction]
fn load_rgba<'py>(py: Python<'py>, path: &str) -> PyResult<Bound<'py, PyArray3<u8>>> {
    let image = stitchmatch::io::load_rgba_image(path).map_err(to_py_err)?;
    let (width, height) = (image.width(), image.height());
    let flat = PyArray1::from_vec(py, image.into_pixels());
    flat.reshape([height, width, 4])
}

/// Python module for stitchmatch overlap search.
#[pymodule]
fn _stitchmatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Attempt>()?;
    m.add_class::<SearchOutcome>()?;
    m.add_class::<MatchConfig>()?;
    m.add_class::<OverlapMatcher>()?;
    m.add_function(wrap_pyfunction!(find_overlap, m)?)?;
    m.add_function(wrap_pyfunction!(load_rgba, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
