//! MorphStag
//!
//! Grayscale mathematical morphology on N-dimensional arrays, implemented in
//! Rust with optional Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Arrays
//! Filters take any `ndarray` array, of any rank and layout. A [`Region`]
//! selects the zero-based axes to filter over (default: all of them) and
//! `dist` sets the window half-width along each of those axes.
//!
//! ## Filter Architecture
//! Dilation and erosion are separable: a 1-D sliding max/min runs over each
//! selected axis in turn, rewriting the array in place. Opening, closing,
//! the top-hats, the gradient and the Laplacian are compositions of those
//! two plus elementwise arithmetic.
//!
//! ## Features
//! - `parallel` (default): lines of an axis pass run on the rayon pool.
//!   Build with `--no-default-features` for the sequential path used by
//!   WASM; `cargo test --no-default-features` runs the suite that way.
//! - `python`: PyO3/NumPy extension module.
//! - `wasm`: wasm-bindgen exports.
//!
//! ```
//! use ndarray::arr2;
//! use morphstag::{dilate, MorphologyParams};
//!
//! let image = arr2(&[[0, 0, 0], [0, 9, 0], [0, 0, 0]]);
//! let grown = dilate(&image, &MorphologyParams::default()).unwrap();
//! assert!(grown.iter().all(|&v| v == 9));
//! ```

pub mod error;
pub mod filters;
mod parallel;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use filters::extreme::{filter_axis, filter_line, Extremum, Max, Min, Sample};
pub use filters::morphology::{
    bothat, closing, closing_in_place, dilate, dilate_in_place, erode, erode_in_place,
    morphogradient, morpholaplace, opening, opening_in_place, tophat, Arithmetic,
    MorphologyParams,
};
pub use filters::separable::{separable_filter, Region};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{
        Element, IntoPyArray, PyArrayDyn, PyArrayMethods, PyUntypedArray, PyUntypedArrayMethods,
    };
    use pyo3::exceptions::{PyTypeError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::Error;
    use crate::filters::extreme::Sample;
    use crate::filters::morphology::{self, Arithmetic, MorphologyParams};
    use crate::filters::separable::Region;

    impl From<Error> for PyErr {
        fn from(err: Error) -> PyErr {
            match err {
                Error::TypeUnsupported(_) => PyTypeError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    /// Try each supported dtype in turn and evaluate `$body` for the first match.
    macro_rules! dispatch {
        ($image:expr, [$($t:ty),*], $array:ident => $body:expr) => {{
            $(
                if let Ok($array) = $image.downcast::<PyArrayDyn<$t>>() {
                    return $body;
                }
            )*
        }};
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Dilate,
        Erode,
        Opening,
        Closing,
        Tophat,
        Bothat,
        Gradient,
        Laplace,
    }

    fn params(region: Option<Vec<usize>>, dist: usize) -> MorphologyParams {
        MorphologyParams {
            region: region.map_or(Region::All, Region::axes),
            dist,
        }
    }

    fn unsupported(image: &Bound<'_, PyAny>) -> PyErr {
        let kind = match image.downcast::<PyUntypedArray>() {
            Ok(array) => format!("array of dtype {}", array.dtype()),
            Err(_) => format!("{}", image.get_type()),
        };
        Error::TypeUnsupported(kind).into()
    }

    fn filter_array<'py, T>(
        py: Python<'py>,
        image: &Bound<'py, PyArrayDyn<T>>,
        op: Op,
        params: &MorphologyParams,
    ) -> PyResult<Bound<'py, PyAny>>
    where
        T: Element + Arithmetic,
    {
        let input = image.readonly();
        let view = input.as_array();
        let result = match op {
            Op::Dilate => morphology::dilate(&view, params),
            Op::Erode => morphology::erode(&view, params),
            Op::Opening => morphology::opening(&view, params),
            Op::Closing => morphology::closing(&view, params),
            Op::Tophat => morphology::tophat(&view, params),
            Op::Bothat => morphology::bothat(&view, params),
            Op::Gradient => morphology::morphogradient(&view, params),
            Op::Laplace => morphology::morpholaplace(&view, params),
        }?;
        Ok(result.into_pyarray(py).into_any())
    }

    fn filter_array_in_place<T>(
        image: &Bound<'_, PyArrayDyn<T>>,
        op: Op,
        params: &MorphologyParams,
    ) -> PyResult<()>
    where
        T: Element + Sample,
    {
        let mut guard = image
            .try_readwrite()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let mut view = guard.as_array_mut();
        match op {
            Op::Dilate => morphology::dilate_in_place(&mut view, params).map(|_| ()),
            Op::Erode => morphology::erode_in_place(&mut view, params).map(|_| ()),
            Op::Opening => morphology::opening_in_place(&mut view, params).map(|_| ()),
            Op::Closing => morphology::closing_in_place(&mut view, params).map(|_| ()),
            other => {
                return Err(PyValueError::new_err(format!(
                    "{:?} has no in-place variant",
                    other
                )))
            }
        }?;
        Ok(())
    }

    fn apply<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        op: Op,
        params: MorphologyParams,
    ) -> PyResult<Bound<'py, PyAny>> {
        dispatch!(
            image,
            [f32, f64, i8, i16, i32, i64, u8, u16, u32, u64],
            array => filter_array(py, array, op, &params)
        );
        Err(unsupported(image))
    }

    fn apply_in_place<'py>(
        image: &Bound<'py, PyAny>,
        op: Op,
        params: MorphologyParams,
    ) -> PyResult<Bound<'py, PyAny>> {
        dispatch!(
            image,
            [f32, f64, i8, i16, i32, i64, u8, u16, u32, u64],
            array => filter_array_in_place(array, op, &params).map(|_| image.clone())
        );
        Err(unsupported(image))
    }

    // ========================================================================
    // Dilate / Erode
    // ========================================================================

    /// Dilate an array of any rank (maximum over a box of radius `dist`).
    ///
    /// # Arguments
    /// * `image` - NumPy array (float or integer dtype)
    /// * `region` - Zero-based axes to filter over (default: all)
    /// * `dist` - Window half-width per axis (default: 1)
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn dilate<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Dilate, params(region, dist))
    }

    /// Erode an array of any rank (minimum over a box of radius `dist`).
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn erode<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Erode, params(region, dist))
    }

    /// Dilate a writeable array in place and return it.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn dilate_in_place<'py>(
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply_in_place(image, Op::Dilate, params(region, dist))
    }

    /// Erode a writeable array in place and return it.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn erode_in_place<'py>(
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply_in_place(image, Op::Erode, params(region, dist))
    }

    // ========================================================================
    // Opening / Closing
    // ========================================================================

    /// Opening (erode, then dilate) of an array of any rank.
    ///
    /// Removes bright features narrower than the window.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn opening<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Opening, params(region, dist))
    }

    /// Closing (dilate, then erode) of an array of any rank.
    ///
    /// Fills dark features narrower than the window.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn closing<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Closing, params(region, dist))
    }

    /// Open a writeable array in place and return it.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn opening_in_place<'py>(
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply_in_place(image, Op::Opening, params(region, dist))
    }

    /// Close a writeable array in place and return it.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn closing_in_place<'py>(
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply_in_place(image, Op::Closing, params(region, dist))
    }

    // ========================================================================
    // Residuals
    // ========================================================================

    /// White top-hat (input - opening). Use a signed or float dtype for
    /// arithmetic headroom.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn tophat<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Tophat, params(region, dist))
    }

    /// Black top-hat (closing - input).
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn bothat<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Bothat, params(region, dist))
    }

    /// Morphological gradient (dilate - erode). Never negative.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn morphogradient<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Gradient, params(region, dist))
    }

    /// Morphological Laplacian (dilate + erode - 2 * input). Negative
    /// values need a signed or float dtype.
    #[pyfunction]
    #[pyo3(signature = (image, region=None, dist=1))]
    pub fn morpholaplace<'py>(
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        region: Option<Vec<usize>>,
        dist: usize,
    ) -> PyResult<Bound<'py, PyAny>> {
        apply(py, image, Op::Laplace, params(region, dist))
    }

    /// MorphStag Rust extension module
    #[pymodule]
    pub fn morphstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Dilate / erode
        m.add_function(wrap_pyfunction!(dilate, m)?)?;
        m.add_function(wrap_pyfunction!(erode, m)?)?;
        m.add_function(wrap_pyfunction!(dilate_in_place, m)?)?;
        m.add_function(wrap_pyfunction!(erode_in_place, m)?)?;

        // Opening / closing
        m.add_function(wrap_pyfunction!(opening, m)?)?;
        m.add_function(wrap_pyfunction!(closing, m)?)?;
        m.add_function(wrap_pyfunction!(opening_in_place, m)?)?;
        m.add_function(wrap_pyfunction!(closing_in_place, m)?)?;

        // Residuals
        m.add_function(wrap_pyfunction!(tophat, m)?)?;
        m.add_function(wrap_pyfunction!(bothat, m)?)?;
        m.add_function(wrap_pyfunction!(morphogradient, m)?)?;
        m.add_function(wrap_pyfunction!(morpholaplace, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::morphstag;
