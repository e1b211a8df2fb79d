//! Grayscale morphology: dilate, erode and the operators built from them.
//!
//! Dilation and erosion are separable box max/min filters over the axes of
//! a [`Region`], each axis window spanning `2 * dist + 1` samples and
//! shrinking at the array borders. Everything else is a composition:
//!
//! | Operator | Definition |
//! |----------|------------|
//! | opening | erode, then dilate |
//! | closing | dilate, then erode |
//! | tophat | input - opening |
//! | bothat | closing - input |
//! | morphogradient | dilate - erode |
//! | morpholaplace | dilate + erode - 2 * input |
//!
//! ## Arithmetic
//!
//! The derived operators use the element type's own `+` and `-`. Residuals
//! and the Laplacian can be negative and sums can exceed the input range,
//! so callers should pick a signed or floating point type wide enough for
//! the result. Unsigned inputs work for tophat, bothat and morphogradient,
//! whose results are never negative.

use std::ops::{Add, Sub};

use ndarray::{Array, ArrayBase, Data, DataMut, Dimension, Zip};
use tracing::debug;

use super::extreme::{Max, Min, Sample};
use super::separable::{separable_filter, Region};
use crate::error::Result;
use crate::parallel::join;

/// Element types the derived operators accept.
pub trait Arithmetic: Sample + Add<Output = Self> + Sub<Output = Self> {}

impl<T: Sample + Add<Output = T> + Sub<Output = T>> Arithmetic for T {}

/// Parameters shared by every morphology operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphologyParams {
    /// Axes to filter over
    pub region: Region,
    /// Window half-width per axis
    pub dist: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            region: Region::All,
            dist: 1,
        }
    }
}

impl MorphologyParams {
    /// Parameters over all axes with the given radius.
    pub fn new(dist: usize) -> Self {
        Self {
            dist,
            ..Self::default()
        }
    }

    /// Restrict filtering to the given zero-based axes.
    pub fn with_region<I: IntoIterator<Item = usize>>(mut self, axes: I) -> Self {
        self.region = Region::axes(axes);
        self
    }
}

// ============================================================================
// Dilate / Erode
// ============================================================================

/// Dilate in place (maximum over the box neighborhood).
///
/// # Errors
/// Parameter errors are reported before the array is modified.
pub fn dilate_in_place<'a, S, D>(
    array: &'a mut ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<&'a mut ArrayBase<S, D>>
where
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    separable_filter::<Max, S, D>(array, &params.region, params.dist)?;
    Ok(array)
}

/// Erode in place (minimum over the box neighborhood).
///
/// # Errors
/// Parameter errors are reported before the array is modified.
pub fn erode_in_place<'a, S, D>(
    array: &'a mut ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<&'a mut ArrayBase<S, D>>
where
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    separable_filter::<Min, S, D>(array, &params.region, params.dist)?;
    Ok(array)
}

/// Dilate a copy of `input`.
///
/// Bright regions grow by `dist` samples along every filtered axis.
pub fn dilate<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Sample,
    D: Dimension,
{
    let mut output = input.to_owned();
    dilate_in_place(&mut output, params)?;
    Ok(output)
}

/// Erode a copy of `input`.
///
/// Dark regions grow by `dist` samples along every filtered axis.
pub fn erode<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Sample,
    D: Dimension,
{
    let mut output = input.to_owned();
    erode_in_place(&mut output, params)?;
    Ok(output)
}

// ============================================================================
// Opening / Closing
// ============================================================================

/// Opening in place: erode, then dilate.
///
/// Removes bright features narrower than the window.
pub fn opening_in_place<'a, S, D>(
    array: &'a mut ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<&'a mut ArrayBase<S, D>>
where
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    erode_in_place(array, params)?;
    dilate_in_place(array, params)
}

/// Closing in place: dilate, then erode.
///
/// Fills dark features narrower than the window.
pub fn closing_in_place<'a, S, D>(
    array: &'a mut ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<&'a mut ArrayBase<S, D>>
where
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    dilate_in_place(array, params)?;
    erode_in_place(array, params)
}

/// Opening of a copy of `input`.
pub fn opening<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Sample,
    D: Dimension,
{
    let mut output = input.to_owned();
    opening_in_place(&mut output, params)?;
    Ok(output)
}

/// Closing of a copy of `input`.
pub fn closing<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Sample,
    D: Dimension,
{
    let mut output = input.to_owned();
    closing_in_place(&mut output, params)?;
    Ok(output)
}

// ============================================================================
// Residuals
// ============================================================================

/// White top-hat: `input - opening(input)`.
///
/// Isolates bright features smaller than the window. Never negative.
pub fn tophat<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Arithmetic,
    D: Dimension,
{
    debug!(op = "tophat", dist = params.dist);
    let mut output = opening(input, params)?;
    Zip::from(&mut output)
        .and(input)
        .for_each(|opened, &x| *opened = x - *opened);
    Ok(output)
}

/// Black top-hat: `closing(input) - input`.
///
/// Isolates dark features smaller than the window. Never negative.
pub fn bothat<S, D, T>(input: &ArrayBase<S, D>, params: &MorphologyParams) -> Result<Array<T, D>>
where
    S: Data<Elem = T>,
    T: Arithmetic,
    D: Dimension,
{
    debug!(op = "bothat", dist = params.dist);
    let mut output = closing(input, params)?;
    Zip::from(&mut output)
        .and(input)
        .for_each(|closed, &x| *closed = *closed - x);
    Ok(output)
}

/// Morphological gradient: `dilate(input) - erode(input)`.
pub fn morphogradient<S, D, T>(
    input: &ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<Array<T, D>>
where
    S: Data<Elem = T> + Sync,
    T: Arithmetic,
    D: Dimension,
{
    debug!(op = "morphogradient", dist = params.dist);
    let (dilated, eroded) = join(|| dilate(input, params), || erode(input, params));
    let mut output = dilated?;
    let eroded = eroded?;
    Zip::from(&mut output)
        .and(&eroded)
        .for_each(|d, &e| *d = *d - e);
    Ok(output)
}

/// Morphological Laplacian: `dilate(input) + erode(input) - 2 * input`.
///
/// Evaluated as `(dilate + erode) - input - input`.
pub fn morpholaplace<S, D, T>(
    input: &ArrayBase<S, D>,
    params: &MorphologyParams,
) -> Result<Array<T, D>>
where
    S: Data<Elem = T> + Sync,
    T: Arithmetic,
    D: Dimension,
{
    debug!(op = "morpholaplace", dist = params.dist);
    let (dilated, eroded) = join(|| dilate(input, params), || erode(input, params));
    let mut output = dilated?;
    let eroded = eroded?;
    Zip::from(&mut output)
        .and(&eroded)
        .and(input)
        .for_each(|d, &e, &x| *d = *d + e - x - x);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::{arr1, arr2, Array2};

    #[test]
    fn test_default_params() {
        let params = MorphologyParams::default();
        assert_eq!(params.dist, 1);
        assert_eq!(params.region, Region::All);
        assert_eq!(MorphologyParams::new(3).dist, 3);
    }

    #[test]
    fn test_dilate_keeps_input() {
        let img = arr1(&[5, 1, 5, 1, 5]);
        let result = dilate(&img, &MorphologyParams::default()).unwrap();
        assert_eq!(result, arr1(&[5, 5, 5, 5, 5]));
        assert_eq!(img, arr1(&[5, 1, 5, 1, 5]));
    }

    #[test]
    fn test_erode_in_place_returns_same_array() {
        let mut img = arr1(&[5, 1, 5, 1, 5]);
        let ptr = img.as_ptr();
        let out = erode_in_place(&mut img, &MorphologyParams::default()).unwrap();
        assert_eq!(out.as_ptr(), ptr);
        assert_eq!(img, arr1(&[1, 1, 1, 1, 1]));
    }

    #[test]
    fn test_dilate_spreads_bright_pixel() {
        let mut img = Array2::<f32>::zeros((5, 5));
        img[[2, 2]] = 0.8;

        let result = dilate(&img, &MorphologyParams::default()).unwrap();

        for ((y, x), &v) in result.indexed_iter() {
            let inside = (1..=3).contains(&y) && (1..=3).contains(&x);
            assert_eq!(v, if inside { 0.8 } else { 0.0 }, "at ({}, {})", y, x);
        }
    }

    #[test]
    fn test_opening_removes_bright_spot() {
        let mut img = Array2::<i32>::from_elem((7, 7), 5);
        img[[3, 3]] = 100;
        let result = opening(&img, &MorphologyParams::default()).unwrap();
        assert!(result.iter().all(|&v| v == 5));
    }

    #[test]
    fn test_closing_in_place_fills_dark_spot() {
        let mut img = Array2::<i32>::from_elem((7, 7), 100);
        img[[3, 3]] = 1;
        closing_in_place(&mut img, &MorphologyParams::default()).unwrap();
        assert!(img.iter().all(|&v| v == 100));
    }

    #[test]
    fn test_tophat_detects_bright_spot() {
        let mut img = Array2::<i32>::from_elem((7, 7), 5);
        img[[3, 3]] = 100;
        let result = tophat(&img, &MorphologyParams::default()).unwrap();
        assert_eq!(result[[3, 3]], 95);
        assert_eq!(result.iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_bothat_detects_dark_spot() {
        let mut img = Array2::<i32>::from_elem((7, 7), 100);
        img[[3, 3]] = 1;
        let result = bothat(&img, &MorphologyParams::default()).unwrap();
        assert_eq!(result[[3, 3]], 99);
        assert_eq!(result.iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn test_morphogradient_of_step() {
        let img = arr1(&[0u8, 0, 0, 10, 10, 10]);
        let result = morphogradient(&img, &MorphologyParams::default()).unwrap();
        assert_eq!(result, arr1(&[0u8, 0, 10, 10, 0, 0]));
    }

    #[test]
    fn test_morpholaplace_of_peak() {
        let img = arr1(&[0, 0, 9, 0, 0]);
        let result = morpholaplace(&img, &MorphologyParams::default()).unwrap();
        assert_eq!(result, arr1(&[0, 9, -9, 9, 0]));
    }

    #[test]
    fn test_region_restricts_rows() {
        let img = arr2(&[[0, 0, 0], [0, 4, 0], [0, 0, 0]]);
        let params = MorphologyParams::default().with_region([1]);
        let result = dilate(&img, &params).unwrap();
        assert_eq!(result, arr2(&[[0, 0, 0], [4, 4, 4], [0, 0, 0]]));
    }

    #[test]
    fn test_errors_propagate() {
        let img = arr1(&[1, 2, 3]);
        let err = tophat(&img, &MorphologyParams::new(2)).unwrap_err();
        assert!(matches!(err, Error::AxisTooShort { .. }));

        let err = morphogradient(&img, &MorphologyParams::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidRadius { .. }));

        let err = dilate(&img, &MorphologyParams::default().with_region([1])).unwrap_err();
        assert!(matches!(err, Error::InvalidRegion { axis: 1, ndim: 1 }));
    }

    #[test]
    fn test_failed_opening_in_place_leaves_input() {
        let mut img = arr2(&[[3, 1, 4, 1, 5], [9, 2, 6, 5, 3]]);
        let before = img.clone();
        assert!(opening_in_place(&mut img, &MorphologyParams::default()).is_err());
        assert_eq!(img, before);
    }
}
