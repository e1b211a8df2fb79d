//! Separable N-dimensional min/max filter.
//!
//! A box extreme over several axes is the composition of 1-D extremes, one
//! per axis. Each pass reads what the previous pass wrote, so passes run
//! strictly one after another in ascending axis order; only the lines
//! inside a single pass are independent.

use std::collections::BTreeSet;

use ndarray::{ArrayBase, DataMut, Dimension};
use tracing::debug;

use super::extreme::{
    check_axis_len, check_radius, filter_axis_unchecked, window_size, Extremum, Sample,
};
use crate::error::{Error, Result};

/// Set of axes a filter runs over.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Region {
    /// Every axis of the array.
    #[default]
    All,
    /// Explicit zero-based axis indices. Duplicates collapse.
    Axes(BTreeSet<usize>),
}

impl Region {
    /// Region over the given zero-based axes.
    pub fn axes<I: IntoIterator<Item = usize>>(axes: I) -> Self {
        Region::Axes(axes.into_iter().collect())
    }

    /// Resolve to ascending axis indices for an array of `ndim` axes.
    pub fn resolve(&self, ndim: usize) -> Result<Vec<usize>> {
        match self {
            Region::All => Ok((0..ndim).collect()),
            Region::Axes(axes) => {
                if let Some(&axis) = axes.iter().find(|&&axis| axis >= ndim) {
                    return Err(Error::InvalidRegion { axis, ndim });
                }
                Ok(axes.iter().copied().collect())
            }
        }
    }
}

/// Axes of `shape` that a pass will actually run over.
///
/// Axes of length 0 or 1 are identity passes and are dropped; every other
/// selected axis must hold a full window.
pub fn active_axes(shape: &[usize], region: &Region, dist: usize) -> Result<Vec<usize>> {
    check_radius(dist)?;
    let mut active = Vec::new();
    for axis in region.resolve(shape.len())? {
        let len = shape[axis];
        if len <= 1 {
            continue;
        }
        check_axis_len(axis, len, dist)?;
        active.push(axis);
    }
    Ok(active)
}

/// Apply the extreme filter `E` over every axis of `region`, in place.
///
/// # Arguments
/// * `array` - Array to filter
/// * `region` - Axes to filter over
/// * `dist` - Window half-width per axis
///
/// # Errors
/// Fails before writing anything if the region, radius, or any selected
/// axis length is invalid.
pub fn separable_filter<E, S, D>(
    array: &mut ArrayBase<S, D>,
    region: &Region,
    dist: usize,
) -> Result<()>
where
    E: Extremum,
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    let axes = active_axes(array.shape(), region, dist)?;
    debug!(op = E::NAME, ?axes, dist, "separable extreme filter");

    // Any active axis already proved the window fits in `usize`.
    let window = match window_size(dist) {
        Some(window) => window,
        None => return Ok(()),
    };
    for axis in axes {
        filter_axis_unchecked::<E, S, D>(array, axis, dist, window);
    }
    Ok(())
}
