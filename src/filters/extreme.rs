//! Sliding-window min/max along a single axis.
//!
//! Each 1-D line parallel to the axis is rewritten in place with the
//! extreme of every window `[i - dist, i + dist]`, clamped to the line.
//! Near the ends the window simply shrinks: no padding value is ever
//! introduced.
//!
//! The scan reads every raw value once into a ring buffer of the last
//! `2 * dist + 1` samples and writes the result `dist` positions behind the
//! read cursor, so no raw value is overwritten before it has been buffered.
//!
//! Unordered samples (float NaN) propagate: any window holding one yields
//! it, wherever it sits in the window.

use std::cmp::Ordering;
use std::collections::VecDeque;

use ndarray::{ArrayBase, ArrayViewMut1, Axis, DataMut, Dimension};
use tracing::trace;

use crate::error::{Error, Result};
use crate::parallel::for_each_line;

/// Element types the extreme filters accept.
pub trait Sample: Copy + PartialOrd + Send + Sync {}

impl<T: Copy + PartialOrd + Send + Sync> Sample for T {}

/// Reduction strategy for the extreme filters.
///
/// Implemented by the zero-sized [`Min`] and [`Max`] markers so the
/// reduction is resolved at compile time.
pub trait Extremum: Send + Sync {
    /// Operator name, used in log output.
    const NAME: &'static str;

    /// Pick the extreme of two samples. An unordered sample wins.
    fn select<T: PartialOrd>(a: T, b: T) -> T;
}

/// True for samples that do not compare equal to themselves (NaN).
#[inline]
fn is_unordered<T: PartialOrd>(x: &T) -> bool {
    x.partial_cmp(x).is_none()
}

/// Resolve a pair that `partial_cmp` could not order.
#[inline]
fn pick_unordered<T: PartialOrd>(a: T, b: T) -> T {
    if is_unordered(&a) {
        a
    } else {
        b
    }
}

/// Minimum filter (erosion).
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

/// Maximum filter (dilation).
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Extremum for Min {
    const NAME: &'static str = "min";

    #[inline]
    fn select<T: PartialOrd>(a: T, b: T) -> T {
        match a.partial_cmp(&b) {
            Some(Ordering::Greater) => b,
            Some(_) => a,
            None => pick_unordered(a, b),
        }
    }
}

impl Extremum for Max {
    const NAME: &'static str = "max";

    #[inline]
    fn select<T: PartialOrd>(a: T, b: T) -> T {
        match a.partial_cmp(&b) {
            Some(Ordering::Less) => b,
            Some(_) => a,
            None => pick_unordered(a, b),
        }
    }
}

/// Window size `2 * dist + 1` for a radius, `None` when it overflows.
#[inline]
pub fn window_size(dist: usize) -> Option<usize> {
    dist.checked_mul(2).and_then(|w| w.checked_add(1))
}

/// Check that a radius is usable.
pub fn check_radius(dist: usize) -> Result<()> {
    if dist == 0 {
        return Err(Error::InvalidRadius { dist });
    }
    Ok(())
}

/// Check that an axis of length `len` can hold a full window.
///
/// Returns the window size. A window too large for `usize` reports
/// `window: usize::MAX`.
pub fn check_axis_len(axis: usize, len: usize, dist: usize) -> Result<usize> {
    match window_size(dist) {
        Some(window) if len >= window => Ok(window),
        window => Err(Error::AxisTooShort {
            axis,
            len,
            window: window.unwrap_or(usize::MAX),
        }),
    }
}

/// Filter one 1-D line in place.
///
/// # Arguments
/// * `line` - Samples to filter, any stride
/// * `dist` - Window half-width, at least 1
///
/// # Errors
/// `InvalidRadius` when `dist == 0`, `AxisTooShort` when the line holds
/// fewer than `2 * dist + 1` samples.
pub fn filter_line<E, T>(line: ArrayViewMut1<'_, T>, dist: usize) -> Result<()>
where
    E: Extremum,
    T: Sample,
{
    check_radius(dist)?;
    let window = check_axis_len(0, line.len(), dist)?;
    sweep_line::<E, T>(line, dist, window);
    Ok(())
}

/// Filter every line of `array` parallel to `axis`, in place.
///
/// # Arguments
/// * `array` - Array to filter
/// * `axis` - Zero-based axis index
/// * `dist` - Window half-width, at least 1
///
/// # Errors
/// `InvalidRegion` for an axis outside the array, `InvalidRadius` for
/// `dist == 0`, `AxisTooShort` when the axis is shorter than the window.
/// Nothing is written when an error is returned.
pub fn filter_axis<E, S, D>(array: &mut ArrayBase<S, D>, axis: usize, dist: usize) -> Result<()>
where
    E: Extremum,
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    let ndim = array.ndim();
    if axis >= ndim {
        return Err(Error::InvalidRegion { axis, ndim });
    }
    check_radius(dist)?;
    let window = check_axis_len(axis, array.len_of(Axis(axis)), dist)?;

    filter_axis_unchecked::<E, S, D>(array, axis, dist, window);
    Ok(())
}

/// Axis pass without parameter checks; `window` must come from [`check_axis_len`].
pub(crate) fn filter_axis_unchecked<E, S, D>(
    array: &mut ArrayBase<S, D>,
    axis: usize,
    dist: usize,
    window: usize,
) where
    E: Extremum,
    S: DataMut,
    S::Elem: Sample,
    D: Dimension,
{
    trace!(
        op = E::NAME,
        axis,
        dist,
        len = array.len_of(Axis(axis)),
        "axis pass"
    );
    for_each_line(array, Axis(axis), |line| {
        sweep_line::<E, S::Elem>(line, dist, window)
    });
}

/// Extreme of a non-empty run of buffered samples.
#[inline]
fn reduce<E, T, I>(mut values: I) -> Option<T>
where
    E: Extremum,
    T: Sample,
    I: Iterator<Item = T>,
{
    let first = values.next()?;
    Some(values.fold(first, E::select))
}

/// Single left-to-right pass over a line of at least `window` samples,
/// where `window == 2 * dist + 1`.
fn sweep_line<E, T>(mut line: ArrayViewMut1<'_, T>, dist: usize, window: usize)
where
    E: Extremum,
    T: Sample,
{
    let len = line.len();
    debug_assert!(len >= window, "line of {} samples below window {}", len, window);

    let mut buffer: VecDeque<T> = VecDeque::with_capacity(window);
    buffer.extend(line.iter().take(window - 1).copied());

    // Head: window clipped on the left, raw values 0..=i+dist are buffered.
    for i in 0..dist {
        if let Some(v) = reduce::<E, T, _>(buffer.range(..=i + dist).copied()) {
            line[i] = v;
        }
    }

    // Body: full windows, written `dist` behind the read cursor.
    for j in window - 1..len {
        if buffer.len() == window {
            buffer.pop_front();
        }
        buffer.push_back(line[j]);
        if let Some(v) = reduce::<E, T, _>(buffer.iter().copied()) {
            line[j - dist] = v;
        }
    }

    // Tail: window clipped on the right, buffer holds raw values len-window..len.
    for k in 0..dist {
        if let Some(v) = reduce::<E, T, _>(buffer.range(k + 1..).copied()) {
            line[len - dist + k] = v;
        }
    }
}
