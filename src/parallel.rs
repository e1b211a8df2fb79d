//! Compatibility layer for rayon/sequential execution.
//!
//! With the `parallel` feature, independent 1-D lines of an axis pass are
//! filtered on the rayon pool and independent dilate/erode pairs run through
//! `rayon::join`. Without it (e.g. for WASM builds) the same calls run
//! sequentially on the current thread.
//!
//! Both paths are covered by the unit tests; run the sequential one with
//! `cargo test --no-default-features`.

use ndarray::{ArrayBase, ArrayViewMut1, Axis, DataMut, Dimension, Zip};

/// Run `f` on every 1-D line of `array` parallel to `axis`.
///
/// Lines never share cells, so each call gets exclusive access to its lane.
pub fn for_each_line<S, D, F>(array: &mut ArrayBase<S, D>, axis: Axis, f: F)
where
    S: DataMut,
    S::Elem: Send + Sync,
    D: Dimension,
    F: Fn(ArrayViewMut1<'_, S::Elem>) + Send + Sync,
{
    let lanes = Zip::from(array.lanes_mut(axis));

    #[cfg(feature = "parallel")]
    lanes.par_for_each(f);

    #[cfg(not(feature = "parallel"))]
    lanes.for_each(f);
}

/// Evaluate two independent closures, in parallel when available.
pub fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    #[cfg(feature = "parallel")]
    {
        rayon::join(a, b)
    }

    #[cfg(not(feature = "parallel"))]
    {
        (a(), b())
    }
}
