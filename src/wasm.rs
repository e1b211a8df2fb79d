//! WebAssembly exports for MorphStag filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffers
//!
//! Arrays cross the boundary as a flat, row-major buffer plus its shape.
//! `region` lists the zero-based axes to filter over; an empty list means
//! every axis. Errors come back as JavaScript exceptions carrying the
//! error message.
//!
//! - **f32**: every operator
//! - **u8**: dilate and erode only, since the residual operators need
//!   signed headroom

use ndarray::{ArrayD, IxDyn};
use wasm_bindgen::prelude::*;

use crate::error::{Error, Result};
use crate::filters::extreme::Sample;
use crate::filters::morphology::{self, MorphologyParams};
use crate::filters::separable::Region;

fn to_array<T: Sample>(data: &[T], shape: &[u32]) -> Result<ArrayD<T>> {
    let shape: Vec<usize> = shape.iter().map(|&n| n as usize).collect();
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), data.to_vec())?)
}

fn to_params(region: &[u32], dist: u32) -> MorphologyParams {
    let region = if region.is_empty() {
        Region::All
    } else {
        Region::axes(region.iter().map(|&axis| axis as usize))
    };
    MorphologyParams {
        region,
        dist: dist as usize,
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run<T, F>(
    data: &[T],
    shape: &[u32],
    region: &[u32],
    dist: u32,
    op: F,
) -> std::result::Result<Vec<T>, JsValue>
where
    T: Sample,
    F: FnOnce(&ArrayD<T>, &MorphologyParams) -> Result<ArrayD<T>>,
{
    let input = to_array(data, shape).map_err(to_js)?;
    let result = op(&input, &to_params(region, dist)).map_err(to_js)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Dilate / Erode - f32
// ============================================================================

/// Dilate an f32 array.
///
/// # Arguments
/// * `data` - Flat row-major samples (length = product of `shape`)
/// * `shape` - Array shape
/// * `region` - Axes to filter over (empty = all)
/// * `dist` - Window half-width per axis
///
/// # Returns
/// Flat dilated samples with the same shape
#[wasm_bindgen]
pub fn dilate_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::dilate(a, p))
}

/// Erode an f32 array.
#[wasm_bindgen]
pub fn erode_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::erode(a, p))
}

// ============================================================================
// Dilate / Erode - u8
// ============================================================================

/// Dilate a u8 array.
#[wasm_bindgen]
pub fn dilate_u8_wasm(
    data: &[u8],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::dilate(a, p))
}

/// Erode a u8 array.
#[wasm_bindgen]
pub fn erode_u8_wasm(
    data: &[u8],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<u8>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::erode(a, p))
}

// ============================================================================
// Derived operators - f32
// ============================================================================

#[wasm_bindgen]
pub fn opening_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::opening(a, p))
}

#[wasm_bindgen]
pub fn closing_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::closing(a, p))
}

#[wasm_bindgen]
pub fn tophat_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::tophat(a, p))
}

#[wasm_bindgen]
pub fn bothat_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::bothat(a, p))
}

#[wasm_bindgen]
pub fn morphogradient_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::morphogradient(a, p))
}

#[wasm_bindgen]
pub fn morpholaplace_f32_wasm(
    data: &[f32],
    shape: &[u32],
    region: &[u32],
    dist: u32,
) -> std::result::Result<Vec<f32>, JsValue> {
    run(data, shape, region, dist, |a, p| morphology::morpholaplace(a, p))
}
