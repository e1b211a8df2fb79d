//! Filter modules for grayscale morphology.
//!
//! ## Supported Arrays
//!
//! Every filter works on `ndarray` arrays of any rank and memory layout:
//!
//! | Shape | Typical use |
//! |-------|-------------|
//! | (N,) | Signals, scan lines |
//! | (H, W) | Grayscale images |
//! | (D, H, W) | Volumes, image stacks |
//! | (H, W, C) | Multi-channel images, filtered over `[0, 1]` only |
//!
//! ## Architecture
//!
//! - **extreme** - 1-D sliding min/max, applied to every line along one axis
//! - **separable** - runs the 1-D pass over each axis of a region in turn
//! - **morphology** - dilate/erode and the operators composed from them

pub mod extreme;
pub mod morphology;
pub mod separable;
