//! Stateless resampling algorithms over explicit buffer descriptors.
//!
//! Pure functions, safe to invoke concurrently on disjoint outputs. The
//! float path delegates to a selectable interpolation kernel; the byte
//! paths are fixed 2x2-box fast approximations for previews and thumbnails;
//! the demosaic paths downscale mosaiced sensor data directly.

/// Fixed-kernel byte-buffer clip/zoom.
pub mod clip_zoom;
/// Mosaic-aware half-size demosaic downscale.
pub mod demosaic;
/// Orientation-aware byte-buffer flip and zoom-to-fit.
pub mod flip;
/// Selectable-kernel float resampling.
pub mod interp;
