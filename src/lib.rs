//! rawpipe is a non-destructive raw image processing pipeline core.
//!
//! The crate models the hard parts of a darkroom-style editor without its
//! GUI or storage layers:
//!
//! - Register operation units into an [`OperationCatalog`]
//! - Create a [`Session`] holding ordered, duplicable module instances
//! - Bind the session into a [`Pipeline`] whose stages cache their output
//!   by content hash
//! - Move pixels between differently sized and oriented buffers through the
//!   resampling engine in [`resample`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Shared primitives: regions, buffers, ids, errors, math.
pub mod foundation;
/// Operation registration and the descriptor catalog.
pub mod ops;
/// Parameter blocks, blend records and blob migration.
pub mod params;
/// Pipeline stages, parameter commit and the driver.
pub mod pipeline;
/// Stateless resampling algorithms.
pub mod resample;
/// Editing sessions and history.
pub mod session;

pub use crate::foundation::core::{
    GroupId, InstanceId, MaskId, Orientation, PixelBuffer, Rect, Roi,
};
pub use crate::foundation::error::{PipeError, PipeResult};

pub use crate::ops::catalog::OperationCatalog;
pub use crate::ops::descriptor::ModuleDescriptor;
pub use crate::ops::provider::{EntryPoints, OpFlags, OperationInit, OperationProvider};
pub use crate::params::blend::{BlendMode, BlendParams, MaskMode};
pub use crate::params::block::{ParamBlock, ParamsBlob};
pub use crate::pipeline::driver::{AbortFlag, Pipeline, PipelineKind, PipelineOutput};
pub use crate::pipeline::masks::{MaskStore, NoMasks};
pub use crate::resample::demosaic::BayerPattern;
pub use crate::resample::interp::InterpolationKernel;
pub use crate::session::instance::{ModuleInstance, PickerState, VisibilityConfig, VisibilityState};
pub use crate::session::session::{ColorSpace, Session};
