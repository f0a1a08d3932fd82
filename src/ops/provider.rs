//! The operation entry-point contract.
//!
//! An "operation unit" is whatever supplies one image operation to the host:
//! in the original architecture a shared library, here anything implementing
//! [`OperationProvider`]. The unit reports a raw [`EntryPoints`] table with
//! optional callbacks; registration binds a documented default for every
//! absent optional entry and rejects the unit if a mandatory entry is
//! missing. Binding happens once at load time and is never re-checked per
//! call.

use std::sync::Arc;

use crate::foundation::core::Roi;
use crate::foundation::error::PipeResult;
use crate::ops::simple::{SimpleUi, UiPanel};
use crate::params::blend::BlendParams;
use crate::params::block::ParamBlock;

/// Version tag of the running host. Units compiled against a different tag
/// are rejected at registration.
pub const HOST_VERSION: i32 = 1;

/// Capability flags of an operation kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpFlags {
    /// The operation participates in mask/opacity blending; its blend
    /// record contributes to the stage hash.
    pub supports_blending: bool,
    /// At most one live instance per session.
    pub one_instance: bool,
    /// No GUI at all; gui entry points are not required and never invoked.
    pub hidden: bool,
    /// Kept only to replay old edits; excluded from new-instance UI.
    pub deprecated: bool,
    /// The operation overrides the default output bytes-per-pixel.
    pub override_output_bpp: bool,
}

/// Result of an operation's `init` entry point: default parameters plus the
/// descriptor-level ordering key.
#[derive(Clone, Debug)]
pub struct OperationInit {
    /// Pipeline ordering key; must be non-zero (zero means "unset" and is a
    /// fatal registration error).
    pub priority: i32,
    /// Default parameter snapshot; its size fixes the block size for every
    /// instance of the descriptor.
    pub default_params: ParamBlock,
    /// Whether new instances start enabled.
    pub default_enabled: bool,
}

impl OperationInit {
    /// Empty seed handed to `init` chains before any defaults are filled.
    pub fn seed() -> Self {
        Self {
            priority: 0,
            default_params: ParamBlock::zeroed(0),
            default_enabled: false,
        }
    }
}

/// Memory-planning hints returned by a tiling callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilingHints {
    /// Peak memory use as a multiple of the in+out buffer size.
    pub factor: f32,
    /// Fixed overhead in bytes.
    pub overhead: usize,
    /// Required tile overlap in pixels.
    pub overlap: usize,
    /// Largest single intermediate buffer as a multiple of one buffer.
    pub maxbuf: f32,
}

impl Default for TilingHints {
    fn default() -> Self {
        Self {
            factor: 2.0,
            overhead: 0,
            overlap: 0,
            maxbuf: 1.0,
        }
    }
}

/// Everything a `process` callback may read while computing one stage.
pub struct ProcessContext<'a> {
    /// Committed, processing-ready parameter bytes baked by the commit path.
    pub committed: &'a [u8],
    /// Baked blend snapshot for this computation.
    pub blend: &'a BlendParams,
}

/// Core pixel-processing entry point.
pub type ProcessFn = Arc<
    dyn Fn(
            &ProcessContext<'_>,
            &[f32],
            &Roi,
            &mut [f32],
            &Roi,
        ) -> PipeResult<()>
        + Send
        + Sync,
>;

/// `init` entry point: transform a seeded [`OperationInit`] into the final
/// one. Simple-UI units get their packed defaults as the seed.
pub type InitFn = Arc<dyn Fn(OperationInit) -> OperationInit + Send + Sync>;

/// Translate live parameter bytes into the stage's processing-ready
/// representation. The default is a raw byte copy.
pub type CommitParamsFn = Arc<dyn Fn(&[u8], &mut Vec<u8>) + Send + Sync>;

/// ROI propagation in either direction. The default is pass-through.
pub type ModifyRoiFn = Arc<dyn Fn(&Roi) -> Roi + Send + Sync>;

/// Memory-bounded execution hints. The default assumes a plain in/out pair.
pub type TilingFn = Arc<dyn Fn(&Roi, &Roi) -> TilingHints + Send + Sync>;

/// Migrate a persisted parameter blob from `old_version` to the running
/// format. Absence means old blobs cannot be loaded.
pub type LegacyParamsFn = Arc<dyn Fn(&[u8], i32) -> PipeResult<Vec<u8>> + Send + Sync>;

/// Build the GUI panel model from current parameters.
pub type GuiInitFn = Arc<dyn Fn(&ParamBlock) -> UiPanel + Send + Sync>;

/// Refresh an existing panel model from current parameters.
pub type GuiUpdateFn = Arc<dyn Fn(&mut UiPanel, &ParamBlock) + Send + Sync>;

/// Map point coordinates through the operation's geometric distortion.
/// The default is the identity transform.
pub type DistortFn = Arc<dyn Fn(&mut [[f32; 2]]) + Send + Sync>;

/// Raw entry-point table reported by an operation unit.
///
/// `None` models an absent symbol; registration substitutes the documented
/// default or fails for mandatory entries.
#[derive(Clone, Default)]
pub struct EntryPoints {
    /// Human-readable operation name. Mandatory.
    pub name: Option<String>,
    /// Capability flags. Defaults to all-off.
    pub flags: Option<OpFlags>,
    /// Default-parameter/priority initializer. Mandatory unless
    /// `simple_ui` is declared (the synthesized init seeds it, and a
    /// present `init` chains after the seed).
    pub init: Option<InitFn>,
    /// Pixel processing. Mandatory.
    pub process: Option<ProcessFn>,
    /// Parameter commit translation. Defaults to a byte copy.
    pub commit_params: Option<CommitParamsFn>,
    /// Output→input ROI propagation. Defaults to pass-through.
    pub modify_roi_in: Option<ModifyRoiFn>,
    /// Input→output ROI propagation. Defaults to pass-through.
    pub modify_roi_out: Option<ModifyRoiFn>,
    /// Tiling hints. Defaults to [`TilingHints::default`].
    pub tiling: Option<TilingFn>,
    /// Output bytes-per-pixel override. Defaults to 4 floats.
    pub output_bpp: Option<usize>,
    /// Parameter-format migration. Optional; absence is meaningful.
    pub legacy_params: Option<LegacyParamsFn>,
    /// GUI panel construction. Mandatory unless `hidden` or `simple_ui`.
    pub gui_init: Option<GuiInitFn>,
    /// GUI panel refresh. Mandatory unless `hidden` or `simple_ui`.
    pub gui_update: Option<GuiUpdateFn>,
    /// Declarative UI alternative to `gui_init`/`gui_update`.
    pub simple_ui: Option<SimpleUi>,
    /// Forward distortion transform. Defaults to identity.
    pub distort_transform: Option<DistortFn>,
    /// Backward distortion transform. Defaults to identity.
    pub distort_backtransform: Option<DistortFn>,
    /// Operation tag bits. Defaults to 0.
    pub operation_tags: Option<u32>,
    /// Tag filter bits. Defaults to 0.
    pub operation_tags_filter: Option<u32>,
    /// Module-group bits for UI grouping. Defaults to 0 ("all").
    pub groups: Option<u32>,
}

/// A loadable operation unit.
///
/// Implementations stand in for the shared-library boundary: metadata is
/// mandatory and cheap, callbacks come through [`EntryPoints`].
pub trait OperationProvider: Send + Sync {
    /// Stable operation key, ≤ 19 bytes, used for lookup and persistence.
    fn op_key(&self) -> &str;

    /// Host build tag this unit was compiled against.
    fn host_version(&self) -> i32 {
        HOST_VERSION
    }

    /// Version of the unit's persisted parameter format.
    fn params_version(&self) -> i32;

    /// Report the raw entry-point table.
    fn entry_points(&self) -> EntryPoints;

    /// Catalog-lifetime initialization hook, run once after registration.
    fn init_global(&self) {}

    /// Catalog-lifetime cleanup hook, run at catalog teardown.
    fn cleanup_global(&self) {}

    /// Preset-registration hook, run once after `init_global`. Preset
    /// storage itself is an external collaborator.
    fn init_presets(&self) {}
}
