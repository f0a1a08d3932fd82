use std::sync::Arc;

use crate::foundation::error::{PipeError, PipeResult};
use crate::ops::provider::{
    CommitParamsFn, DistortFn, GuiInitFn, GuiUpdateFn, HOST_VERSION, InitFn, LegacyParamsFn,
    ModifyRoiFn, OpFlags, OperationInit, OperationProvider, ProcessFn, TilingFn, TilingHints,
};
use crate::ops::simple;
use crate::params::block::ParamBlock;

/// Longest accepted operation key, in bytes.
pub const MAX_OP_KEY_LEN: usize = 19;

/// Default output bytes-per-pixel: 4-channel float.
pub const DEFAULT_OUTPUT_BPP: usize = 4 * size_of::<f32>();

/// Fully-bound callback table of one registered operation.
///
/// Every optional entry point has been replaced by its documented default;
/// only entries whose absence is meaningful stay optional.
pub struct CallbackTable {
    /// Default-parameter/priority initializer.
    pub init: InitFn,
    /// Pixel processing.
    pub process: ProcessFn,
    /// Live-parameter → committed-data translation.
    pub commit_params: CommitParamsFn,
    /// Output→input ROI propagation.
    pub modify_roi_in: ModifyRoiFn,
    /// Input→output ROI propagation.
    pub modify_roi_out: ModifyRoiFn,
    /// Tiling hints for memory-bounded execution.
    pub tiling: TilingFn,
    /// Parameter migration; `None` means old blobs cannot be loaded.
    pub legacy_params: Option<LegacyParamsFn>,
    /// GUI panel construction; `None` only for hidden operations.
    pub gui_init: Option<GuiInitFn>,
    /// GUI panel refresh; `None` only for hidden operations.
    pub gui_update: Option<GuiUpdateFn>,
    /// Forward geometric distortion.
    pub distort_transform: DistortFn,
    /// Backward geometric distortion.
    pub distort_backtransform: DistortFn,
}

/// Immutable registration record of one operation kind.
///
/// Created once when the operation is discovered, shared read-only by every
/// instance derived from it, destroyed only at catalog teardown.
pub struct ModuleDescriptor {
    pub(crate) provider: Box<dyn OperationProvider>,
    op: String,
    name: String,
    flags: OpFlags,
    priority: i32,
    params_version: i32,
    params_size: usize,
    default_params: ParamBlock,
    default_enabled: bool,
    output_bpp: usize,
    operation_tags: u32,
    operation_tags_filter: u32,
    groups: u32,
    callbacks: CallbackTable,
}

impl ModuleDescriptor {
    /// Stable operation key.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capability flags.
    pub fn flags(&self) -> OpFlags {
        self.flags
    }

    /// Pipeline ordering key; lower runs earlier. Never zero.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Version of the persisted parameter format.
    pub fn params_version(&self) -> i32 {
        self.params_version
    }

    /// Fixed parameter-block size of every instance.
    pub fn params_size(&self) -> usize {
        self.params_size
    }

    /// Default parameter snapshot.
    pub fn default_params(&self) -> &ParamBlock {
        &self.default_params
    }

    /// Whether new instances start enabled.
    pub fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    /// Output bytes-per-pixel produced by the operation.
    pub fn output_bpp(&self) -> usize {
        self.output_bpp
    }

    /// Operation tag bits.
    pub fn operation_tags(&self) -> u32 {
        self.operation_tags
    }

    /// Tag filter bits.
    pub fn operation_tags_filter(&self) -> u32 {
        self.operation_tags_filter
    }

    /// Module-group bits for UI grouping.
    pub fn groups(&self) -> u32 {
        self.groups
    }

    /// Bound callback table.
    pub fn callbacks(&self) -> &CallbackTable {
        &self.callbacks
    }

    /// Run the bound init chain on a fresh seed and validate the result.
    pub(crate) fn run_init(&self) -> PipeResult<OperationInit> {
        let init = (self.callbacks.init)(OperationInit::seed());
        if init.priority == 0 {
            return Err(PipeError::invalid_descriptor(
                &self.op,
                "operation must set a non-zero priority",
            ));
        }
        if init.default_params.is_empty() {
            return Err(PipeError::invalid_descriptor(
                &self.op,
                "operation must have a parameter size > 0",
            ));
        }
        Ok(init)
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("op", &self.op)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("params_size", &self.params_size)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

fn missing(op: &str, entry: &'static str) -> PipeError {
    PipeError::MissingEntryPoint {
        op: op.to_string(),
        entry,
    }
}

/// Resolve an operation unit into an immutable [`ModuleDescriptor`].
///
/// Performs the version check, binds defaults for absent optional entry
/// points, synthesizes the simple-UI callbacks when declared, and validates
/// the registration invariants (non-zero priority, non-empty parameters,
/// bounded key length). Any failure releases the unit and registers nothing.
pub fn register(provider: Box<dyn OperationProvider>) -> PipeResult<Arc<ModuleDescriptor>> {
    let op = provider.op_key().to_string();
    if op.is_empty() || op.len() > MAX_OP_KEY_LEN {
        return Err(PipeError::invalid_descriptor(
            &op,
            format!("operation key must be 1..={MAX_OP_KEY_LEN} bytes"),
        ));
    }

    let unit_version = provider.host_version();
    if unit_version != HOST_VERSION {
        return Err(PipeError::VersionMismatch {
            op,
            unit: unit_version,
            host: HOST_VERSION,
        });
    }

    let ep = provider.entry_points();
    let name = ep.name.ok_or_else(|| missing(&op, "name"))?;
    let process = ep.process.ok_or_else(|| missing(&op, "process"))?;
    let flags = ep.flags.unwrap_or_default();

    // Bind init: a declared simple UI seeds packed defaults, a hand-written
    // init (when also present) chains after the seed.
    let init: InitFn = match (ep.simple_ui.clone(), ep.init) {
        (Some(ui), Some(original)) => {
            let seed = simple::synth_init(ui);
            Arc::new(move |s| original(seed(s)))
        }
        (Some(ui), None) => simple::synth_init(ui),
        (None, Some(original)) => original,
        (None, None) => return Err(missing(&op, "init")),
    };

    let (gui_init, gui_update): (Option<GuiInitFn>, Option<GuiUpdateFn>) =
        if let Some(ui) = ep.simple_ui {
            (
                Some(simple::synth_gui_init(op.clone(), ui.clone())),
                Some(simple::synth_gui_update(ui)),
            )
        } else {
            (ep.gui_init, ep.gui_update)
        };
    if !flags.hidden {
        if gui_init.is_none() {
            return Err(missing(&op, "gui_init"));
        }
        if gui_update.is_none() {
            return Err(missing(&op, "gui_update"));
        }
    }

    let callbacks = CallbackTable {
        init,
        process,
        commit_params: ep.commit_params.unwrap_or_else(|| {
            Arc::new(|params: &[u8], data: &mut Vec<u8>| {
                data.clear();
                data.extend_from_slice(params);
            })
        }),
        modify_roi_in: ep.modify_roi_in.unwrap_or_else(|| Arc::new(|roi| *roi)),
        modify_roi_out: ep.modify_roi_out.unwrap_or_else(|| Arc::new(|roi| *roi)),
        tiling: ep
            .tiling
            .unwrap_or_else(|| Arc::new(|_, _| TilingHints::default())),
        legacy_params: ep.legacy_params,
        gui_init,
        gui_update,
        distort_transform: ep.distort_transform.unwrap_or_else(|| Arc::new(|_| ())),
        distort_backtransform: ep
            .distort_backtransform
            .unwrap_or_else(|| Arc::new(|_| ())),
    };

    let mut descriptor = ModuleDescriptor {
        op,
        name,
        flags,
        priority: 0,
        params_version: provider.params_version(),
        params_size: 0,
        default_params: ParamBlock::zeroed(0),
        default_enabled: false,
        output_bpp: ep.output_bpp.unwrap_or(DEFAULT_OUTPUT_BPP),
        operation_tags: ep.operation_tags.unwrap_or(0),
        operation_tags_filter: ep.operation_tags_filter.unwrap_or(0),
        groups: ep.groups.unwrap_or(0),
        callbacks,
        provider,
    };

    let init = descriptor.run_init()?;
    descriptor.priority = init.priority;
    descriptor.params_size = init.default_params.len();
    descriptor.default_params = init.default_params;
    descriptor.default_enabled = init.default_enabled;

    Ok(Arc::new(descriptor))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/descriptor.rs"]
mod tests;
