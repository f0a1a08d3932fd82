use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::core::{GroupId, InstanceId};
use crate::foundation::error::PipeResult;
use crate::ops::descriptor::ModuleDescriptor;
use crate::params::blend::BlendParams;
use crate::params::block::ParamBlock;

/// UI visibility of a module, shared by all instances of one descriptor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum VisibilityState {
    /// Not shown in the module list.
    #[default]
    Hidden,
    /// Shown in the module list.
    Active,
    /// Shown and pinned to the favorites group.
    Favorite,
}

/// Per-operation visibility flags restored from session configuration.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct VisibilityConfig {
    entries: BTreeMap<String, (bool, bool)>,
}

impl VisibilityConfig {
    /// Stored state for an operation key; unknown keys are hidden.
    pub fn state(&self, op: &str) -> VisibilityState {
        match self.entries.get(op) {
            Some((true, true)) => VisibilityState::Favorite,
            Some((true, false)) => VisibilityState::Active,
            _ => VisibilityState::Hidden,
        }
    }

    /// Persist the state for an operation key.
    pub fn set_state(&mut self, op: &str, state: VisibilityState) {
        let flags = match state {
            VisibilityState::Hidden => (false, false),
            VisibilityState::Active => (true, false),
            VisibilityState::Favorite => (true, true),
        };
        self.entries.insert(op.to_string(), flags);
    }

    /// Serialize for the external session-config store.
    pub fn to_json(&self) -> PipeResult<String> {
        serde_json::to_string(self).map_err(|e| anyhow::Error::new(e).into())
    }

    /// Restore from the external session-config store.
    pub fn from_json(json: &str) -> PipeResult<Self> {
        serde_json::from_str(json).map_err(|e| anyhow::Error::new(e).into())
    }
}

/// Scratch color-picker and histogram state of one instance, zeroed at
/// creation and owned by the GUI layer afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickerState {
    /// Mean of the last picked region.
    pub picked_color: [f32; 3],
    /// Per-channel minimum of the last picked region.
    pub picked_color_min: [f32; 3],
    /// Per-channel maximum of the last picked region.
    pub picked_color_max: [f32; 3],
    /// Histogram resolution requested by the module's GUI.
    pub histogram_bins: u32,
}

/// A live instance of a registered operation within one editing session.
///
/// Owns the live parameter bytes and blend record that edits mutate; the
/// pipeline never reads these directly, it bakes them into a stage first.
#[derive(Debug)]
pub struct ModuleInstance {
    pub(crate) id: InstanceId,
    pub(crate) descriptor: Arc<ModuleDescriptor>,
    pub(crate) params: ParamBlock,
    pub(crate) default_params: ParamBlock,
    pub(crate) blend_params: BlendParams,
    pub(crate) default_blend: BlendParams,
    pub(crate) enabled: bool,
    pub(crate) state: VisibilityState,
    pub(crate) group: GroupId,
    pub(crate) multi_priority: i32,
    pub(crate) multi_name: String,
    pub(crate) picker: PickerState,
}

impl ModuleInstance {
    /// Create a fresh instance of `descriptor`, re-running the operation's
    /// init chain so image-dependent defaults are recomputed per instance.
    ///
    /// Fails with [`crate::PipeError::InvalidDescriptor`] when init reports
    /// a zero priority or an empty parameter block.
    pub(crate) fn instantiate(
        descriptor: Arc<ModuleDescriptor>,
        id: InstanceId,
        group: GroupId,
        config: Option<&VisibilityConfig>,
    ) -> PipeResult<Self> {
        let init = descriptor.run_init()?;
        let state = config
            .map(|c| c.state(descriptor.op()))
            .unwrap_or_default();
        Ok(Self {
            id,
            params: init.default_params.clone(),
            default_params: init.default_params,
            blend_params: BlendParams::default(),
            default_blend: BlendParams::default(),
            enabled: init.default_enabled,
            state,
            group,
            multi_priority: 0,
            multi_name: String::new(),
            picker: PickerState::default(),
            descriptor,
        })
    }

    /// Session-unique instance id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The shared registration record this instance was derived from.
    pub fn descriptor(&self) -> &Arc<ModuleDescriptor> {
        &self.descriptor
    }

    /// Live parameter bytes.
    pub fn params(&self) -> &ParamBlock {
        &self.params
    }

    /// Live blend record.
    pub fn blend_params(&self) -> &BlendParams {
        &self.blend_params
    }

    /// Whether the instance currently contributes to the pipeline.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// UI visibility state.
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Instance group: all duplicates of one base share it.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Ordering key among same-group instances; 0 is the canonical member.
    pub fn multi_priority(&self) -> i32 {
        self.multi_priority
    }

    /// Display label of this instance; empty for the canonical member.
    pub fn multi_name(&self) -> &str {
        &self.multi_name
    }

    /// Color-picker and histogram scratch state.
    pub fn picker(&self) -> &PickerState {
        &self.picker
    }

    /// Panel title: operation name, suffixed with the instance label when
    /// one is set.
    pub fn panel_label(&self) -> String {
        if self.multi_name.is_empty() || self.multi_name == "0" {
            self.descriptor.name().to_string()
        } else {
            format!("{} {}", self.descriptor.name(), self.multi_name)
        }
    }
}
