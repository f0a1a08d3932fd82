use std::sync::Arc;

use tracing::warn;

use crate::foundation::core::{GroupId, InstanceId};
use crate::foundation::error::{PipeError, PipeResult};
use crate::ops::catalog::OperationCatalog;
use crate::params::blend::{BlendBlob, BlendParams};
use crate::params::block::ParamsBlob;
use crate::session::history::HistoryEntry;
use crate::session::instance::{ModuleInstance, VisibilityConfig, VisibilityState};

/// Colorspace a module operates in, derived from its pipeline position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// Before demosaic: single-channel sensor data.
    Raw,
    /// Between input and output color transforms.
    Lab,
    /// After the output color transform (and the fallback).
    Rgb,
}

/// One editing session: the ordered instance list plus its edit history.
///
/// The instance list is kept sorted by `(priority ascending, multi_priority
/// descending)` at all times; that order *is* the pipeline execution order.
/// Every edit operation appends a history entry snapshotting the edited
/// instance.
pub struct Session {
    catalog: Arc<OperationCatalog>,
    instances: Vec<ModuleInstance>,
    history: Vec<HistoryEntry>,
    config: VisibilityConfig,
    next_id: u32,
    next_group: u32,
}

fn pipeline_order(a: &ModuleInstance, b: &ModuleInstance) -> std::cmp::Ordering {
    a.descriptor
        .priority()
        .cmp(&b.descriptor.priority())
        .then(b.multi_priority.cmp(&a.multi_priority))
}

impl Session {
    /// Create a session with one instance of every registered operation.
    ///
    /// Instances that fail to initialize are skipped with a warning, the
    /// same partial-failure policy as catalog loading. `config` restores
    /// persisted visibility state when the session is GUI-attached; pass
    /// `None` for headless use.
    pub fn new(catalog: Arc<OperationCatalog>, config: Option<VisibilityConfig>) -> Self {
        let gui_attached = config.is_some();
        let mut session = Self {
            instances: Vec::with_capacity(catalog.len()),
            history: Vec::new(),
            config: config.unwrap_or_default(),
            next_id: 0,
            next_group: 0,
            catalog,
        };
        let descriptors: Vec<_> = session.catalog.iter_by_priority().cloned().collect();
        for descriptor in descriptors {
            let id = InstanceId(session.next_id);
            let group = GroupId(session.next_group);
            let cfg = gui_attached.then_some(&session.config);
            match ModuleInstance::instantiate(descriptor, id, group, cfg) {
                Ok(instance) => {
                    session.next_id += 1;
                    session.next_group += 1;
                    session.instances.push(instance);
                }
                Err(err) => warn!(%err, "skipping instance"),
            }
        }
        session.instances.sort_by(pipeline_order);
        session
    }

    /// The catalog this session draws descriptors from.
    pub fn catalog(&self) -> &Arc<OperationCatalog> {
        &self.catalog
    }

    /// Instances in pipeline execution order.
    pub fn instances(&self) -> &[ModuleInstance] {
        &self.instances
    }

    /// Recorded edit history, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Current visibility configuration.
    pub fn visibility_config(&self) -> &VisibilityConfig {
        &self.config
    }

    /// Look up an instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&ModuleInstance> {
        self.instances.iter().find(|m| m.id == id)
    }

    fn index_of(&self, id: InstanceId) -> PipeResult<usize> {
        self.instances
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| PipeError::validation("unknown instance id"))
    }

    fn push_history(&mut self, idx: usize) {
        let m = &self.instances[idx];
        self.history.push(HistoryEntry {
            instance: m.id,
            group: m.group,
            op: m.descriptor.op().to_string(),
            multi_priority: m.multi_priority,
            params: ParamsBlob::snapshot(m.descriptor.params_version(), &m.params),
            blend: BlendBlob::snapshot(&m.blend_params),
            enabled: m.enabled,
        });
    }

    /// Overwrite an instance's live parameters and record the edit.
    pub fn set_params(&mut self, id: InstanceId, bytes: &[u8]) -> PipeResult<()> {
        let idx = self.index_of(id)?;
        let m = &mut self.instances[idx];
        if bytes.len() != m.descriptor.params_size() {
            return Err(PipeError::validation(format!(
                "`{}` expects {} parameter bytes, got {}",
                m.descriptor.op(),
                m.descriptor.params_size(),
                bytes.len()
            )));
        }
        m.params.as_bytes_mut().copy_from_slice(bytes);
        self.push_history(idx);
        Ok(())
    }

    /// Overwrite an instance's blend record and record the edit.
    pub fn set_blend_params(&mut self, id: InstanceId, blend: BlendParams) -> PipeResult<()> {
        let idx = self.index_of(id)?;
        self.instances[idx].blend_params = blend;
        self.push_history(idx);
        Ok(())
    }

    /// Enable or disable an instance and record the edit.
    pub fn set_enabled(&mut self, id: InstanceId, enabled: bool) -> PipeResult<()> {
        let idx = self.index_of(id)?;
        self.instances[idx].enabled = enabled;
        self.push_history(idx);
        Ok(())
    }

    /// Restore an instance's parameters and blend record to the descriptor
    /// defaults and record the edit.
    pub fn reset(&mut self, id: InstanceId) -> PipeResult<()> {
        let idx = self.index_of(id)?;
        let m = &mut self.instances[idx];
        let defaults = m.default_params.clone();
        m.params.copy_from(&defaults)?;
        m.blend_params = m.default_blend;
        self.push_history(idx);
        Ok(())
    }

    /// Duplicate an instance into its group.
    ///
    /// The new instance sorts directly before its base (it takes the group's
    /// highest `multi_priority` plus one), starts disabled, and either copies
    /// the base's live parameters and blend record (`copy_params`) or
    /// re-initializes to descriptor defaults. A history entry records the
    /// creation.
    pub fn duplicate(&mut self, id: InstanceId, copy_params: bool) -> PipeResult<InstanceId> {
        let idx = self.index_of(id)?;
        let base = &self.instances[idx];
        if base.descriptor.flags().one_instance {
            return Err(PipeError::validation(format!(
                "`{}` allows only one instance",
                base.descriptor.op()
            )));
        }

        let group = base.group;
        let next_multi = self
            .instances
            .iter()
            .filter(|m| m.group == group)
            .map(|m| m.multi_priority)
            .max()
            .unwrap_or(0)
            + 1;

        let new_id = InstanceId(self.next_id);
        let mut module = ModuleInstance::instantiate(
            base.descriptor.clone(),
            new_id,
            group,
            Some(&self.config),
        )?;
        self.next_id += 1;
        module.multi_priority = next_multi;
        module.multi_name = next_multi.to_string();
        module.enabled = false;
        if copy_params {
            let base = &self.instances[idx];
            module.params.copy_from(&base.params)?;
            if base.descriptor.flags().supports_blending {
                module.blend_params = base.blend_params;
            }
        }

        self.instances.push(module);
        self.instances.sort_by(pipeline_order);
        let new_idx = self.index_of(new_id)?;
        self.push_history(new_idx);
        Ok(new_id)
    }

    /// Delete an instance from its group.
    ///
    /// Requires another instance of the same group to survive; deleting the
    /// last member is a no-op returning `false`. When the deleted instance
    /// held `multi_priority` 0, the successor is promoted to 0 and every
    /// history entry of the successor is rewritten accordingly, so replay
    /// stays consistent. The deleted instance's own history entries are
    /// removed.
    pub fn delete(&mut self, id: InstanceId) -> PipeResult<bool> {
        let idx = self.index_of(id)?;
        let group = self.instances[idx].group;

        // Prefer the next group member after the deleted one, else the
        // nearest one before it.
        let successor = self
            .instances
            .iter()
            .enumerate()
            .filter(|(i, m)| *i != idx && m.group == group)
            .map(|(i, m)| (i, m.id))
            .min_by_key(|(i, _)| if *i > idx { *i - idx } else { idx - *i + self.instances.len() });
        let Some((_, successor_id)) = successor else {
            return Ok(false);
        };

        let was_zero = self.instances[idx].multi_priority == 0;
        self.instances.remove(idx);
        self.history.retain(|h| h.instance != id);

        if was_zero {
            let s = self.index_of(successor_id)?;
            self.instances[s].multi_priority = 0;
            self.instances[s].multi_name.clear();
            for entry in self.history.iter_mut() {
                if entry.instance == successor_id {
                    entry.multi_priority = 0;
                }
            }
        }
        self.instances.sort_by(pipeline_order);
        Ok(true)
    }

    /// Move an instance one slot toward the start of the pipeline, swapping
    /// `multi_priority` with its same-group neighbor.
    ///
    /// Returns `false` when no neighbor exists. The swap is propagated into
    /// every history entry of either instance.
    pub fn move_up(&mut self, id: InstanceId) -> PipeResult<bool> {
        self.swap_with_neighbor(id, true)
    }

    /// Move an instance one slot toward the end of the pipeline; the mirror
    /// of [`Session::move_up`].
    pub fn move_down(&mut self, id: InstanceId) -> PipeResult<bool> {
        self.swap_with_neighbor(id, false)
    }

    fn swap_with_neighbor(&mut self, id: InstanceId, toward_start: bool) -> PipeResult<bool> {
        let idx = self.index_of(id)?;
        let group = self.instances[idx].group;
        let mine = self.instances[idx].multi_priority;

        // Earlier in the pipeline means a higher multi_priority within the
        // group (the sort is descending on multi_priority).
        let neighbor = self
            .instances
            .iter()
            .filter(|m| m.group == group && m.id != id)
            .filter(|m| {
                if toward_start {
                    m.multi_priority > mine
                } else {
                    m.multi_priority < mine
                }
            })
            .min_by_key(|m| (m.multi_priority - mine).abs())
            .map(|m| m.id);
        let Some(neighbor_id) = neighbor else {
            return Ok(false);
        };

        let n_idx = self.index_of(neighbor_id)?;
        let other = self.instances[n_idx].multi_priority;
        self.instances[idx].multi_priority = other;
        self.instances[n_idx].multi_priority = mine;

        for entry in self.history.iter_mut() {
            if entry.instance == id {
                entry.multi_priority = other;
            } else if entry.instance == neighbor_id {
                entry.multi_priority = mine;
            }
        }
        self.instances.sort_by(pipeline_order);
        Ok(true)
    }

    /// Set the UI visibility state, propagating to every instance of the
    /// same descriptor and persisting the flags in the session config.
    pub fn set_visibility(&mut self, id: InstanceId, state: VisibilityState) -> PipeResult<()> {
        let idx = self.index_of(id)?;
        let op = self.instances[idx].descriptor.op().to_string();
        for m in self.instances.iter_mut() {
            if m.descriptor.op() == op {
                m.state = state;
            }
        }
        self.config.set_state(&op, state);
        Ok(())
    }

    /// Classify the colorspace an instance operates in by comparing its
    /// priority against the demosaic / colorin / colorout landmarks.
    pub fn colorspace_of(&self, id: InstanceId) -> PipeResult<ColorSpace> {
        let idx = self.index_of(id)?;
        let priority = self.instances[idx].descriptor.priority();

        let landmark = |op: &str| {
            self.instances
                .iter()
                .find(|m| m.descriptor.op() == op)
                .map(|m| m.descriptor.priority())
        };
        let demosaic = landmark("demosaic");
        let colorin = landmark("colorin");
        let colorout = landmark("colorout");

        if let Some(colorout) = colorout
            && priority > colorout
        {
            return Ok(ColorSpace::Rgb);
        }
        if let Some(colorin) = colorin
            && priority > colorin
        {
            return Ok(ColorSpace::Lab);
        }
        if let Some(demosaic) = demosaic
            && priority < demosaic
        {
            return Ok(ColorSpace::Raw);
        }
        Ok(ColorSpace::Rgb)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/session.rs"]
mod tests;
