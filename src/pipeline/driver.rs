use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::foundation::core::{PixelBuffer, Roi};
use crate::foundation::error::PipeResult;
use crate::ops::provider::ProcessContext;
use crate::pipeline::commit::commit_params;
use crate::pipeline::masks::MaskStore;
use crate::pipeline::stage::{PipelineStage, StageCache};
use crate::session::session::Session;

/// Which rendition of the image a pipeline computes.
///
/// Pipelines of different kinds are independent: they never share mutable
/// buffers and may run concurrently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineKind {
    /// Full-resolution export path.
    Full,
    /// Interactive preview.
    Preview,
    /// Small thumbnail.
    Thumbnail,
}

/// Cheap cancellation signal polled between stages.
///
/// Raising the flag makes an in-flight [`Pipeline::process`] abandon its
/// remaining stages at the next poll without corrupting upstream caches.
#[derive(Clone, Debug, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    /// Fresh, unraised flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear the flag for reuse.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Return `true` once cancellation was requested.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a pipeline run.
#[derive(Debug)]
pub enum PipelineOutput {
    /// All stages completed; the final buffer and its region.
    Complete(PixelBuffer, Roi),
    /// The abort flag was raised; remaining work was abandoned and the
    /// caches of unfinished stages were invalidated.
    Aborted,
}

/// An ordered chain of pipeline stages bound to one session.
///
/// Stages execute strictly in priority order; a stage never starts until its
/// upstream output and hash are final. Each stage keeps its last output
/// keyed by content hash, so an unchanged prefix of the chain is served from
/// cache.
pub struct Pipeline {
    kind: PipelineKind,
    stages: SmallVec<[PipelineStage; 16]>,
}

impl Pipeline {
    /// Build a pipeline from the session's ordered instance list and bake
    /// every stage.
    pub fn new(kind: PipelineKind, session: &Session, masks: &dyn MaskStore) -> Self {
        let mut pipeline = Self {
            kind,
            stages: SmallVec::new(),
        };
        pipeline.rebuild(session);
        pipeline.sync(session, masks);
        pipeline
    }

    /// Pipeline kind.
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    fn rebuild(&mut self, session: &Session) {
        self.stages = session
            .instances()
            .iter()
            .map(|m| PipelineStage::new(m.id(), m.descriptor().clone()))
            .collect();
        debug!(kind = ?self.kind, stages = self.stages.len(), "pipeline rebuilt");
    }

    /// Re-bake every stage from the session's live state.
    ///
    /// Rebuilds the stage chain when instances were added, removed or
    /// reordered. A stage whose hash changed invalidates its own cache and
    /// the cache of every stage downstream of it.
    pub fn sync(&mut self, session: &Session, masks: &dyn MaskStore) {
        let shape_changed = self.stages.len() != session.instances().len()
            || self
                .stages
                .iter()
                .zip(session.instances())
                .any(|(s, m)| s.instance != m.id());
        if shape_changed {
            self.rebuild(session);
        }

        let mut dirty = false;
        for stage in self.stages.iter_mut() {
            // The shape check above guarantees the instance exists.
            let Some(instance) = session.instance(stage.instance) else {
                continue;
            };
            let before = stage.hash;
            commit_params(instance, stage, masks);
            if dirty || stage.hash != before {
                stage.invalidate_cache();
                dirty = true;
            }
        }
    }

    /// Run the chain over `input`, which covers `roi_in`.
    ///
    /// Disabled stages pass their input through unchanged. Between stages
    /// the driver polls `abort` and, for non-preview pipelines, yields the
    /// processor so a higher-priority redraw can preempt a long export.
    pub fn process(
        &mut self,
        input: &PixelBuffer,
        roi_in: &Roi,
        abort: &AbortFlag,
    ) -> PipeResult<PipelineOutput> {
        let mut current = input.clone();
        let mut roi = *roi_in;
        // Cache entries are only good while every upstream stage was served
        // from cache as well; the first recomputation taints the rest of the
        // chain.
        let mut upstream_clean = true;

        for k in 0..self.stages.len() {
            if abort.is_raised() {
                self.invalidate_from(k);
                debug!(kind = ?self.kind, stage = k, "pipeline aborted");
                return Ok(PipelineOutput::Aborted);
            }
            if self.kind != PipelineKind::Preview {
                std::thread::yield_now();
            }

            let stage = &mut self.stages[k];
            if !stage.enabled {
                trace!(op = stage.descriptor.op(), "stage disabled, pass-through");
                continue;
            }

            if upstream_clean && stage.cache_matches() {
                let cache = stage.cache.as_ref().expect("cache_matches implies cache");
                current = cache.output.clone();
                roi = cache.roi_out;
                trace!(op = stage.descriptor.op(), hash = stage.hash, "stage cache hit");
                continue;
            }

            let roi_out = (stage.descriptor.callbacks().modify_roi_out)(&roi);
            let mut output = PixelBuffer::new(roi_out.width, roi_out.height);
            let ctx = ProcessContext {
                committed: &stage.committed,
                blend: &stage.blend,
            };
            let result = (stage.descriptor.callbacks().process)(
                &ctx,
                &current.data,
                &roi,
                &mut output.data,
                &roi_out,
            );
            if let Err(err) = result {
                self.invalidate_from(k);
                return Err(err);
            }

            let stage = &mut self.stages[k];
            stage.cache = Some(StageCache {
                hash: stage.hash,
                output: output.clone(),
                roi_out,
                valid: true,
            });
            upstream_clean = false;
            self.invalidate_from(k + 1);

            current = output;
            roi = roi_out;
        }

        Ok(PipelineOutput::Complete(current, roi))
    }

    /// Drop every cached stage output.
    ///
    /// A pipeline's caches are only meaningful for one input image; call
    /// this when the source buffer itself changes.
    pub fn invalidate_all(&mut self) {
        self.invalidate_from(0);
    }

    fn invalidate_from(&mut self, start: usize) {
        for stage in self.stages.iter_mut().skip(start) {
            stage.invalidate_cache();
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("kind", &self.kind)
            .field("stages", &self.stages.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
