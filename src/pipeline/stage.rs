use std::sync::Arc;

use crate::foundation::core::{InstanceId, PixelBuffer, Roi};
use crate::ops::descriptor::ModuleDescriptor;
use crate::params::blend::BlendParams;

/// Cached output of one completed stage run.
#[derive(Clone, Debug)]
pub(crate) struct StageCache {
    /// Stage hash the output was produced under.
    pub(crate) hash: u64,
    /// The produced pixels.
    pub(crate) output: PixelBuffer,
    /// Region the output covers.
    pub(crate) roi_out: Roi,
    /// Cleared when an upstream change or an abort makes the entry stale.
    pub(crate) valid: bool,
}

/// Per-pipeline runtime node of one module instance.
///
/// Holds the *baked* state for one computation: committed parameter bytes,
/// a blend snapshot and the content hash. Once baked, none of it changes
/// until the next commit, so concurrent edits to the live instance can never
/// be observed mid-computation.
pub struct PipelineStage {
    pub(crate) instance: InstanceId,
    pub(crate) descriptor: Arc<ModuleDescriptor>,
    pub(crate) committed: Vec<u8>,
    pub(crate) blend: BlendParams,
    pub(crate) enabled: bool,
    pub(crate) hash: u64,
    pub(crate) cache: Option<StageCache>,
}

impl PipelineStage {
    /// Create a stage for `instance`, with the committed slot initialized
    /// from the descriptor's default parameters.
    pub(crate) fn new(instance: InstanceId, descriptor: Arc<ModuleDescriptor>) -> Self {
        let mut committed = Vec::with_capacity(descriptor.params_size());
        (descriptor.callbacks().commit_params)(
            descriptor.default_params().as_bytes(),
            &mut committed,
        );
        Self {
            instance,
            descriptor,
            committed,
            blend: BlendParams::default(),
            enabled: false,
            hash: 0,
            cache: None,
        }
    }

    /// Instance this stage is bound to.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Descriptor of the bound instance.
    pub fn descriptor(&self) -> &Arc<ModuleDescriptor> {
        &self.descriptor
    }

    /// Content hash of the last commit; 0 for a disabled stage.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Enabled snapshot of the last commit.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Baked blend snapshot of the last commit.
    pub fn blend(&self) -> &BlendParams {
        &self.blend
    }

    /// Committed, processing-ready parameter bytes.
    pub fn committed(&self) -> &[u8] {
        &self.committed
    }

    /// Return `true` when a valid cached output exists for the current hash.
    ///
    /// Hash 0 means "no computation occurred" and never matches a cache
    /// entry, so a disabled stage can never serve stale pixels.
    pub fn cache_matches(&self) -> bool {
        self.hash != 0
            && self
                .cache
                .as_ref()
                .is_some_and(|c| c.valid && c.hash == self.hash)
    }

    /// Mark any cached output stale.
    pub(crate) fn invalidate_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.valid = false;
        }
    }
}

impl std::fmt::Debug for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStage")
            .field("instance", &self.instance)
            .field("op", &self.descriptor.op())
            .field("enabled", &self.enabled)
            .field("hash", &self.hash)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
