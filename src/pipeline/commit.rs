use crate::foundation::math::Djb2_64;
use crate::pipeline::masks::MaskStore;
use crate::pipeline::stage::PipelineStage;
use crate::session::instance::ModuleInstance;

/// Bake an instance's live state into a pipeline stage.
///
/// Snapshots the enabled flag and blend record, translates the live
/// parameters into the stage's processing-ready representation through the
/// descriptor's `commit_params`, and recomputes the stage content hash over
/// exactly the inputs that affect pixel output:
///
/// 1. the live parameter bytes,
/// 2. the blend record, when the descriptor supports blending,
/// 3. the referenced mask-group geometry (empty when no mask is set).
///
/// A disabled stage commits nothing and gets hash 0, meaning "no
/// computation occurred". That value never collides with the hash of an
/// enabled stage: the parameter block is never empty, so at least one byte
/// is always folded in.
pub fn commit_params(instance: &ModuleInstance, stage: &mut PipelineStage, masks: &dyn MaskStore) {
    stage.enabled = instance.enabled();
    stage.hash = 0;
    if !stage.enabled {
        return;
    }

    let descriptor = instance.descriptor();
    let mut hasher = Djb2_64::new();
    hasher.write_bytes(instance.params().as_bytes());
    if descriptor.flags().supports_blending {
        hasher.write_bytes(&instance.blend_params().to_bytes());
    }
    hasher.write_bytes(&masks.geometry_bytes(instance.blend_params().mask_id));

    // In-flight computations read the stage copy, never the live instance.
    stage.blend = *instance.blend_params();
    (descriptor.callbacks().commit_params)(instance.params().as_bytes(), &mut stage.committed);
    stage.hash = hasher.finish();
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/commit.rs"]
mod tests;
