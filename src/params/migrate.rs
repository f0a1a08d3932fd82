use tracing::warn;

use crate::foundation::error::{PipeError, PipeResult};
use crate::ops::descriptor::ModuleDescriptor;
use crate::params::blend::{BlendBlob, BlendParams, BLEND_VERSION};
use crate::params::block::{ParamBlock, ParamsBlob};

/// Bring a persisted parameter blob to the running format version.
///
/// - A blob at the current version is validated for size and adopted as-is.
/// - An older blob is forwarded through the operation's `legacy_params`
///   entry point when one exists.
/// - An older blob with no migration path, or a blob *newer* than the
///   running operation, fails with [`PipeError::MigrationUnavailable`];
///   the caller keeps the entry around unusable rather than deleting it.
pub fn migrate_params(descriptor: &ModuleDescriptor, blob: &ParamsBlob) -> PipeResult<ParamBlock> {
    let current = descriptor.params_version();
    if blob.version == current {
        if blob.data.len() != descriptor.params_size() {
            return Err(PipeError::validation(format!(
                "`{}` parameter blob has {} bytes, descriptor expects {}",
                descriptor.op(),
                blob.data.len(),
                descriptor.params_size()
            )));
        }
        return Ok(ParamBlock::from_bytes(blob.data.clone()));
    }

    let unavailable = || PipeError::MigrationUnavailable {
        op: descriptor.op().to_string(),
        found: blob.version,
        current,
    };

    if blob.version > current {
        warn!(
            op = descriptor.op(),
            found = blob.version,
            current,
            "parameter blob is newer than the running operation"
        );
        return Err(unavailable());
    }

    let Some(legacy) = descriptor.callbacks().legacy_params.as_ref() else {
        warn!(
            op = descriptor.op(),
            found = blob.version,
            current,
            "no legacy_params entry point, preset stays unusable"
        );
        return Err(unavailable());
    };

    let migrated = legacy(&blob.data, blob.version)?;
    if migrated.len() != descriptor.params_size() {
        return Err(PipeError::validation(format!(
            "`{}` legacy_params produced {} bytes, descriptor expects {}",
            descriptor.op(),
            migrated.len(),
            descriptor.params_size()
        )));
    }
    Ok(ParamBlock::from_bytes(migrated))
}

/// Bring a persisted blend blob to the running blend version.
///
/// Blend records migrate independently of module parameters; a record that
/// cannot be carried forward falls back to the default blend record instead
/// of making the entry unusable.
pub fn migrate_blend(op: &str, blob: &BlendBlob) -> BlendParams {
    if blob.version == BLEND_VERSION {
        return blob.params;
    }
    warn!(
        op,
        found = blob.version,
        current = BLEND_VERSION,
        "blend record version mismatch, falling back to defaults"
    );
    BlendParams::default()
}

#[cfg(test)]
#[path = "../../tests/unit/params/migrate.rs"]
mod tests;
