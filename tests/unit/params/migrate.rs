use std::sync::Arc;

use super::*;
use crate::ops::descriptor;
use crate::ops::provider::{EntryPoints, OpFlags, OperationProvider};

struct VersionedOp {
    with_legacy: bool,
}

impl OperationProvider for VersionedOp {
    fn op_key(&self) -> &str {
        "tonecurve"
    }

    fn params_version(&self) -> i32 {
        2
    }

    fn entry_points(&self) -> EntryPoints {
        EntryPoints {
            name: Some("tone curve".to_string()),
            flags: Some(OpFlags {
                hidden: true,
                ..Default::default()
            }),
            init: Some(Arc::new(|mut seed| {
                seed.priority = 400;
                seed.default_params = ParamBlock::zeroed(8);
                seed
            })),
            process: Some(Arc::new(|_, input, _, output, _| {
                output.copy_from_slice(input);
                Ok(())
            })),
            // v1 stored a single f32; v2 appends a second, defaulted slot.
            legacy_params: self.with_legacy.then(|| {
                Arc::new(|old: &[u8], old_version: i32| {
                    if old_version != 1 || old.len() != 4 {
                        return Err(crate::foundation::error::PipeError::validation(
                            "unsupported tonecurve blob",
                        ));
                    }
                    let mut new = old.to_vec();
                    new.extend_from_slice(&1.0f32.to_le_bytes());
                    Ok(new)
                }) as crate::ops::provider::LegacyParamsFn
            }),
            ..Default::default()
        }
    }
}

fn descriptor(with_legacy: bool) -> Arc<crate::ops::descriptor::ModuleDescriptor> {
    descriptor::register(Box::new(VersionedOp { with_legacy })).unwrap()
}

#[test]
fn current_version_blob_is_adopted() {
    let d = descriptor(false);
    let blob = ParamsBlob {
        version: 2,
        data: vec![7; 8],
    };
    let block = migrate_params(&d, &blob).unwrap();
    assert_eq!(block.as_bytes(), &[7; 8]);
}

#[test]
fn current_version_blob_with_wrong_size_is_invalid() {
    let d = descriptor(false);
    let blob = ParamsBlob {
        version: 2,
        data: vec![7; 5],
    };
    assert!(migrate_params(&d, &blob).is_err());
}

#[test]
fn old_blob_migrates_through_legacy_params() {
    let d = descriptor(true);
    let blob = ParamsBlob {
        version: 1,
        data: 2.0f32.to_le_bytes().to_vec(),
    };
    let block = migrate_params(&d, &blob).unwrap();
    assert_eq!(block.len(), 8);
    assert_eq!(block.read_f32_slot(0), 2.0);
    assert_eq!(block.read_f32_slot(1), 1.0);
}

#[test]
fn old_blob_without_migration_is_unavailable() {
    let d = descriptor(false);
    let blob = ParamsBlob {
        version: 1,
        data: vec![0; 4],
    };
    assert!(matches!(
        migrate_params(&d, &blob),
        Err(PipeError::MigrationUnavailable {
            found: 1,
            current: 2,
            ..
        })
    ));
}

#[test]
fn newer_blob_is_unavailable_not_deleted() {
    let d = descriptor(true);
    let blob = ParamsBlob {
        version: 3,
        data: vec![0; 8],
    };
    assert!(matches!(
        migrate_params(&d, &blob),
        Err(PipeError::MigrationUnavailable { found: 3, .. })
    ));
}

#[test]
fn blend_mismatch_falls_back_to_defaults() {
    let blob = BlendBlob {
        version: BLEND_VERSION - 1,
        params: {
            let mut b = BlendParams::default();
            b.opacity = 25.0;
            b
        },
    };
    assert_eq!(migrate_blend("tonecurve", &blob), BlendParams::default());

    let current = BlendBlob::snapshot(&{
        let mut b = BlendParams::default();
        b.opacity = 25.0;
        b
    });
    assert_eq!(migrate_blend("tonecurve", &current).opacity, 25.0);
}
