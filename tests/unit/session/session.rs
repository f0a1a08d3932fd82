use std::sync::Arc;

use super::*;
use crate::ops::provider::{EntryPoints, OpFlags, OperationProvider};
use crate::params::block::ParamBlock;

struct StubOp {
    key: &'static str,
    priority: i32,
    one_instance: bool,
    supports_blending: bool,
}

impl OperationProvider for StubOp {
    fn op_key(&self) -> &str {
        self.key
    }

    fn params_version(&self) -> i32 {
        1
    }

    fn entry_points(&self) -> EntryPoints {
        let priority = self.priority;
        EntryPoints {
            name: Some(self.key.to_string()),
            flags: Some(OpFlags {
                hidden: true,
                one_instance: self.one_instance,
                supports_blending: self.supports_blending,
                ..Default::default()
            }),
            init: Some(Arc::new(move |mut seed| {
                seed.priority = priority;
                seed.default_params = ParamBlock::from_bytes(vec![0; 4]);
                seed
            })),
            process: Some(Arc::new(|_, input, _, output, _| {
                output.copy_from_slice(input);
                Ok(())
            })),
            ..Default::default()
        }
    }
}

fn stub(key: &'static str, priority: i32) -> Box<StubOp> {
    Box::new(StubOp {
        key,
        priority,
        one_instance: false,
        supports_blending: false,
    })
}

fn session_with(providers: Vec<Box<StubOp>>) -> Session {
    let catalog = Arc::new(OperationCatalog::load(
        providers
            .into_iter()
            .map(|p| p as Box<dyn OperationProvider>)
            .collect(),
    ));
    Session::new(catalog, None)
}

fn id_of(session: &Session, op: &str) -> InstanceId {
    session
        .instances()
        .iter()
        .find(|m| m.descriptor().op() == op)
        .map(|m| m.id())
        .expect("instance present")
}

#[test]
fn pipeline_order_is_insertion_order_independent() {
    let forward = session_with(vec![
        stub("demosaic", 100),
        stub("exposure", 200),
        stub("colorout", 300),
    ]);
    let backward = session_with(vec![
        stub("colorout", 300),
        stub("exposure", 200),
        stub("demosaic", 100),
    ]);
    let order = |s: &Session| {
        s.instances()
            .iter()
            .map(|m| m.descriptor().op().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&forward), vec!["demosaic", "exposure", "colorout"]);
    assert_eq!(order(&forward), order(&backward));
}

#[test]
fn duplicate_sorts_before_base_and_starts_disabled() {
    let mut session = session_with(vec![stub("exposure", 200), stub("sharpen", 400)]);
    let base = id_of(&session, "exposure");
    session.set_enabled(base, true).unwrap();

    let dup = session.duplicate(base, true).unwrap();
    let ops: Vec<(InstanceId, i32)> = session
        .instances()
        .iter()
        .filter(|m| m.descriptor().op() == "exposure")
        .map(|m| (m.id(), m.multi_priority()))
        .collect();
    // Equal descriptor priority: higher multi_priority sorts first.
    assert_eq!(ops, vec![(dup, 1), (base, 0)]);
    assert!(!session.instance(dup).unwrap().enabled());
    assert!(session.instance(base).unwrap().enabled());

    // The creation was recorded, disabled.
    let last = session.history().last().unwrap();
    assert_eq!(last.instance, dup);
    assert!(!last.enabled);
    assert_eq!(last.group, session.instance(base).unwrap().group());
}

#[test]
fn duplicate_copies_or_reinitializes_params() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    session.set_params(base, &[9, 9, 9, 9]).unwrap();

    let copied = session.duplicate(base, true).unwrap();
    assert_eq!(
        session.instance(copied).unwrap().params().as_bytes(),
        &[9, 9, 9, 9]
    );

    let fresh = session.duplicate(base, false).unwrap();
    assert_eq!(
        session.instance(fresh).unwrap().params().as_bytes(),
        &[0, 0, 0, 0]
    );
}

#[test]
fn duplicate_then_delete_restores_the_group() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    assert_eq!(session.instance(base).unwrap().multi_priority(), 0);

    let dup = session.duplicate(base, true).unwrap();
    assert_eq!(session.instances().len(), 2);

    assert!(session.delete(dup).unwrap());
    assert_eq!(session.instances().len(), 1);
    assert_eq!(session.instance(base).unwrap().multi_priority(), 0);
}

#[test]
fn deleting_the_priority_zero_member_promotes_the_successor() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    let dup = session.duplicate(base, true).unwrap();
    assert_eq!(session.instance(dup).unwrap().multi_priority(), 1);
    // Give the survivor a history entry to be rewritten.
    session.set_params(dup, &[5, 5, 5, 5]).unwrap();

    assert!(session.delete(base).unwrap());
    assert_eq!(session.instance(dup).unwrap().multi_priority(), 0);
    for entry in session.history() {
        assert_ne!(entry.instance, base, "deleted entries must be dropped");
        if entry.instance == dup {
            assert_eq!(entry.multi_priority, 0);
        }
    }
}

#[test]
fn deleting_the_last_group_member_is_a_no_op() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    assert!(!session.delete(base).unwrap());
    assert_eq!(session.instances().len(), 1);
}

#[test]
fn reorder_swaps_multi_priority_and_patches_history() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    let dup = session.duplicate(base, true).unwrap();
    session.set_params(base, &[1, 1, 1, 1]).unwrap();
    session.set_params(dup, &[2, 2, 2, 2]).unwrap();

    // dup (multi 1) runs before base (multi 0); move base one slot earlier.
    assert!(session.move_up(base).unwrap());
    assert_eq!(session.instance(base).unwrap().multi_priority(), 1);
    assert_eq!(session.instance(dup).unwrap().multi_priority(), 0);
    let first_exposure = session
        .instances()
        .iter()
        .find(|m| m.descriptor().op() == "exposure")
        .unwrap();
    assert_eq!(first_exposure.id(), base);

    for entry in session.history() {
        if entry.instance == base {
            assert_eq!(entry.multi_priority, 1);
        } else if entry.instance == dup {
            assert_eq!(entry.multi_priority, 0);
        }
    }

    // No neighbor above the top member.
    assert!(!session.move_up(base).unwrap());
    // And moving back down restores the original order.
    assert!(session.move_down(base).unwrap());
    assert_eq!(session.instance(base).unwrap().multi_priority(), 0);
}

#[test]
fn one_instance_operations_cannot_be_duplicated() {
    let mut session = session_with(vec![Box::new(StubOp {
        key: "demosaic",
        priority: 100,
        one_instance: true,
        supports_blending: false,
    })]);
    let base = id_of(&session, "demosaic");
    assert!(session.duplicate(base, true).is_err());
}

#[test]
fn set_params_validates_size_and_records_history() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    assert!(session.set_params(base, &[1, 2, 3]).is_err());
    assert!(session.history().is_empty());

    session.set_params(base, &[1, 2, 3, 4]).unwrap();
    let entry = session.history().last().unwrap();
    assert_eq!(entry.op, "exposure");
    assert_eq!(entry.params.data, vec![1, 2, 3, 4]);
}

#[test]
fn reset_restores_descriptor_defaults() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    session.set_params(base, &[8, 8, 8, 8]).unwrap();
    session.reset(base).unwrap();
    assert_eq!(
        session.instance(base).unwrap().params().as_bytes(),
        &[0, 0, 0, 0]
    );
    assert_eq!(session.history().len(), 2);
}

#[test]
fn visibility_propagates_to_all_instances_of_the_descriptor() {
    let mut session = session_with(vec![stub("exposure", 200)]);
    let base = id_of(&session, "exposure");
    let dup = session.duplicate(base, false).unwrap();

    session
        .set_visibility(base, VisibilityState::Favorite)
        .unwrap();
    assert_eq!(
        session.instance(dup).unwrap().state(),
        VisibilityState::Favorite
    );
    assert_eq!(
        session.visibility_config().state("exposure"),
        VisibilityState::Favorite
    );
}

#[test]
fn colorspace_classification_uses_pipeline_landmarks() {
    let session = session_with(vec![
        stub("rawprepare", 50),
        stub("demosaic", 100),
        stub("colorin", 200),
        stub("tonecurve", 250),
        stub("colorout", 300),
        stub("sharpen", 400),
    ]);
    let space = |op: &str| session.colorspace_of(id_of(&session, op)).unwrap();
    assert_eq!(space("rawprepare"), ColorSpace::Raw);
    assert_eq!(space("tonecurve"), ColorSpace::Lab);
    assert_eq!(space("sharpen"), ColorSpace::Rgb);
    assert_eq!(space("demosaic"), ColorSpace::Rgb); // fallback band
}
