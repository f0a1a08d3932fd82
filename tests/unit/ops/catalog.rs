use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::ops::provider::{EntryPoints, OpFlags, OperationProvider};
use crate::params::block::ParamBlock;

struct CountedOp {
    key: &'static str,
    priority: i32,
    cleanups: Arc<AtomicUsize>,
}

impl OperationProvider for CountedOp {
    fn op_key(&self) -> &str {
        self.key
    }

    fn params_version(&self) -> i32 {
        1
    }

    fn entry_points(&self) -> EntryPoints {
        let priority = self.priority;
        EntryPoints {
            name: Some(format!("{} op", self.key)),
            flags: Some(OpFlags {
                hidden: true,
                ..Default::default()
            }),
            init: Some(Arc::new(move |mut seed| {
                seed.priority = priority;
                seed.default_params = ParamBlock::zeroed(4);
                seed
            })),
            process: Some(Arc::new(|_, input, _, output, _| {
                output.copy_from_slice(input);
                Ok(())
            })),
            ..Default::default()
        }
    }

    fn cleanup_global(&self) {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
    }
}

fn op(key: &'static str, priority: i32, cleanups: &Arc<AtomicUsize>) -> Box<CountedOp> {
    Box::new(CountedOp {
        key,
        priority,
        cleanups: cleanups.clone(),
    })
}

#[test]
fn load_is_partial_failure_tolerant() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let catalog = OperationCatalog::load(vec![
        op("exposure", 200, &cleanups),
        op("broken", 0, &cleanups), // zero priority: rejected before insertion
        op("demosaic", 100, &cleanups),
    ]);
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get("exposure").is_some());
    assert!(catalog.get("broken").is_none());
}

#[test]
fn duplicate_keys_are_rejected() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let mut catalog = OperationCatalog::new();
    catalog.register(op("exposure", 200, &cleanups)).unwrap();
    let err = catalog.register(op("exposure", 300, &cleanups)).unwrap_err();
    assert!(err.to_string().contains("already registered"));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn iteration_is_priority_ordered() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let catalog = OperationCatalog::load(vec![
        op("colorout", 300, &cleanups),
        op("demosaic", 100, &cleanups),
        op("exposure", 200, &cleanups),
    ]);
    let keys: Vec<&str> = catalog.iter_by_priority().map(|d| d.op()).collect();
    assert_eq!(keys, vec!["demosaic", "exposure", "colorout"]);
}

#[test]
fn display_name_resolves_registered_keys() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let catalog = OperationCatalog::load(vec![op("exposure", 200, &cleanups)]);
    assert_eq!(catalog.display_name("exposure"), Some("exposure op"));
    assert_eq!(catalog.display_name("missing"), None);
}

#[test]
fn teardown_runs_global_cleanup_for_every_unit() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let catalog = OperationCatalog::load(vec![
        op("exposure", 200, &cleanups),
        op("demosaic", 100, &cleanups),
    ]);
    assert_eq!(cleanups.load(Ordering::SeqCst), 0);
    catalog.teardown();
    assert_eq!(cleanups.load(Ordering::SeqCst), 2);
}
