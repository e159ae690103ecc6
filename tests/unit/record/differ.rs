use std::rc::{Rc, Weak};

use super::*;
use crate::foundation::core::{NodeId, Vec3};
use crate::record::registry::InstanceRegistry;
use crate::scene::hook::DeletionListener;
use crate::scene::simple::SimpleNode;

struct Ignore;

impl DeletionListener for Ignore {
    fn on_node_deleted(&self, _node: NodeId) {}
}

#[test]
fn first_observation_then_only_real_changes() {
    let listener = Rc::new(Ignore);
    let weak: Weak<Ignore> = Rc::downgrade(&listener);
    let mut reg = InstanceRegistry::new();
    let node = SimpleNode::new();
    let (_key, _hook) = reg.register_creation(&node, weak);

    let record = reg.records_mut().next().unwrap();
    let first = StateDiffer::diff_and_update(record, node.as_ref());
    assert!(first.is_some());
    assert_eq!(StateDiffer::diff_and_update(record, node.as_ref()), None);

    node.set_translation(Vec3::new(0.0, 0.0, 1.0));
    let moved = StateDiffer::diff_and_update(record, node.as_ref()).unwrap();
    assert_eq!(moved.abs_transform.translation, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(record.recent_state, Some(moved));

    node.set_semantic_id(3);
    let retagged = StateDiffer::diff_and_update(record, node.as_ref()).unwrap();
    assert_eq!(retagged.semantic_id, 3);
}

#[test]
fn compute_state_reads_world_pose() {
    let parent = SimpleNode::new();
    parent.set_translation(Vec3::new(2.0, 0.0, 0.0));
    let child = SimpleNode::with_parent(&parent);
    child.set_semantic_id(9);
    let s = StateDiffer::compute_state(child.as_ref());
    assert_eq!(s.abs_transform.translation, Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(s.semantic_id, 9);
}

#[test]
fn non_finite_pose_is_skipped() {
    let listener = Rc::new(Ignore);
    let weak: Weak<Ignore> = Rc::downgrade(&listener);
    let mut reg = InstanceRegistry::new();
    let node = SimpleNode::new();
    let (_key, _hook) = reg.register_creation(&node, weak);
    let record = reg.records_mut().next().unwrap();

    let first = StateDiffer::diff_and_update(record, node.as_ref()).unwrap();
    node.set_translation(Vec3::new(f32::NAN, 0.0, 0.0));
    assert_eq!(StateDiffer::diff_and_update(record, node.as_ref()), None);
    assert_eq!(StateDiffer::diff_and_update(record, node.as_ref()), None);
    assert_eq!(record.recent_state, Some(first));

    node.set_translation(Vec3::ONE);
    assert!(StateDiffer::diff_and_update(record, node.as_ref()).is_some());
}
