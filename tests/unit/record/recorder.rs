use super::*;
use crate::export::document::KeyframeDocument;
use crate::export::store::InMemoryStore;
use crate::foundation::error::ReplayError;
use crate::keyframe::model::RenderAssetInstanceCreationInfo;
use crate::scene::simple::SimpleNode;

fn creation(path: &str) -> RenderAssetInstanceCreationInfo {
    RenderAssetInstanceCreationInfo::new(path)
}

struct FailingStore;

impl KeyframeStore for FailingStore {
    fn write_document(&mut self, _doc: &KeyframeDocument) -> ReplayResult<()> {
        Err(ReplayError::io("store offline"))
    }
}

#[test]
fn node_drop_records_deletion_through_hook() {
    let mut rec = Recorder::new();
    let node = SimpleNode::new();
    let key = rec.on_create_render_asset_instance(&node, creation("a"));
    rec.save_keyframe();

    assert_eq!(node.armed_hook_count(), 1);
    drop(node);
    assert_eq!(rec.num_live_instances(), 0);
    assert_eq!(rec.current_keyframe().deletions, vec![key]);
}

#[test]
fn recorder_drop_disarms_hooks_before_release() {
    let node = SimpleNode::new();
    {
        let mut rec = Recorder::new();
        rec.on_create_render_asset_instance(&node, creation("a"));
        assert_eq!(node.armed_hook_count(), 1);
    }
    assert_eq!(node.hook_count(), 1);
    assert_eq!(node.armed_hook_count(), 0);
    drop(node);
}

#[test]
#[should_panic(expected = "created twice")]
fn duplicate_create_is_fatal() {
    let mut rec = Recorder::new();
    let node = SimpleNode::new();
    rec.on_create_render_asset_instance(&node, creation("a"));
    rec.on_create_render_asset_instance(&node, creation("a"));
}

#[test]
fn failed_store_write_keeps_saved_log() {
    let mut rec = Recorder::new();
    let node = SimpleNode::new();
    rec.on_create_render_asset_instance(&node, creation("a"));
    rec.save_keyframe();

    let err = rec.write_saved_keyframes_to_store(&mut FailingStore).unwrap_err();
    assert!(matches!(err, ReplayError::Io(_)));
    assert_eq!(rec.num_saved_keyframes(), 1);

    let mut store = InMemoryStore::new();
    rec.write_saved_keyframes_to_store(&mut store).unwrap();
    assert_eq!(rec.num_saved_keyframes(), 0);
    assert_eq!(store.documents().len(), 1);
}

#[test]
fn flush_folds_creations_into_next_baseline() {
    let mut rec = Recorder::new();
    let a = SimpleNode::new();
    let b = SimpleNode::new();
    let ka = rec.on_create_render_asset_instance(&a, creation("a"));
    rec.save_keyframe();
    let kb = rec.on_create_render_asset_instance(&b, creation("b"));
    rec.save_keyframe();

    let mut store = InMemoryStore::new();
    rec.write_saved_keyframes_to_store(&mut store).unwrap();

    let baseline = rec.current_keyframe();
    let keys: Vec<_> = baseline.creations.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![ka, kb]);
    assert!(baseline.state_updates.is_empty());

    drop(a);
    let baseline = rec.current_keyframe();
    let keys: Vec<_> = baseline.creations.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![kb]);
    assert!(baseline.deletions.is_empty());
}

#[test]
fn pretty_option_controls_string_output() {
    let mut rec = Recorder::with_opts(RecorderOpts { pretty_json: true });
    rec.add_user_transform_to_keyframe("origin", Vec3::ZERO, Quat::IDENTITY);
    rec.save_keyframe();
    let text = rec.write_saved_keyframes_to_string().unwrap();
    assert!(text.contains('\n'));
    assert!(text.contains("userTransforms"));
}

#[test]
fn string_export_of_empty_log_is_empty() {
    let mut rec = Recorder::new();
    assert_eq!(rec.write_saved_keyframes_to_string().unwrap(), "");
}

#[test]
fn find_instance_reports_tracking() {
    let mut rec = Recorder::new();
    let node = SimpleNode::new();
    assert_eq!(rec.find_instance(node.node_id()), None);
    let key = rec.on_create_render_asset_instance(&node, creation("a"));
    assert_eq!(rec.find_instance(node.node_id()), Some(key));
}

#[test]
fn failed_string_export_keeps_saved_log() {
    let mut rec = Recorder::new();
    rec.add_user_transform_to_keyframe("agent", Vec3::new(f32::NAN, 0.0, 0.0), Quat::IDENTITY);
    rec.save_keyframe();

    let err = rec.write_saved_keyframes_to_string().unwrap_err();
    assert!(matches!(err, ReplayError::Validation(_)));
    assert_eq!(rec.num_saved_keyframes(), 1);
    assert!(rec.current_keyframe().is_empty());
}
