use super::*;
use crate::export::store::InMemoryStore;
use crate::keyframe::model::{AssetInfo, RenderAssetInstanceCreationInfo};
use crate::replay::player::ReplayedScene;
use crate::scene::simple::SimpleNode;

#[test]
fn disabled_manager_ignores_recording_calls() {
    let mut mgr = ReplayManager::default();
    assert!(!mgr.is_recording_enabled());
    assert!(mgr.recorder().is_none());

    let node = SimpleNode::new();
    mgr.on_load_render_asset(AssetInfo::new("cube"));
    let key =
        mgr.on_create_render_asset_instance(&node, RenderAssetInstanceCreationInfo::new("cube"));
    assert_eq!(key, None);
    mgr.add_user_transform_to_keyframe("agent", Vec3::ZERO, Quat::IDENTITY);
    mgr.save_keyframe();

    assert_eq!(mgr.write_saved_keyframes_to_string().unwrap(), "");
    let mut store = InMemoryStore::new();
    mgr.write_saved_keyframes_to_store(&mut store).unwrap();
    assert!(store.documents().is_empty());
    assert_eq!(node.hook_count(), 0);
}

#[test]
fn enabled_manager_records_and_reads_back() {
    let mut mgr = ReplayManager::new(ReplayConfig::recording());
    let node = SimpleNode::new();
    node.set_translation(Vec3::new(0.0, 1.0, 0.0));

    mgr.on_load_render_asset(AssetInfo::new("cube"));
    let key = mgr
        .on_create_render_asset_instance(&node, RenderAssetInstanceCreationInfo::new("cube"))
        .unwrap();
    mgr.save_keyframe();
    let json = mgr.write_saved_keyframes_to_string().unwrap();

    let mut player = mgr.read_keyframes_from_str(&json).unwrap();
    assert_eq!(player.num_keyframes(), 1);
    let mut scene = ReplayedScene::new();
    player.set_keyframe_index(0, &mut scene).unwrap();
    let inst = &scene.instances[&key];
    let state = inst.state.unwrap();
    assert_eq!(state.abs_transform.translation, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn pretty_json_option_reaches_recorder() {
    let cfg = ReplayConfig {
        enable_gfx_replay_save: true,
        pretty_json: true,
    };
    let mut mgr = ReplayManager::new(cfg);
    mgr.save_keyframe();
    let json = mgr.write_saved_keyframes_to_string().unwrap();
    assert!(json.contains('\n'));
}

#[test]
fn reads_keyframes_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keyframes.json");
    std::fs::write(&path, r#"{ "keyframes": [{}, {}] }"#).unwrap();

    let mgr = ReplayManager::default();
    let player = mgr.read_keyframes_from_file(&path).unwrap();
    assert_eq!(player.num_keyframes(), 2);

    let missing = mgr.read_keyframes_from_file(dir.path().join("missing.json"));
    assert!(matches!(
        missing.unwrap_err(),
        crate::foundation::error::ReplayError::Io(_)
    ));
}
