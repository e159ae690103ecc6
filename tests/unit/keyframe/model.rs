use super::*;
use crate::foundation::core::Quat;

#[test]
fn empty_keyframe_reports_empty() {
    let mut kf = Keyframe::default();
    assert!(kf.is_empty());
    kf.user_transforms
        .insert("origin".to_string(), Transform::IDENTITY);
    assert!(!kf.is_empty());
}

#[test]
fn creation_index_finds_key() {
    let kf = Keyframe {
        creations: vec![
            (InstanceKey(3), CreationDescriptor(serde_json::json!("a"))),
            (InstanceKey(8), CreationDescriptor(serde_json::json!("b"))),
        ],
        ..Keyframe::default()
    };
    assert_eq!(kf.creation_index(InstanceKey(8)), Some(1));
    assert_eq!(kf.creation_index(InstanceKey(4)), None);
}

#[test]
fn typed_descriptors_survive_opaque_transport() {
    let info = RenderAssetInstanceCreationInfo {
        scale: Some(Vec3::new(1.0, 2.0, 1.0)),
        is_semantic: true,
        ..RenderAssetInstanceCreationInfo::new("data/objects/chair.glb")
    };
    let desc = CreationDescriptor::from(info.clone());
    assert_eq!(desc.0["filepath"], "data/objects/chair.glb");
    assert_eq!(desc.0["isRGBD"], true);

    let back: RenderAssetInstanceCreationInfo = desc.deserialize_into().unwrap();
    assert_eq!(back, info);
}

#[test]
fn asset_info_fills_defaults_when_decoding() {
    let desc = LoadDescriptor(serde_json::json!({ "filepath": "cube" }));
    let info: AssetInfo = desc.deserialize_into().unwrap();
    assert_eq!(info, AssetInfo::new("cube"));
}

#[test]
fn decoding_wrong_shape_is_a_serde_error() {
    let desc = LoadDescriptor(serde_json::json!(42));
    let err = desc.deserialize_into::<AssetInfo>().unwrap_err();
    assert!(matches!(err, ReplayError::Serde(_)));
}

#[test]
fn instance_state_field_names() {
    let s = InstanceState {
        abs_transform: Transform::new(Vec3::ZERO, Quat::IDENTITY),
        semantic_id: 4,
    };
    let v = serde_json::to_value(s).unwrap();
    assert!(v.get("absoluteTransform").is_some());
    assert_eq!(v["semanticId"], 4);
}
