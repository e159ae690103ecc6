use super::*;

fn creation(tag: &str) -> CreationDescriptor {
    CreationDescriptor(serde_json::json!({ "filepath": tag }))
}

#[test]
fn creations_keep_report_order() {
    let mut acc = KeyframeAccumulator::new();
    acc.record_creation(InstanceKey(0), creation("a"));
    acc.record_creation(InstanceKey(1), creation("b"));
    let keys: Vec<_> = acc.current().creations.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![InstanceKey(0), InstanceKey(1)]);
}

#[test]
fn deletion_cancels_creation_in_same_keyframe() {
    let mut acc = KeyframeAccumulator::new();
    acc.record_creation(InstanceKey(0), creation("a"));
    acc.record_creation(InstanceKey(1), creation("b"));
    assert!(acc.record_deletion(InstanceKey(0)));

    let kf = acc.close_and_reset();
    assert_eq!(kf.creations, vec![(InstanceKey(1), creation("b"))]);
    assert!(kf.deletions.is_empty());
}

#[test]
fn deletion_without_creation_is_kept() {
    let mut acc = KeyframeAccumulator::new();
    assert!(!acc.record_deletion(InstanceKey(4)));
    assert_eq!(acc.current().deletions, vec![InstanceKey(4)]);
}

#[test]
fn user_transform_last_write_wins() {
    let mut acc = KeyframeAccumulator::new();
    acc.record_user_pose("origin", Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
    acc.record_user_pose("origin", Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);
    let kf = acc.close_and_reset();
    assert_eq!(kf.user_transforms.len(), 1);
    assert_eq!(
        kf.user_transforms["origin"].translation,
        Vec3::new(2.0, 0.0, 0.0)
    );
}

#[test]
fn close_and_reset_starts_empty() {
    let mut acc = KeyframeAccumulator::new();
    acc.record_load(LoadDescriptor(serde_json::json!("cube")));
    acc.record_state_update(
        InstanceKey(2),
        InstanceState {
            abs_transform: Transform::IDENTITY,
            semantic_id: 1,
        },
    );
    let kf = acc.close_and_reset();
    assert_eq!(kf.loads.len(), 1);
    assert_eq!(kf.state_updates.len(), 1);
    assert!(acc.current().is_empty());
}

#[cfg(feature = "observations")]
#[test]
fn observation_last_write_wins_and_counts_as_content() {
    use crate::keyframe::model::{Observation, SensorType};

    let mut acc = KeyframeAccumulator::new();
    acc.record_observation(Observation {
        camera_transform: Transform::IDENTITY,
        sensor_type: SensorType::Depth,
    });
    assert!(!acc.current().is_empty());
    acc.record_observation(Observation {
        camera_transform: Transform::IDENTITY,
        sensor_type: SensorType::Color,
    });
    let kf = acc.close_and_reset();
    assert_eq!(kf.observation.unwrap().sensor_type, SensorType::Color);
    assert_eq!(acc.current().observation, None);
}
