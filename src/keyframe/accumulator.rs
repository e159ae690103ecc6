use crate::foundation::core::{InstanceKey, Quat, Vec3};
use crate::foundation::math::Transform;
#[cfg(feature = "observations")]
use crate::keyframe::model::Observation;
use crate::keyframe::model::{CreationDescriptor, InstanceState, Keyframe, LoadDescriptor};
use crate::record::differ::StateDiffer;
use crate::record::registry::InstanceRegistry;

/// Record `key` as deleted in `keyframe`, cancelling a creation from the same keyframe.
///
/// An instance created and deleted inside one keyframe never needs to exist for a replay
/// consumer, so both entries disappear. Returns `true` when a creation was cancelled.
pub fn record_deletion(keyframe: &mut Keyframe, key: InstanceKey) -> bool {
    match keyframe.creation_index(key) {
        Some(idx) => {
            keyframe.creations.remove(idx);
            true
        }
        None => {
            keyframe.deletions.push(key);
            false
        }
    }
}

/// Owner of the in-progress keyframe.
#[derive(Debug, Default)]
pub struct KeyframeAccumulator {
    current: Keyframe,
}

impl KeyframeAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the in-progress keyframe.
    pub fn current(&self) -> &Keyframe {
        &self.current
    }

    pub(crate) fn current_mut(&mut self) -> &mut Keyframe {
        &mut self.current
    }

    /// Append an asset load.
    pub fn record_load(&mut self, descriptor: LoadDescriptor) {
        self.current.loads.push(descriptor);
    }

    /// Append an instance creation.
    pub fn record_creation(&mut self, key: InstanceKey, descriptor: CreationDescriptor) {
        self.current.creations.push((key, descriptor));
    }

    /// Record a deletion; see [`record_deletion`].
    pub fn record_deletion(&mut self, key: InstanceKey) -> bool {
        record_deletion(&mut self.current, key)
    }

    /// Append a state update. Callers emit at most one per key per keyframe.
    pub fn record_state_update(&mut self, key: InstanceKey, state: InstanceState) {
        self.current.state_updates.push((key, state));
    }

    /// Set the named user pose, overwriting an earlier value for the same name.
    pub fn record_user_transform(&mut self, name: impl Into<String>, transform: Transform) {
        self.current.user_transforms.insert(name.into(), transform);
    }

    /// Convenience form of [`Self::record_user_transform`].
    pub fn record_user_pose(&mut self, name: impl Into<String>, translation: Vec3, rotation: Quat) {
        self.record_user_transform(name, Transform::new(translation, rotation));
    }

    /// Attach a camera observation, replacing an earlier one in this keyframe.
    #[cfg(feature = "observations")]
    pub fn record_observation(&mut self, observation: Observation) {
        self.current.observation = Some(observation);
    }

    /// Diff every live instance and record one update per changed instance.
    ///
    /// Returns the number of updates recorded. Instances whose node can no longer be reached
    /// are skipped; their hook reports the deletion.
    pub(crate) fn update_all_instance_states(&mut self, registry: &mut InstanceRegistry) -> usize {
        let mut updated = 0;
        for record in registry.records_mut() {
            let Some(node) = record.node.upgrade() else {
                tracing::warn!(
                    key = %record.key,
                    node = %record.node_id,
                    "tracked node is gone but its hook has not fired"
                );
                continue;
            };
            if let Some(state) = StateDiffer::diff_and_update(record, node.as_ref()) {
                self.record_state_update(record.key, state);
                updated += 1;
            }
        }
        updated
    }

    /// Hand out the in-progress keyframe and start a fresh empty one.
    pub fn close_and_reset(&mut self) -> Keyframe {
        std::mem::take(&mut self.current)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframe/accumulator.rs"]
mod tests;
