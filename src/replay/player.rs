use std::collections::BTreeMap;
use std::path::Path;

use crate::export::document::KeyframeDocument;
use crate::foundation::core::InstanceKey;
use crate::foundation::error::{ReplayError, ReplayResult};
use crate::foundation::math::Transform;
use crate::keyframe::model::{CreationDescriptor, InstanceState, Keyframe, LoadDescriptor};

/// Consumer that rebuilds a scene from replayed keyframes.
pub trait ReplayTarget {
    /// Forget every asset and instance applied so far.
    fn clear(&mut self) -> ReplayResult<()>;
    /// Load an asset.
    fn load_asset(&mut self, load: &LoadDescriptor) -> ReplayResult<()>;
    /// Create instance `key`.
    fn create_instance(&mut self, key: InstanceKey, creation: &CreationDescriptor)
    -> ReplayResult<()>;
    /// Destroy instance `key`.
    fn delete_instance(&mut self, key: InstanceKey) -> ReplayResult<()>;
    /// Move or retag instance `key`.
    fn set_instance_state(&mut self, key: InstanceKey, state: &InstanceState) -> ReplayResult<()>;
    /// Observe a named user pose. Ignored by default.
    fn set_user_transform(&mut self, _name: &str, _transform: &Transform) -> ReplayResult<()> {
        Ok(())
    }
}

/// Steps a [`ReplayTarget`] through a recorded keyframe sequence.
///
/// Within a keyframe, changes apply in the order loads, creations, deletions, state updates,
/// user transforms. Seeking backwards clears the target and replays from the first keyframe.
#[derive(Debug, Clone)]
pub struct Player {
    keyframes: Vec<Keyframe>,
    index: Option<usize>,
    live: BTreeMap<InstanceKey, Option<InstanceState>>,
    user_transforms: BTreeMap<String, Transform>,
}

impl Player {
    /// Player over already-decoded keyframes.
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self {
            keyframes,
            index: None,
            live: BTreeMap::new(),
            user_transforms: BTreeMap::new(),
        }
    }

    /// Player over an exported document.
    pub fn from_document(doc: &KeyframeDocument) -> Self {
        Self::new(doc.to_keyframes())
    }

    /// Player over a JSON document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReplayResult<Self> {
        Ok(Self::from_document(&KeyframeDocument::from_path(path)?))
    }

    /// Number of keyframes available.
    pub fn num_keyframes(&self) -> usize {
        self.keyframes.len()
    }

    /// Borrow keyframe `idx`.
    pub fn keyframe(&self, idx: usize) -> Option<&Keyframe> {
        self.keyframes.get(idx)
    }

    /// Index of the last applied keyframe, `None` before the first seek.
    pub fn keyframe_index(&self) -> Option<usize> {
        self.index
    }

    /// Live instances and their last applied state, by key.
    pub fn live_instances(&self) -> impl Iterator<Item = (InstanceKey, Option<&InstanceState>)> {
        self.live.iter().map(|(k, s)| (*k, s.as_ref()))
    }

    /// Latest applied value of a user pose.
    pub fn user_transform(&self, name: &str) -> Option<Transform> {
        self.user_transforms.get(name).copied()
    }

    /// Bring `target` to the state right after keyframe `idx`.
    ///
    /// On error the player forgets its position; the next seek replays from the start.
    pub fn set_keyframe_index(
        &mut self,
        idx: usize,
        target: &mut dyn ReplayTarget,
    ) -> ReplayResult<()> {
        if idx >= self.keyframes.len() {
            return Err(ReplayError::validation(format!(
                "keyframe index {idx} out of range (count: {})",
                self.keyframes.len()
            )));
        }

        let start = match self.index {
            Some(cur) if cur == idx => return Ok(()),
            Some(cur) if cur < idx => cur + 1,
            _ => {
                self.reset(target)?;
                0
            }
        };

        for i in start..=idx {
            if let Err(e) = self.apply(i, target) {
                self.index = None;
                return Err(e);
            }
            self.index = Some(i);
        }
        Ok(())
    }

    fn reset(&mut self, target: &mut dyn ReplayTarget) -> ReplayResult<()> {
        self.index = None;
        self.live.clear();
        self.user_transforms.clear();
        target.clear()
    }

    fn apply(&mut self, i: usize, target: &mut dyn ReplayTarget) -> ReplayResult<()> {
        let kf = &self.keyframes[i];
        for load in &kf.loads {
            target.load_asset(load)?;
        }
        for (key, creation) in &kf.creations {
            if self.live.contains_key(key) {
                return Err(ReplayError::validation(format!(
                    "keyframe {i} creates live instance {key}"
                )));
            }
            self.live.insert(*key, None);
            target.create_instance(*key, creation)?;
        }
        for key in &kf.deletions {
            if self.live.remove(key).is_none() {
                return Err(ReplayError::validation(format!(
                    "keyframe {i} deletes unknown instance {key}"
                )));
            }
            target.delete_instance(*key)?;
        }
        for (key, state) in &kf.state_updates {
            let Some(slot) = self.live.get_mut(key) else {
                return Err(ReplayError::validation(format!(
                    "keyframe {i} updates unknown instance {key}"
                )));
            };
            *slot = Some(*state);
            target.set_instance_state(*key, state)?;
        }
        for (name, transform) in &kf.user_transforms {
            self.user_transforms.insert(name.clone(), *transform);
            target.set_user_transform(name, transform)?;
        }
        tracing::trace!(keyframe = i, live = self.live.len(), "applied keyframe");
        Ok(())
    }
}

/// One instance rebuilt by [`ReplayedScene`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayedInstance {
    /// Payload the instance was created with.
    pub creation: CreationDescriptor,
    /// Last applied state, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InstanceState>,
}

/// In-memory [`ReplayTarget`] for tests, debugging and inspection tools.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayedScene {
    /// Loaded assets in load order.
    pub loads: Vec<LoadDescriptor>,
    /// Live instances by key.
    pub instances: BTreeMap<InstanceKey, ReplayedInstance>,
    /// Latest user poses.
    pub user_transforms: BTreeMap<String, Transform>,
}

impl ReplayedScene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplayTarget for ReplayedScene {
    fn clear(&mut self) -> ReplayResult<()> {
        *self = Self::default();
        Ok(())
    }

    fn load_asset(&mut self, load: &LoadDescriptor) -> ReplayResult<()> {
        self.loads.push(load.clone());
        Ok(())
    }

    fn create_instance(
        &mut self,
        key: InstanceKey,
        creation: &CreationDescriptor,
    ) -> ReplayResult<()> {
        self.instances.insert(
            key,
            ReplayedInstance {
                creation: creation.clone(),
                state: None,
            },
        );
        Ok(())
    }

    fn delete_instance(&mut self, key: InstanceKey) -> ReplayResult<()> {
        self.instances.remove(&key);
        Ok(())
    }

    fn set_instance_state(&mut self, key: InstanceKey, state: &InstanceState) -> ReplayResult<()> {
        if let Some(inst) = self.instances.get_mut(&key) {
            inst.state = Some(*state);
        }
        Ok(())
    }

    fn set_user_transform(&mut self, name: &str, transform: &Transform) -> ReplayResult<()> {
        self.user_transforms.insert(name.to_string(), *transform);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/player.rs"]
mod tests;
