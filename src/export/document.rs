use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::InstanceKey;
use crate::foundation::error::{ReplayError, ReplayResult};
use crate::foundation::math::Transform;
#[cfg(feature = "observations")]
use crate::keyframe::model::Observation;
use crate::keyframe::model::{CreationDescriptor, InstanceState, Keyframe, LoadDescriptor};

/// Structured document holding an ordered run of keyframes.
///
/// Per keyframe, a field is omitted when it has no entries; an empty container is never
/// written. Consumers must treat a missing field as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDocument {
    /// Keyframes in recording order.
    pub keyframes: Vec<KeyframeEntry>,
}

/// Serialized form of one [`Keyframe`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeEntry {
    /// Asset loads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loads: Vec<LoadEntry>,
    /// Instance creations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creations: Vec<CreationEntry>,
    /// Deleted instance keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<InstanceKey>,
    /// Instance state changes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state_updates: Vec<StateUpdateEntry>,
    /// Named user poses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_transforms: Vec<UserTransformEntry>,
    /// Camera observation.
    #[cfg(feature = "observations")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

/// `{ assetInfo }` wrapper of one load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadEntry {
    /// Opaque load payload.
    pub asset_info: LoadDescriptor,
}

/// `{ instanceKey, creation }` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationEntry {
    /// Key of the created instance.
    pub instance_key: InstanceKey,
    /// Opaque creation payload.
    pub creation: CreationDescriptor,
}

/// `{ instanceKey, absoluteTransform, semanticId }` triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdateEntry {
    /// Key of the updated instance.
    pub instance_key: InstanceKey,
    /// New world-space pose.
    pub absolute_transform: Transform,
    /// New semantic tag.
    pub semantic_id: u32,
}

impl StateUpdateEntry {
    /// The update as an [`InstanceState`].
    pub fn state(&self) -> InstanceState {
        InstanceState {
            abs_transform: self.absolute_transform,
            semantic_id: self.semantic_id,
        }
    }
}

/// `{ name, transform }` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserTransformEntry {
    /// User-chosen name.
    pub name: String,
    /// Pose recorded under `name`.
    pub transform: Transform,
}

impl From<&Keyframe> for KeyframeEntry {
    fn from(kf: &Keyframe) -> Self {
        Self {
            loads: kf
                .loads
                .iter()
                .map(|l| LoadEntry {
                    asset_info: l.clone(),
                })
                .collect(),
            creations: kf
                .creations
                .iter()
                .map(|(key, c)| CreationEntry {
                    instance_key: *key,
                    creation: c.clone(),
                })
                .collect(),
            deletions: kf.deletions.clone(),
            state_updates: kf
                .state_updates
                .iter()
                .map(|(key, s)| StateUpdateEntry {
                    instance_key: *key,
                    absolute_transform: s.abs_transform,
                    semantic_id: s.semantic_id,
                })
                .collect(),
            user_transforms: kf
                .user_transforms
                .iter()
                .map(|(name, t)| UserTransformEntry {
                    name: name.clone(),
                    transform: *t,
                })
                .collect(),
            #[cfg(feature = "observations")]
            observation: kf.observation,
        }
    }
}

impl KeyframeEntry {
    /// Rebuild the in-memory keyframe. Repeated user-transform names keep the last value.
    pub fn to_keyframe(&self) -> Keyframe {
        Keyframe {
            loads: self.loads.iter().map(|l| l.asset_info.clone()).collect(),
            creations: self
                .creations
                .iter()
                .map(|c| (c.instance_key, c.creation.clone()))
                .collect(),
            deletions: self.deletions.clone(),
            state_updates: self
                .state_updates
                .iter()
                .map(|u| (u.instance_key, u.state()))
                .collect(),
            user_transforms: self
                .user_transforms
                .iter()
                .map(|u| (u.name.clone(), u.transform))
                .collect(),
            #[cfg(feature = "observations")]
            observation: self.observation,
        }
    }
}

/// Build the export document for `saved`.
///
/// An empty log yields `None` and a warning; this is a usage pattern, not a failure.
pub fn export_keyframes(saved: &[Keyframe]) -> Option<KeyframeDocument> {
    if saved.is_empty() {
        tracing::warn!("no saved keyframes to write");
        return None;
    }
    Some(KeyframeDocument {
        keyframes: saved.iter().map(KeyframeEntry::from).collect(),
    })
}

impl KeyframeDocument {
    /// Parse a document from JSON text.
    pub fn from_json_str(s: &str) -> ReplayResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| ReplayError::serde(format!("parse keyframe document JSON: {e}")))
    }

    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReplayResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReplayError::serde(format!("parse keyframe document JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReplayResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReplayError::io(format!("open keyframe document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Encode as JSON text.
    ///
    /// Non-finite transforms are rejected: JSON has no encoding for them that reads back.
    pub fn to_json_string(&self, pretty: bool) -> ReplayResult<String> {
        self.check_finite()?;
        let out = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        out.map_err(|e| ReplayError::serde(format!("encode keyframe document: {e}")))
    }

    fn check_finite(&self) -> ReplayResult<()> {
        for (i, kf) in self.keyframes.iter().enumerate() {
            #[cfg(feature = "observations")]
            if kf
                .observation
                .is_some_and(|o| !o.camera_transform.is_finite())
            {
                return Err(ReplayError::validation(format!(
                    "keyframe {i}: non-finite observation camera transform"
                )));
            }
            if let Some(u) = kf
                .state_updates
                .iter()
                .find(|u| !u.absolute_transform.is_finite())
            {
                return Err(ReplayError::validation(format!(
                    "keyframe {i}: non-finite transform for instance {}",
                    u.instance_key
                )));
            }
            if let Some(u) = kf.user_transforms.iter().find(|u| !u.transform.is_finite()) {
                return Err(ReplayError::validation(format!(
                    "keyframe {i}: non-finite user transform '{}'",
                    u.name
                )));
            }
        }
        Ok(())
    }

    /// Decode every entry back into keyframes.
    pub fn to_keyframes(&self) -> Vec<Keyframe> {
        self.keyframes.iter().map(KeyframeEntry::to_keyframe).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/document.rs"]
mod tests;
