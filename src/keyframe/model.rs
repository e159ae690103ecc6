use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::foundation::core::{InstanceKey, Vec3};
use crate::foundation::error::{ReplayError, ReplayResult};
use crate::foundation::math::Transform;

/// Opaque asset-load payload. Stored and forwarded in order, never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadDescriptor(pub serde_json::Value);

/// Opaque instance-creation payload. Stored and forwarded in order, never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreationDescriptor(pub serde_json::Value);

macro_rules! opaque_payload {
    ($ty:ident) => {
        impl $ty {
            /// Capture any serializable value as an opaque payload.
            pub fn from_serialize<T: Serialize>(value: &T) -> ReplayResult<Self> {
                serde_json::to_value(value)
                    .map(Self)
                    .map_err(|e| ReplayError::serde(format!("encode {}: {e}", stringify!($ty))))
            }

            /// Decode the payload back into a concrete type chosen by the consumer.
            pub fn deserialize_into<T: DeserializeOwned>(&self) -> ReplayResult<T> {
                serde_json::from_value(self.0.clone())
                    .map_err(|e| ReplayError::serde(format!("decode {}: {e}", stringify!($ty))))
            }
        }
    };
}

opaque_payload!(LoadDescriptor);
opaque_payload!(CreationDescriptor);

/// Render asset kind, as carried by [`AssetInfo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Any asset the loader resolves by file extension.
    #[default]
    Unknown,
    /// Plain mesh with materials.
    Mesh,
    /// Mesh with per-vertex semantic ids.
    InstanceMesh,
    /// Primitive generated on the fly (cube, sphere, ...).
    Primitive,
}

/// Typed asset-load payload for engines that use the stock descriptor layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    /// Asset kind.
    #[serde(rename = "type", default)]
    pub asset_type: AssetType,
    /// Asset path or primitive handle.
    pub filepath: String,
    /// Scale from file units to meters.
    #[serde(default = "default_unit_to_meters")]
    pub virtual_unit_to_meters: f64,
    /// Force flat shading on load.
    #[serde(default)]
    pub force_flat_shading: bool,
}

fn default_unit_to_meters() -> f64 {
    1.0
}

impl AssetInfo {
    /// Asset loaded from `filepath` with default settings.
    pub fn new(filepath: impl Into<String>) -> Self {
        Self {
            asset_type: AssetType::Unknown,
            filepath: filepath.into(),
            virtual_unit_to_meters: 1.0,
            force_flat_shading: false,
        }
    }
}

impl From<AssetInfo> for LoadDescriptor {
    fn from(info: AssetInfo) -> Self {
        // Plain data with string keys; encoding cannot fail.
        LoadDescriptor(serde_json::to_value(info).unwrap_or(serde_json::Value::Null))
    }
}

/// Typed instance-creation payload for engines that use the stock descriptor layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderAssetInstanceCreationInfo {
    /// Path of a previously loaded asset.
    pub filepath: String,
    /// Optional non-uniform scale applied at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    /// Instance never moves after creation.
    #[serde(default)]
    pub is_static: bool,
    /// Visible to color/depth sensors.
    #[serde(default = "default_true", rename = "isRGBD")]
    pub is_rgbd: bool,
    /// Visible to semantic sensors.
    #[serde(default)]
    pub is_semantic: bool,
    /// Light setup to render with.
    #[serde(default)]
    pub light_setup_key: String,
}

fn default_true() -> bool {
    true
}

impl RenderAssetInstanceCreationInfo {
    /// Creation of an instance of `filepath` with default flags.
    pub fn new(filepath: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            scale: None,
            is_static: false,
            is_rgbd: true,
            is_semantic: false,
            light_setup_key: String::new(),
        }
    }
}

impl From<RenderAssetInstanceCreationInfo> for CreationDescriptor {
    fn from(info: RenderAssetInstanceCreationInfo) -> Self {
        CreationDescriptor(serde_json::to_value(info).unwrap_or(serde_json::Value::Null))
    }
}

/// Observable, diffable snapshot of one instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceState {
    /// World-space pose.
    #[serde(rename = "absoluteTransform")]
    pub abs_transform: Transform,
    /// Semantic tag used by semantic sensors.
    pub semantic_id: u32,
}

/// Sensor kind an [`Observation`] was rendered with.
#[cfg(feature = "observations")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    /// Not a rendering sensor.
    #[default]
    None,
    /// RGB(A) camera.
    Color,
    /// Depth camera.
    Depth,
    /// Surface normal camera.
    Normal,
    /// Semantic id camera.
    Semantic,
}

/// Camera observation rendered at the end of a keyframe.
#[cfg(feature = "observations")]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// World-space camera pose.
    pub camera_transform: Transform,
    /// Sensor that produced the observation.
    pub sensor_type: SensorType,
}

/// Everything that changed during one recording interval.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    /// Asset loads, in report order.
    pub loads: Vec<LoadDescriptor>,
    /// Instance creations, in report order.
    pub creations: Vec<(InstanceKey, CreationDescriptor)>,
    /// Instances deleted whose creation is not part of this keyframe.
    pub deletions: Vec<InstanceKey>,
    /// At most one entry per instance, in diff order.
    pub state_updates: Vec<(InstanceKey, InstanceState)>,
    /// Named user poses; the last write for a name wins.
    pub user_transforms: BTreeMap<String, Transform>,
    /// Camera observation for this interval; the last one recorded wins.
    #[cfg(feature = "observations")]
    pub observation: Option<Observation>,
}

impl Keyframe {
    /// `true` when nothing at all was recorded.
    pub fn is_empty(&self) -> bool {
        #[cfg(feature = "observations")]
        if self.observation.is_some() {
            return false;
        }
        self.loads.is_empty()
            && self.creations.is_empty()
            && self.deletions.is_empty()
            && self.state_updates.is_empty()
            && self.user_transforms.is_empty()
    }

    /// Position of `key` in `creations`, if it is created here.
    pub fn creation_index(&self, key: InstanceKey) -> Option<usize> {
        self.creations.iter().position(|(k, _)| *k == key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframe/model.rs"]
mod tests;
