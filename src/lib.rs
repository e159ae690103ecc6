//! gfx-replay records the visual history of a simulated 3D scene as a compact keyframe log.
//!
//! A [`Recorder`] is told about asset loads and render-asset instance creations as they happen.
//! Tracked scene nodes report their own destruction through a [`DeletionHook`]. Each call to
//! [`Recorder::save_keyframe`] diffs every live instance against the last state it recorded
//! and closes one [`Keyframe`] holding only what changed.
//!
//! # Pipeline overview
//!
//! 1. **Record**: loads, creations, deletions and user poses accumulate in the current keyframe
//! 2. **Save**: per-instance state diffs are appended and the keyframe joins the saved log
//! 3. **Flush**: the saved log is exported as a [`KeyframeDocument`], then consolidated into
//!    the next keyframe so later output stays self-contained
//! 4. **Replay**: a [`Player`] steps any [`ReplayTarget`] through a document
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: recorder state lives behind `Rc<RefCell<_>>`; nodes and recorder
//!   share one thread.
//! - **No ownership of the scene**: the recorder holds weak references only. Nodes may outlive
//!   the recorder and the recorder may outlive nodes.
//! - **Opaque payloads**: load and creation descriptors are forwarded, never interpreted.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod export;
mod foundation;
mod keyframe;
mod record;
mod replay;
mod scene;

pub use export::document::{
    CreationEntry, KeyframeDocument, KeyframeEntry, LoadEntry, StateUpdateEntry,
    UserTransformEntry, export_keyframes,
};
pub use export::store::{InMemoryStore, JsonFileStore, KeyframeStore};
pub use foundation::core::{InstanceKey, Mat3, Mat4, NodeId, Quat, Vec3};
pub use foundation::error::{ReplayError, ReplayResult};
pub use foundation::math::Transform;
pub use keyframe::accumulator::{KeyframeAccumulator, record_deletion};
pub use keyframe::consolidate::{ConsolidateStats, consolidate};
pub use keyframe::model::{
    AssetInfo, AssetType, CreationDescriptor, InstanceState, Keyframe, LoadDescriptor,
    RenderAssetInstanceCreationInfo,
};
#[cfg(feature = "observations")]
pub use keyframe::model::{Observation, SensorType};
pub use record::recorder::{Recorder, RecorderOpts};
pub use replay::config::ReplayConfig;
pub use replay::manager::ReplayManager;
pub use replay::player::{Player, ReplayTarget, ReplayedInstance, ReplayedScene};
pub use scene::hook::DeletionHook;
pub use scene::node::SceneNode;
pub use scene::simple::SimpleNode;
