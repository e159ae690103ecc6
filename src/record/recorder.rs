use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::export::document::export_keyframes;
use crate::export::store::KeyframeStore;
use crate::foundation::core::{InstanceKey, NodeId, Quat, Vec3};
use crate::foundation::error::ReplayResult;
use crate::keyframe::accumulator::KeyframeAccumulator;
use crate::keyframe::consolidate::consolidate;
#[cfg(feature = "observations")]
use crate::foundation::math::Transform;
#[cfg(feature = "observations")]
use crate::keyframe::model::{Observation, SensorType};
use crate::keyframe::model::{CreationDescriptor, Keyframe, LoadDescriptor};
use crate::record::registry::InstanceRegistry;
use crate::scene::hook::DeletionListener;
use crate::scene::node::SceneNode;

/// Options controlling [`Recorder`] output.
#[derive(Clone, Debug, Default)]
pub struct RecorderOpts {
    /// Pretty-print text produced by [`Recorder::write_saved_keyframes_to_string`].
    pub pretty_json: bool,
}

pub(crate) struct RecorderState {
    registry: InstanceRegistry,
    accumulator: KeyframeAccumulator,
    saved: Vec<Keyframe>,
}

impl RecorderState {
    fn on_delete_render_asset_instance(&mut self, node: NodeId) {
        let key = self.registry.on_external_deletion(node);
        let cancelled = self.accumulator.record_deletion(key);
        tracing::debug!(%key, %node, cancelled, "render asset instance deleted");
    }

    fn consolidate_saved(&mut self) {
        consolidate(&self.saved, self.accumulator.current_mut());
        self.saved.clear();
    }
}

impl DeletionListener for RefCell<RecorderState> {
    fn on_node_deleted(&self, node: NodeId) {
        self.borrow_mut().on_delete_render_asset_instance(node);
    }
}

/// Records the minimal keyframe log needed to replay a scene's visual history.
///
/// Single-threaded: every call runs to completion on the caller's thread. Tracked nodes report
/// their own destruction through deletion hooks; dropping the recorder disarms those hooks
/// first, so nodes may outlive it.
pub struct Recorder {
    state: Rc<RefCell<RecorderState>>,
    opts: RecorderOpts,
}

impl Recorder {
    /// Create a recorder with default options.
    pub fn new() -> Self {
        Self::with_opts(RecorderOpts::default())
    }

    /// Create a recorder with explicit options.
    pub fn with_opts(opts: RecorderOpts) -> Self {
        Self {
            state: Rc::new(RefCell::new(RecorderState {
                registry: InstanceRegistry::new(),
                accumulator: KeyframeAccumulator::new(),
                saved: Vec::new(),
            })),
            opts,
        }
    }

    /// Record an asset load in the current keyframe.
    pub fn on_load_render_asset(&mut self, load: impl Into<LoadDescriptor>) {
        self.state.borrow_mut().accumulator.record_load(load.into());
    }

    /// Start tracking `node` as a new render asset instance.
    ///
    /// # Panics
    ///
    /// If `node` is already tracked by this recorder.
    pub fn on_create_render_asset_instance<N>(
        &mut self,
        node: &Rc<N>,
        creation: impl Into<CreationDescriptor>,
    ) -> InstanceKey
    where
        N: SceneNode + 'static,
    {
        let weak_state: Weak<RefCell<RecorderState>> = Rc::downgrade(&self.state);
        let (key, hook) = {
            let mut state = self.state.borrow_mut();
            let (key, hook) = state.registry.register_creation(node, weak_state);
            state.accumulator.record_creation(key, creation.into());
            (key, hook)
        };
        // Attach outside the borrow: a node that refuses the hook drops it, which calls back.
        node.attach_deletion_hook(hook);
        tracing::debug!(%key, node = %node.node_id(), "render asset instance created");
        key
    }

    /// Diff all tracked instances, then close the current keyframe into the saved log.
    #[tracing::instrument(skip_all)]
    pub fn save_keyframe(&mut self) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let updates = state
            .accumulator
            .update_all_instance_states(&mut state.registry);
        let keyframe = state.accumulator.close_and_reset();
        state.saved.push(keyframe);
        tracing::trace!(updates, saved = state.saved.len(), "keyframe saved");
    }

    /// Set a named user pose in the current keyframe; the last value per name wins.
    pub fn add_user_transform_to_keyframe(
        &mut self,
        name: impl Into<String>,
        translation: Vec3,
        rotation: Quat,
    ) {
        self.state
            .borrow_mut()
            .accumulator
            .record_user_pose(name, translation, rotation);
    }

    /// Attach a camera observation to the current keyframe; the last one per keyframe wins.
    #[cfg(feature = "observations")]
    pub fn add_observation_to_keyframe(
        &mut self,
        camera_transform: Transform,
        sensor_type: SensorType,
    ) {
        self.state
            .borrow_mut()
            .accumulator
            .record_observation(Observation {
                camera_transform,
                sensor_type,
            });
    }

    /// Export the saved log to `store`, then fold it into the current keyframe.
    ///
    /// With no saved keyframes nothing is written. If the store fails the saved log is kept
    /// intact so a later flush can retry.
    #[tracing::instrument(skip_all)]
    pub fn write_saved_keyframes_to_store(
        &mut self,
        store: &mut dyn KeyframeStore,
    ) -> ReplayResult<()> {
        let doc = export_keyframes(&self.state.borrow().saved);
        if let Some(doc) = doc {
            store.write_document(&doc)?;
        }
        self.state.borrow_mut().consolidate_saved();
        Ok(())
    }

    /// Export the saved log as JSON text, then fold it into the current keyframe.
    ///
    /// With no saved keyframes the result is an empty string. If encoding fails the saved log
    /// is kept intact.
    #[tracing::instrument(skip_all)]
    pub fn write_saved_keyframes_to_string(&mut self) -> ReplayResult<String> {
        let doc = export_keyframes(&self.state.borrow().saved);
        let text = match doc {
            Some(doc) => doc.to_json_string(self.opts.pretty_json)?,
            None => String::new(),
        };
        self.state.borrow_mut().consolidate_saved();
        Ok(text)
    }

    /// Instance key assigned to `node`, if it is tracked.
    pub fn find_instance(&self, node: NodeId) -> Option<InstanceKey> {
        self.state.borrow().registry.find_instance(node)
    }

    /// Number of tracked, live instances.
    pub fn num_live_instances(&self) -> usize {
        self.state.borrow().registry.len()
    }

    /// Number of keyframes waiting to be exported.
    pub fn num_saved_keyframes(&self) -> usize {
        self.state.borrow().saved.len()
    }

    /// Copy of the in-progress keyframe.
    pub fn current_keyframe(&self) -> Keyframe {
        self.state.borrow().accumulator.current().clone()
    }

    /// Copy of the saved log.
    pub fn saved_keyframes(&self) -> Vec<Keyframe> {
        self.state.borrow().saved.clone()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        let detached = self.state.borrow_mut().registry.detach_all_hooks();
        if detached > 0 {
            tracing::debug!(detached, "detached deletion hooks on recorder teardown");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/recorder.rs"]
mod tests;
