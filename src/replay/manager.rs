use std::path::Path;
use std::rc::Rc;

use crate::export::document::KeyframeDocument;
use crate::export::store::KeyframeStore;
use crate::foundation::core::{InstanceKey, Quat, Vec3};
use crate::foundation::error::ReplayResult;
use crate::keyframe::model::{CreationDescriptor, LoadDescriptor};
use crate::record::recorder::{Recorder, RecorderOpts};
use crate::replay::config::ReplayConfig;
use crate::replay::player::Player;
use crate::scene::node::SceneNode;

fn not_enabled(op: &str) {
    tracing::error!("{op}: not enabled. See ReplayConfig::enable_gfx_replay_save");
}

/// Owns the optional recorder and hands out players.
///
/// Recording calls on a manager built without `enable_gfx_replay_save` log an error and do
/// nothing. Reading keyframes back works either way.
pub struct ReplayManager {
    config: ReplayConfig,
    recorder: Option<Recorder>,
}

impl ReplayManager {
    /// Build a manager; a recorder is created only when recording is enabled.
    pub fn new(config: ReplayConfig) -> Self {
        let recorder = config.enable_gfx_replay_save.then(|| {
            Recorder::with_opts(RecorderOpts {
                pretty_json: config.pretty_json,
            })
        });
        Self { config, recorder }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// `true` when a recorder exists.
    pub fn is_recording_enabled(&self) -> bool {
        self.recorder.is_some()
    }

    /// The recorder, if recording is enabled.
    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    /// Mutable access to the recorder, if recording is enabled.
    pub fn recorder_mut(&mut self) -> Option<&mut Recorder> {
        self.recorder.as_mut()
    }

    /// See [`Recorder::on_load_render_asset`].
    pub fn on_load_render_asset(&mut self, load: impl Into<LoadDescriptor>) {
        match self.recorder.as_mut() {
            Some(rec) => rec.on_load_render_asset(load),
            None => not_enabled("on_load_render_asset"),
        }
    }

    /// See [`Recorder::on_create_render_asset_instance`]. `None` when recording is disabled.
    pub fn on_create_render_asset_instance<N>(
        &mut self,
        node: &Rc<N>,
        creation: impl Into<CreationDescriptor>,
    ) -> Option<InstanceKey>
    where
        N: SceneNode + 'static,
    {
        match self.recorder.as_mut() {
            Some(rec) => Some(rec.on_create_render_asset_instance(node, creation)),
            None => {
                not_enabled("on_create_render_asset_instance");
                None
            }
        }
    }

    /// See [`Recorder::save_keyframe`].
    pub fn save_keyframe(&mut self) {
        match self.recorder.as_mut() {
            Some(rec) => rec.save_keyframe(),
            None => not_enabled("save_keyframe"),
        }
    }

    /// See [`Recorder::add_user_transform_to_keyframe`].
    pub fn add_user_transform_to_keyframe(
        &mut self,
        name: impl Into<String>,
        translation: Vec3,
        rotation: Quat,
    ) {
        match self.recorder.as_mut() {
            Some(rec) => rec.add_user_transform_to_keyframe(name, translation, rotation),
            None => not_enabled("add_user_transform_to_keyframe"),
        }
    }

    /// See [`Recorder::add_observation_to_keyframe`].
    #[cfg(feature = "observations")]
    pub fn add_observation_to_keyframe(
        &mut self,
        camera_transform: crate::foundation::math::Transform,
        sensor_type: crate::keyframe::model::SensorType,
    ) {
        match self.recorder.as_mut() {
            Some(rec) => rec.add_observation_to_keyframe(camera_transform, sensor_type),
            None => not_enabled("add_observation_to_keyframe"),
        }
    }

    /// See [`Recorder::write_saved_keyframes_to_store`].
    pub fn write_saved_keyframes_to_store(
        &mut self,
        store: &mut dyn KeyframeStore,
    ) -> ReplayResult<()> {
        match self.recorder.as_mut() {
            Some(rec) => rec.write_saved_keyframes_to_store(store),
            None => {
                not_enabled("write_saved_keyframes_to_store");
                Ok(())
            }
        }
    }

    /// See [`Recorder::write_saved_keyframes_to_string`]. Empty when recording is disabled.
    pub fn write_saved_keyframes_to_string(&mut self) -> ReplayResult<String> {
        match self.recorder.as_mut() {
            Some(rec) => rec.write_saved_keyframes_to_string(),
            None => {
                not_enabled("write_saved_keyframes_to_string");
                Ok(String::new())
            }
        }
    }

    /// Player over a keyframe document on disk.
    pub fn read_keyframes_from_file(&self, path: impl AsRef<Path>) -> ReplayResult<Player> {
        let path = path.as_ref();
        let player = Player::from_path(path)?;
        tracing::info!(
            path = %path.display(),
            keyframes = player.num_keyframes(),
            "read keyframes"
        );
        Ok(player)
    }

    /// Player over keyframe document JSON text.
    pub fn read_keyframes_from_str(&self, json: &str) -> ReplayResult<Player> {
        Ok(Player::from_document(&KeyframeDocument::from_json_str(json)?))
    }
}

impl Default for ReplayManager {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/manager.rs"]
mod tests;
