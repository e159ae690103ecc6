use crate::keyframe::model::InstanceState;
use crate::record::registry::InstanceRecord;
use crate::scene::node::SceneNode;

/// Stateless change detector for tracked instances.
pub(crate) struct StateDiffer;

impl StateDiffer {
    /// Current observable state of `node`.
    pub(crate) fn compute_state(node: &dyn SceneNode) -> InstanceState {
        InstanceState {
            abs_transform: node.absolute_transform(),
            semantic_id: node.semantic_id(),
        }
    }

    /// Return the new state when it differs from the last one recorded on `record`.
    ///
    /// The first observation always counts as a change. Comparison is exact; there is no
    /// tolerance. A non-finite pose is not recorded: the instance keeps its last finite state.
    pub(crate) fn diff_and_update(
        record: &mut InstanceRecord,
        node: &dyn SceneNode,
    ) -> Option<InstanceState> {
        let state = Self::compute_state(node);
        if !state.abs_transform.is_finite() {
            tracing::warn!(
                key = %record.key,
                node = %record.node_id,
                "skipping non-finite instance pose"
            );
            return None;
        }
        if record.recent_state == Some(state) {
            return None;
        }
        record.recent_state = Some(state);
        Some(state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/differ.rs"]
mod tests;
