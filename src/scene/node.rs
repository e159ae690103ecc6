use crate::foundation::core::NodeId;
use crate::foundation::math::Transform;
use crate::scene::hook::DeletionHook;

/// Contract a scene graph node must satisfy to be recorded.
///
/// Recorders hold nodes through `Weak` references only. Queries must be side-effect free: in
/// particular they must not destroy scene nodes, since recorder state is borrowed while they run.
pub trait SceneNode {
    /// Identity token, unique among nodes alive at the same time.
    fn node_id(&self) -> NodeId;

    /// World-space pose of the node.
    fn absolute_transform(&self) -> Transform;

    /// Semantic tag of the node.
    fn semantic_id(&self) -> u32;

    /// Take ownership of `hook` and drop it when this node is destroyed, not earlier.
    fn attach_deletion_hook(&self, hook: DeletionHook);
}
