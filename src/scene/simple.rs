use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::{NodeId, Quat, Vec3};
use crate::foundation::math::Transform;
use crate::scene::hook::DeletionHook;
use crate::scene::node::SceneNode;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Minimal in-memory scene node.
///
/// Nodes are shared through `Rc`; the node is destroyed, and its deletion hooks fire, when the
/// last `Rc` goes away. Children hold a strong reference to their parent, so a parent outlives
/// all of its children.
pub struct SimpleNode {
    id: NodeId,
    parent: Option<Rc<SimpleNode>>,
    local: Cell<Transform>,
    semantic_id: Cell<u32>,
    hooks: RefCell<Vec<DeletionHook>>,
}

impl SimpleNode {
    /// New root node at the identity pose.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::build(None))
    }

    /// New child of `parent` at the identity local pose.
    pub fn with_parent(parent: &Rc<SimpleNode>) -> Rc<Self> {
        Rc::new(Self::build(Some(Rc::clone(parent))))
    }

    fn build(parent: Option<Rc<SimpleNode>>) -> Self {
        Self {
            id: NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)),
            parent,
            local: Cell::new(Transform::IDENTITY),
            semantic_id: Cell::new(0),
            hooks: RefCell::new(Vec::new()),
        }
    }

    /// Parent node, if any.
    pub fn parent(&self) -> Option<&Rc<SimpleNode>> {
        self.parent.as_ref()
    }

    /// Pose relative to the parent.
    pub fn local_transform(&self) -> Transform {
        self.local.get()
    }

    /// Replace the pose relative to the parent.
    pub fn set_local_transform(&self, t: Transform) {
        self.local.set(t);
    }

    /// Replace the local translation, keeping the rotation.
    pub fn set_translation(&self, translation: Vec3) {
        let mut t = self.local.get();
        t.translation = translation;
        self.local.set(t);
    }

    /// Replace the local rotation, keeping the translation.
    pub fn set_rotation(&self, rotation: Quat) {
        let mut t = self.local.get();
        t.rotation = rotation;
        self.local.set(t);
    }

    /// Replace the semantic tag.
    pub fn set_semantic_id(&self, id: u32) {
        self.semantic_id.set(id);
    }

    /// Number of attached hooks that are still armed.
    pub fn armed_hook_count(&self) -> usize {
        self.hooks.borrow().iter().filter(|h| h.is_armed()).count()
    }

    /// Number of attached hooks, armed or not.
    pub fn hook_count(&self) -> usize {
        self.hooks.borrow().len()
    }
}

impl SceneNode for SimpleNode {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn absolute_transform(&self) -> Transform {
        match &self.parent {
            Some(parent) => parent.absolute_transform() * self.local.get(),
            None => self.local.get(),
        }
    }

    fn semantic_id(&self) -> u32 {
        self.semantic_id.get()
    }

    fn attach_deletion_hook(&self, hook: DeletionHook) {
        self.hooks.borrow_mut().push(hook);
    }
}

impl std::fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleNode")
            .field("id", &self.id)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("local", &self.local.get())
            .field("semantic_id", &self.semantic_id.get())
            .field("hooks", &self.hooks.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/simple.rs"]
mod tests;
