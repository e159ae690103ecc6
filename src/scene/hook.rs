use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::NodeId;

/// Receiver of node-destruction notifications.
pub(crate) trait DeletionListener {
    fn on_node_deleted(&self, node: NodeId);
}

/// State shared between a [`DeletionHook`] (owned by the node) and the registry that armed it.
///
/// The registry only keeps a `Weak` to this link, so it never extends the hook's lifetime; the
/// hook only keeps a `Weak` to its listener, so it never extends the recorder's lifetime.
pub(crate) struct HookLink {
    node: NodeId,
    listener: RefCell<Option<Weak<dyn DeletionListener>>>,
}

impl HookLink {
    pub(crate) fn disarm(&self) {
        self.listener.borrow_mut().take();
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.listener.borrow().is_some()
    }
}

/// Destruction detector attached to a scene node.
///
/// The node owns the hook and must drop it when the node itself is destroyed. Dropping an armed
/// hook notifies the recorder synchronously, exactly once. A hook whose recorder was torn down
/// first has been disarmed and drops silently.
pub struct DeletionHook {
    link: Rc<HookLink>,
}

impl DeletionHook {
    pub(crate) fn new(node: NodeId, listener: Weak<dyn DeletionListener>) -> (Self, Weak<HookLink>) {
        let link = Rc::new(HookLink {
            node,
            listener: RefCell::new(Some(listener)),
        });
        let weak = Rc::downgrade(&link);
        (Self { link }, weak)
    }

    /// Node this hook watches.
    pub fn node_id(&self) -> NodeId {
        self.link.node
    }

    /// `false` once the owning recorder has detached the hook.
    pub fn is_armed(&self) -> bool {
        self.link.is_armed()
    }
}

impl std::fmt::Debug for DeletionHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionHook")
            .field("node", &self.link.node)
            .field("armed", &self.is_armed())
            .finish()
    }
}

impl Drop for DeletionHook {
    fn drop(&mut self) {
        // Take first so the listener sees a disarmed hook even if it re-enters.
        let listener = self.link.listener.borrow_mut().take();
        if let Some(listener) = listener.and_then(|w| w.upgrade()) {
            listener.on_node_deleted(self.link.node);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/hook.rs"]
mod tests;
