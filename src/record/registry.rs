use std::rc::{Rc, Weak};

use crate::foundation::core::{InstanceKey, NodeId};
use crate::keyframe::model::InstanceState;
use crate::scene::hook::{DeletionHook, DeletionListener, HookLink};
use crate::scene::node::SceneNode;

/// One tracked instance.
pub(crate) struct InstanceRecord {
    pub(crate) node_id: NodeId,
    pub(crate) key: InstanceKey,
    pub(crate) node: Weak<dyn SceneNode>,
    pub(crate) recent_state: Option<InstanceState>,
    hook: Weak<HookLink>,
}

/// Maps live scene nodes to instance keys.
///
/// Records are kept in creation order, which is also the order state updates are emitted in.
/// Lookup is a linear scan; tracked instance counts are in the hundreds.
pub(crate) struct InstanceRegistry {
    records: Vec<InstanceRecord>,
    next_key: InstanceKey,
}

impl InstanceRegistry {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            next_key: InstanceKey(0),
        }
    }

    /// Start tracking `node` and build the hook that reports its destruction to `listener`.
    ///
    /// The caller attaches the returned hook to the node once it no longer borrows the
    /// listener. Panics if the node is already tracked.
    pub(crate) fn register_creation<N>(
        &mut self,
        node: &Rc<N>,
        listener: Weak<dyn DeletionListener>,
    ) -> (InstanceKey, DeletionHook)
    where
        N: SceneNode + 'static,
    {
        let node_id = node.node_id();
        assert!(
            self.find_instance(node_id).is_none(),
            "render asset instance created twice for {node_id}"
        );

        let key = self.next_key;
        self.next_key = key.next();

        let (hook, link) = DeletionHook::new(node_id, listener);
        let weak_node: Weak<N> = Rc::downgrade(node);
        self.records.push(InstanceRecord {
            node_id,
            key,
            node: weak_node,
            recent_state: None,
            hook: link,
        });
        (key, hook)
    }

    pub(crate) fn find_instance(&self, node_id: NodeId) -> Option<InstanceKey> {
        self.position(node_id).map(|idx| self.records[idx].key)
    }

    /// Forget the record for a destroyed node and return its key.
    ///
    /// Only deletion hooks call this. A missing record means hooks and registry disagree, which
    /// is unrecoverable.
    pub(crate) fn on_external_deletion(&mut self, node_id: NodeId) -> InstanceKey {
        let idx = self.position(node_id);
        let Some(idx) = idx else {
            panic!("deletion reported for untracked {node_id}");
        };
        self.records.remove(idx).key
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut InstanceRecord> {
        self.records.iter_mut()
    }

    /// Disarm every outstanding hook and forget all records.
    ///
    /// Nodes destroyed afterwards drop their hooks without calling back.
    pub(crate) fn detach_all_hooks(&mut self) -> usize {
        let mut detached = 0;
        for record in self.records.drain(..) {
            if let Some(link) = record.hook.upgrade() {
                link.disarm();
                detached += 1;
            }
        }
        detached
    }

    fn position(&self, node_id: NodeId) -> Option<usize> {
        self.records.iter().position(|r| r.node_id == node_id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/registry.rs"]
mod tests;
