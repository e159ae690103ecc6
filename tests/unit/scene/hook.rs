use std::cell::RefCell;

use super::*;

#[derive(Default)]
struct Log(RefCell<Vec<NodeId>>);

impl DeletionListener for Log {
    fn on_node_deleted(&self, node: NodeId) {
        self.0.borrow_mut().push(node);
    }
}

fn listener(log: &Rc<Log>) -> Weak<dyn DeletionListener> {
    let weak: Weak<Log> = Rc::downgrade(log);
    weak
}

#[test]
fn drop_notifies_exactly_once() {
    let log = Rc::new(Log::default());
    let (hook, _link) = DeletionHook::new(NodeId(7), listener(&log));
    assert!(hook.is_armed());
    drop(hook);
    assert_eq!(*log.0.borrow(), vec![NodeId(7)]);
}

#[test]
fn disarmed_hook_drops_silently() {
    let log = Rc::new(Log::default());
    let (hook, link) = DeletionHook::new(NodeId(1), listener(&log));
    link.upgrade().unwrap().disarm();
    assert!(!hook.is_armed());
    drop(hook);
    assert!(log.0.borrow().is_empty());
}

#[test]
fn dead_listener_is_not_called() {
    let log = Rc::new(Log::default());
    let (hook, _link) = DeletionHook::new(NodeId(2), listener(&log));
    drop(log);
    drop(hook);
}

#[test]
fn registry_link_does_not_keep_hook_alive() {
    let log = Rc::new(Log::default());
    let (hook, link) = DeletionHook::new(NodeId(3), listener(&log));
    drop(hook);
    assert!(link.upgrade().is_none());
}
