//! Lifetimes for referenced geometries.
//!
//! A host owns a tree of scopes. Some are volatile: they are reset between rows of the
//! same statement, so a geometry anchored there would vanish under a caller that still
//! holds its handle. [`anchor_scope`] picks the scope a new reference lives in, and
//! [`ScopeTeardown`] is how the host reports that a scope went away.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use log::debug;

use crate::error::{GeoExactError, Result};

/// Identifier of a host scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u64);

/// The host's view of its scope tree.
pub trait ScopeHost: Send + Sync {
    /// The scope the current call runs in.
    fn current_scope(&self) -> ScopeId;

    /// `None` for the root.
    fn parent(&self, scope: ScopeId) -> Option<ScopeId>;

    fn is_volatile(&self, scope: ScopeId) -> bool;

    /// Fallback scope that lives for the whole client message.
    fn message_scope(&self) -> ScopeId;
}

/// Notified when a scope is reset or deleted.
pub trait ScopeTeardown: Send + Sync {
    fn on_teardown(&self, scope: ScopeId) -> Result<()>;
}

/// The nearest non-volatile scope from the current one towards the root, or the message
/// scope when every ancestor is volatile.
pub fn anchor_scope(host: &dyn ScopeHost) -> ScopeId {
    let mut scope = Some(host.current_scope());
    while let Some(s) = scope {
        if !host.is_volatile(s) {
            return s;
        }
        scope = host.parent(s);
    }
    host.message_scope()
}

#[derive(Debug, Clone, Copy)]
struct ScopeNode {
    parent: Option<ScopeId>,
    volatile: bool,
}

#[derive(Debug)]
struct TreeState {
    nodes: IndexMap<ScopeId, ScopeNode>,
    current: ScopeId,
    next_id: u64,
}

impl TreeState {
    fn node(&self, scope: ScopeId) -> Result<ScopeNode> {
        self.nodes
            .get(&scope)
            .copied()
            .ok_or_else(|| GeoExactError::InvalidArgument(format!("unknown scope {}", scope.0)))
    }

    fn is_descendant(&self, mut scope: ScopeId, ancestor: ScopeId) -> bool {
        loop {
            if scope == ancestor {
                return true;
            }
            match self.nodes.get(&scope).and_then(|n| n.parent) {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    /// Removes every strict descendant of `scope`, deepest first.
    fn remove_descendants(&mut self, scope: ScopeId) -> Vec<ScopeId> {
        let mut removed: Vec<ScopeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|s| *s != scope && self.is_descendant(*s, scope))
            .collect();
        // children are always created after their parent
        removed.reverse();
        for s in &removed {
            self.nodes.shift_remove(s);
        }
        if self.nodes.get(&self.current).is_none() {
            self.current = scope;
        }
        removed
    }
}

/// A self-contained [`ScopeHost`] for embedders without a scope tree of their own.
///
/// The tree starts with a root scope and a message scope below it; the message scope is
/// current. Neither of the two can be deleted.
pub struct ScopeTree {
    state: Mutex<TreeState>,
    listeners: Mutex<Vec<Arc<dyn ScopeTeardown>>>,
}

impl ScopeTree {
    pub const ROOT: ScopeId = ScopeId(0);
    pub const MESSAGE: ScopeId = ScopeId(1);

    pub fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(
            Self::ROOT,
            ScopeNode {
                parent: None,
                volatile: false,
            },
        );
        nodes.insert(
            Self::MESSAGE,
            ScopeNode {
                parent: Some(Self::ROOT),
                volatile: false,
            },
        );
        Self {
            state: Mutex::new(TreeState {
                nodes,
                current: Self::MESSAGE,
                next_id: 2,
            }),
            listeners: Mutex::new(vec![]),
        }
    }

    fn state(&self) -> MutexGuard<'_, TreeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a listener, typically a [`ReferencePool`][crate::storage::ReferencePool].
    pub fn subscribe(&self, listener: Arc<dyn ScopeTeardown>) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    pub fn create_child(&self, parent: ScopeId, volatile: bool) -> Result<ScopeId> {
        let mut state = self.state();
        state.node(parent)?;
        let id = ScopeId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            ScopeNode {
                parent: Some(parent),
                volatile,
            },
        );
        debug!("created scope {} under {} (volatile: {volatile})", id.0, parent.0);
        Ok(id)
    }

    /// Make `scope` current and return the previously current scope.
    pub fn switch_to(&self, scope: ScopeId) -> Result<ScopeId> {
        let mut state = self.state();
        state.node(scope)?;
        Ok(std::mem::replace(&mut state.current, scope))
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.state().nodes.contains_key(&scope)
    }

    /// Tear down the contents of `scope`: its children are deleted, the scope itself
    /// survives empty.
    pub fn reset(&self, scope: ScopeId) -> Result<()> {
        let mut torn_down = {
            let mut state = self.state();
            state.node(scope)?;
            state.remove_descendants(scope)
        };
        torn_down.push(scope);
        self.notify(&torn_down)
    }

    /// Tear down `scope` and every scope below it.
    pub fn delete(&self, scope: ScopeId) -> Result<()> {
        if scope == Self::ROOT || scope == Self::MESSAGE {
            return Err(GeoExactError::InvalidArgument(format!(
                "scope {} cannot be deleted",
                scope.0
            )));
        }
        let mut torn_down = {
            let mut state = self.state();
            let node = state.node(scope)?;
            let removed = state.remove_descendants(scope);
            state.nodes.shift_remove(&scope);
            if state.current == scope {
                state.current = node.parent.unwrap_or(Self::ROOT);
            }
            removed
        };
        torn_down.push(scope);
        self.notify(&torn_down)
    }

    fn notify(&self, scopes: &[ScopeId]) -> Result<()> {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for scope in scopes {
            debug!("tearing down scope {}", scope.0);
            for listener in &listeners {
                listener.on_teardown(*scope)?;
            }
        }
        Ok(())
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeHost for ScopeTree {
    fn current_scope(&self) -> ScopeId {
        self.state().current
    }

    fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.state().nodes.get(&scope).and_then(|n| n.parent)
    }

    fn is_volatile(&self, scope: ScopeId) -> bool {
        self.state().nodes.get(&scope).is_some_and(|n| n.volatile)
    }

    fn message_scope(&self) -> ScopeId {
        Self::MESSAGE
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Recorder(Mutex<Vec<ScopeId>>);

    impl ScopeTeardown for Recorder {
        fn on_teardown(&self, scope: ScopeId) -> Result<()> {
            self.0.lock().unwrap().push(scope);
            Ok(())
        }
    }

    #[test]
    fn anchors_past_volatile_scopes() {
        let tree = ScopeTree::new();
        let portal = tree.create_child(ScopeTree::MESSAGE, false).unwrap();
        let row = tree.create_child(portal, true).unwrap();
        let expr = tree.create_child(row, true).unwrap();
        tree.switch_to(expr).unwrap();
        assert_eq!(anchor_scope(&tree), portal);

        tree.switch_to(portal).unwrap();
        assert_eq!(anchor_scope(&tree), portal);
    }

    #[test]
    fn falls_back_to_message_scope() {
        struct AllVolatile;
        impl ScopeHost for AllVolatile {
            fn current_scope(&self) -> ScopeId {
                ScopeId(7)
            }
            fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
                (scope.0 > 5).then(|| ScopeId(scope.0 - 1))
            }
            fn is_volatile(&self, _: ScopeId) -> bool {
                true
            }
            fn message_scope(&self) -> ScopeId {
                ScopeId(42)
            }
        }
        assert_eq!(anchor_scope(&AllVolatile), ScopeId(42));
    }

    #[test]
    fn delete_cascades() {
        let tree = ScopeTree::new();
        let recorder = Arc::new(Recorder(Mutex::new(vec![])));
        tree.subscribe(recorder.clone());

        let a = tree.create_child(ScopeTree::MESSAGE, false).unwrap();
        let b = tree.create_child(a, true).unwrap();
        let c = tree.create_child(b, false).unwrap();
        tree.switch_to(c).unwrap();

        tree.delete(a).unwrap();
        assert_eq!(*recorder.0.lock().unwrap(), vec![c, b, a]);
        assert!(!tree.contains(b));
        assert_eq!(tree.current_scope(), ScopeTree::MESSAGE);
    }

    #[test]
    fn reset_keeps_scope() {
        let tree = ScopeTree::new();
        let recorder = Arc::new(Recorder(Mutex::new(vec![])));
        tree.subscribe(recorder.clone());
        let a = tree.create_child(ScopeTree::MESSAGE, false).unwrap();

        tree.reset(ScopeTree::MESSAGE).unwrap();
        assert_eq!(*recorder.0.lock().unwrap(), vec![a, ScopeTree::MESSAGE]);
        assert!(tree.contains(ScopeTree::MESSAGE));
        assert!(!tree.contains(a));
        assert!(tree.delete(ScopeTree::ROOT).is_err());
    }
}
