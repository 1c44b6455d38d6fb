use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::{GeoExactError, Result};
use crate::exact::PreparedGeometry;
use crate::io::wkt::write_exact;
use crate::storage::{anchor_scope, PersistenceStrategy, ScopeHost, ScopeId, ScopeTeardown};

/// Text rendering of a handle whose scope was torn down.
pub const DELETED_TEXT: &str = "-deleted-";

/// Opaque handle to a geometry held by a [`ReferencePool`]. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefHandle(pub u64);

#[derive(Debug)]
struct PoolEntry {
    geometry: Arc<PreparedGeometry>,
    scope: ScopeId,
}

#[derive(Debug, Default)]
struct PoolState {
    entries: IndexMap<RefHandle, PoolEntry>,
    next_id: u64,
}

/// Registry of referenced geometries, each owned until its anchoring scope tears down.
#[derive(Debug, Default)]
pub struct ReferencePool {
    state: Mutex<PoolState>,
}

impl ReferencePool {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, PoolState>> {
        self.state.lock().map_err(|_| GeoExactError::PoolPoisoned)
    }

    pub fn insert(&self, geometry: PreparedGeometry, scope: ScopeId) -> Result<RefHandle> {
        let mut state = self.state()?;
        state.next_id = state.next_id.checked_add(1).ok_or(GeoExactError::Overflow)?;
        let handle = RefHandle(state.next_id);
        state.entries.insert(
            handle,
            PoolEntry {
                geometry: Arc::new(geometry),
                scope,
            },
        );
        debug!("referenced geometry {} in scope {}", handle.0, scope.0);
        Ok(handle)
    }

    pub fn contains(&self, handle: RefHandle) -> Result<bool> {
        Ok(self.state()?.entries.contains_key(&handle))
    }

    pub fn get(&self, handle: RefHandle) -> Result<Arc<PreparedGeometry>> {
        self.state()?
            .entries
            .get(&handle)
            .map(|e| e.geometry.clone())
            .ok_or(GeoExactError::StaleHandle(handle.0))
    }

    /// Drop every geometry anchored to `scope`, returning how many were released.
    pub fn release_all(&self, scope: ScopeId) -> Result<usize> {
        let mut state = self.state()?;
        let before = state.entries.len();
        state.entries.retain(|_, e| e.scope != scope);
        let released = before - state.entries.len();
        if released > 0 {
            debug!("released {released} geometries of scope {}", scope.0);
        }
        Ok(released)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.state()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl ScopeTeardown for ReferencePool {
    fn on_teardown(&self, scope: ScopeId) -> Result<()> {
        self.release_all(scope).map(|_| ())
    }
}

/// Hands out [`RefHandle`]s into a shared pool, anchored through a [`ScopeHost`].
#[derive(Clone)]
pub struct ReferenceStrategy {
    pool: Arc<ReferencePool>,
    host: Arc<dyn ScopeHost>,
}

impl ReferenceStrategy {
    pub fn new(pool: Arc<ReferencePool>, host: Arc<dyn ScopeHost>) -> Self {
        Self { pool, host }
    }

    pub fn pool(&self) -> &Arc<ReferencePool> {
        &self.pool
    }
}

impl PersistenceStrategy for ReferenceStrategy {
    type Token = RefHandle;

    fn encode(&self, prepared: PreparedGeometry) -> Result<RefHandle> {
        let scope = anchor_scope(self.host.as_ref());
        self.pool.insert(prepared, scope)
    }

    fn decode(&self, token: &RefHandle) -> Result<Arc<PreparedGeometry>> {
        self.pool.get(*token)
    }

    fn as_text(&self, token: &RefHandle, precision: i32) -> Result<String> {
        match self.pool.get(*token) {
            Ok(prepared) => Ok(write_exact(&prepared.geometry, prepared.srid, precision)),
            Err(GeoExactError::StaleHandle(_)) => {
                warn!("Referenced geometries must not be stored");
                Ok(DELETED_TEXT.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::ScopeTree;
    use crate::test::exact::{square, tetrahedron};

    fn setup() -> (Arc<ScopeTree>, ReferenceStrategy) {
        let tree = Arc::new(ScopeTree::new());
        let pool = Arc::new(ReferencePool::new());
        tree.subscribe(pool.clone());
        (tree.clone(), ReferenceStrategy::new(pool, tree))
    }

    #[test]
    fn decode_shares_the_geometry() {
        let (_tree, strategy) = setup();
        let prepared = PreparedGeometry::new(tetrahedron(), 0);
        let handle = strategy.encode(prepared.clone()).unwrap();
        let a = strategy.decode(&handle).unwrap();
        let b = strategy.decode(&handle).unwrap();
        assert_eq!(*a, prepared);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn teardown_makes_handles_stale() {
        let (tree, strategy) = setup();
        let call = tree.create_child(ScopeTree::MESSAGE, false).unwrap();
        tree.switch_to(call).unwrap();
        let handle = strategy.encode(PreparedGeometry::new(square(1), 0)).unwrap();
        let survivor = {
            tree.switch_to(ScopeTree::MESSAGE).unwrap();
            strategy.encode(PreparedGeometry::new(square(2), 0)).unwrap()
        };

        tree.delete(call).unwrap();
        assert!(matches!(
            strategy.decode(&handle),
            Err(GeoExactError::StaleHandle(id)) if id == handle.0
        ));
        assert_eq!(strategy.as_text(&handle, -1).unwrap(), DELETED_TEXT);
        assert!(strategy.pool().contains(survivor).unwrap());
        assert_eq!(
            strategy.as_text(&survivor, -1).unwrap(),
            "POLYGON((0 0,2 0,2 2,0 2,0 0))"
        );
    }

    #[test]
    fn volatile_scope_anchors_to_parent() {
        let (tree, strategy) = setup();
        let portal = tree.create_child(ScopeTree::MESSAGE, false).unwrap();
        let row = tree.create_child(portal, true).unwrap();
        tree.switch_to(row).unwrap();
        let handle = strategy.encode(PreparedGeometry::new(square(1), 0)).unwrap();

        tree.reset(row).unwrap();
        assert!(strategy.decode(&handle).is_ok());
        tree.reset(portal).unwrap();
        assert!(strategy.decode(&handle).is_err());
    }

    #[test]
    fn handles_are_not_reused() {
        let (tree, strategy) = setup();
        let first = strategy.encode(PreparedGeometry::new(square(1), 0)).unwrap();
        tree.reset(ScopeTree::MESSAGE).unwrap();
        let second = strategy.encode(PreparedGeometry::new(square(1), 0)).unwrap();
        assert_ne!(first, second);
        assert!(strategy.decode(&first).is_err());
        assert_eq!(strategy.pool().len().unwrap(), 1);
    }
}
