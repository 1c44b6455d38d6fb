//! The call boundary: [`Datum`] values in, [`Datum`] values out.
//!
//! Every algorithm is exposed three times, once per persistence strategy: `area` takes
//! and returns Copy tokens, `area_ref` Reference handles and `area_exact` exact blobs.
//! The strategy-independent part of each entry point (arity, argument decoding,
//! diagnostics on failure, result encoding) is generated by one macro.
//!
//! ```
//! use std::sync::Arc;
//!
//! use geoexact::config::BridgeConfig;
//! use geoexact::function::{Datum, FunctionCatalog, FunctionContext};
//! use geoexact::storage::ScopeTree;
//!
//! let ctx = FunctionContext::new(BridgeConfig::default(), Arc::new(ScopeTree::new()));
//! let catalog = FunctionCatalog::standard();
//! let square = catalog
//!     .call(&ctx, "geometry_in", &[Datum::from("POLYGON((0 0,2 0,2 2,0 2,0 0))")])
//!     .unwrap();
//! let area = catalog.call(&ctx, "area", &[square]).unwrap();
//! assert_eq!(area, Datum::Float8(4.));
//! ```

pub(crate) mod call;
mod catalog;
mod datum;
mod error;
pub mod operations;
pub mod types;

use std::sync::Arc;

pub use call::BoundaryStrategy;
pub use catalog::{EntryPoint, FunctionCatalog};
pub use datum::Datum;
pub use error::{CallError, CallResult};

use crate::config::BridgeConfig;
use crate::convert::Converter;
use crate::storage::{CopyStrategy, ExactStrategy, ReferencePool, ReferenceStrategy, ScopeHost};

/// Services shared by every call: configuration, the three strategies and the reference
/// pool.
///
/// The pool must also be subscribed to the host's scope teardown so that handles die
/// with their scope.
#[derive(Clone)]
pub struct FunctionContext {
    config: BridgeConfig,
    copy: CopyStrategy,
    reference: ReferenceStrategy,
    exact: ExactStrategy,
}

impl FunctionContext {
    pub fn new(config: BridgeConfig, host: Arc<dyn ScopeHost>) -> Self {
        Self::with_pool(config, host, Arc::new(ReferencePool::new()))
    }

    /// Build a context around an existing pool.
    pub fn with_pool(
        config: BridgeConfig,
        host: Arc<dyn ScopeHost>,
        pool: Arc<ReferencePool>,
    ) -> Self {
        let converter = Converter::new(config.max_nesting_depth);
        Self {
            copy: CopyStrategy::new(converter),
            reference: ReferenceStrategy::new(pool, host),
            exact: ExactStrategy::new(config.max_nesting_depth),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Mutable access to the configuration. Nesting limits are fixed at construction.
    pub fn config_mut(&mut self) -> &mut BridgeConfig {
        &mut self.config
    }

    pub fn pool(&self) -> &Arc<ReferencePool> {
        self.reference.pool()
    }

    pub fn copy_strategy(&self) -> &CopyStrategy {
        &self.copy
    }

    pub fn reference_strategy(&self) -> &ReferenceStrategy {
        &self.reference
    }

    pub fn exact_strategy(&self) -> &ExactStrategy {
        &self.exact
    }
}
