//! Persistence strategies: how a [`PreparedGeometry`] crosses the call boundary.
//!
//! Three strategies share one interface:
//!
//! - [`CopyStrategy`] converts to Model A and stores its native bytes. Self-contained and
//!   durable, but exact coordinates are rounded to `f64`.
//! - [`ReferenceStrategy`] keeps the geometry in a [`ReferencePool`] and hands out a
//!   [`RefHandle`] that dies with the scope it is anchored to.
//! - [`ExactStrategy`] stores the lossless exact binary layout.

mod copy;
mod exact;
mod reference;
mod scope;

use std::fmt::Debug;
use std::sync::Arc;

pub use copy::{CopyStrategy, SerializedGeometry};
pub use exact::{ExactBlob, ExactStrategy};
pub use reference::{RefHandle, ReferencePool, ReferenceStrategy, DELETED_TEXT};
pub use scope::{anchor_scope, ScopeHost, ScopeId, ScopeTeardown, ScopeTree};

use crate::error::Result;
use crate::exact::PreparedGeometry;

/// Encodes prepared geometries into tokens and back.
pub trait PersistenceStrategy {
    /// The value that represents a geometry outside of this crate.
    type Token: Clone + Debug;

    /// Take ownership of a geometry and produce its token.
    fn encode(&self, prepared: PreparedGeometry) -> Result<Self::Token>;

    /// Recover the geometry behind a token.
    fn decode(&self, token: &Self::Token) -> Result<Arc<PreparedGeometry>>;

    /// Text rendering of a token with `precision` decimals. A negative precision asks for
    /// the most exact notation the strategy can produce.
    fn as_text(&self, token: &Self::Token, precision: i32) -> Result<String>;
}
