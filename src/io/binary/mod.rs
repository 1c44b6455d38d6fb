//! The exact binary layout used by the exact-blob persistence strategy.
//!
//! ```text
//! u32 payload length | "XGB" | u8 version | i32 srid | body
//! body    u8 kind | kind-specific payload
//! coord   u8 dim (2|3) | scalar x | scalar y | [scalar z]
//! scalar  u32 len | signed LE numerator | u32 len | LE denominator
//! ```
//!
//! Rationals are stored as they are held in memory, so decoding never loses precision.

mod reader;
mod writer;

pub use reader::read_prepared;
pub use writer::{to_exact_bytes, write_prepared};

pub(crate) const MAGIC: [u8; 3] = *b"XGB";
pub(crate) const VERSION: u8 = 1;
