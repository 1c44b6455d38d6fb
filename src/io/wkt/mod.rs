//! Extended WKT for both models.

pub(crate) mod reader;
pub(crate) mod writer;

pub use reader::exact::read_exact;
pub use reader::simple::read_simple;
pub use writer::exact::write_exact;
pub use writer::simple::write_simple;
