//! A bridge between simple-features geometries and exact computational geometry.
//!
//! Geometries arrive as Model A values ([`simple::SfGeometry`]: flat `f64` coordinates, an
//! SRID and a solid flag) and are converted into Model B values ([`exact::Geometry`]:
//! rational coordinates, typed surfaces and solids) for the [`algorithm`]s. Results go back
//! through one of three [`storage`] strategies:
//!
//! - Copy: Model A bytes, self-contained but rounded to `f64`.
//! - Reference: a handle into a scope-bound in-memory pool.
//! - Exact: a lossless binary blob.
//!
//! The [`function`] module exposes every algorithm once per strategy over a uniform
//! [`Datum`][function::Datum] calling convention.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod algorithm;
pub mod config;
pub mod convert;
pub mod error;
pub mod exact;
pub mod function;
pub mod io;
pub mod simple;
pub mod storage;
#[cfg(test)]
pub(crate) mod test;
