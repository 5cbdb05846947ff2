//! Core types and the family-tree builder for Lineage.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dataset;
pub mod error;
pub mod family;
pub mod model;
pub mod store;
pub mod tree;

pub use dataset::RawData;
pub use error::{Error, Result};
pub use family::{FamilyMember, FamilyTree, generation_label};
pub use tree::build_tree;
