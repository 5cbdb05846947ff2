//! JSON REST API for Lineage.
//!
//! Exposes an axum [`Router`] over a [`TreeStore`], which owns the cached
//! family tree and rebuilds it after every successful write. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lineage_api::api_router(trees.clone()))
//! ```

pub mod edges;
pub mod error;
pub mod persons;
pub mod tree;
pub mod tree_store;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use lineage_core::store::FamilyStore;

pub use error::ApiError;
pub use tree_store::TreeStore;

/// Build a fully-materialised API router for `trees`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(trees: Arc<TreeStore<S>>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  Router::new()
    // Tree
    .route("/tree", get(tree::get::<S>))
    .route("/tree/refresh", post(tree::refresh::<S>))
    .route("/tree/generations", get(tree::generations::<S>))
    .route("/members/{id}", get(tree::member::<S>))
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    // Edges
    .route(
      "/relationships",
      get(edges::list_relationships::<S>).post(edges::create_relationship::<S>),
    )
    .route(
      "/parent-child",
      get(edges::list_parent_child::<S>).post(edges::create_parent_child::<S>),
    )
    .with_state(trees)
}

// ─── Integration tests ────────────────────────────────────────────────────────
