//! Handlers for `/tree` and `/members` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tree` | Cached tree; built on first request |
//! | `POST` | `/tree/refresh` | Fetch and rebuild now |
//! | `GET`  | `/tree/generations` | Members grouped by generation, ascending |
//! | `GET`  | `/members/:id` | One member of the current tree |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use lineage_core::{
  FamilyMember, FamilyTree, generation_label, model::PersonId, store::FamilyStore,
};
use serde::Serialize;

use crate::{error::ApiError, tree_store::TreeStore};

// ─── Tree ─────────────────────────────────────────────────────────────────────

/// `GET /tree`
pub async fn get<S>(State(trees): State<Arc<TreeStore<S>>>) -> Json<FamilyTree>
where
  S: FamilyStore,
{
  Json(Arc::unwrap_or_clone(trees.tree().await))
}

/// `POST /tree/refresh`
pub async fn refresh<S>(State(trees): State<Arc<TreeStore<S>>>) -> Json<FamilyTree>
where
  S: FamilyStore,
{
  Json(Arc::unwrap_or_clone(trees.refresh().await))
}

// ─── Generations ──────────────────────────────────────────────────────────────

/// One row of the generation view.
#[derive(Debug, Serialize)]
pub struct GenerationGroup {
  pub generation: u32,
  pub label:      String,
  pub members:    Vec<FamilyMember>,
}

/// `GET /tree/generations`
pub async fn generations<S>(
  State(trees): State<Arc<TreeStore<S>>>,
) -> Json<Vec<GenerationGroup>>
where
  S: FamilyStore,
{
  let tree = trees.tree().await;
  let groups = tree
    .by_generation()
    .into_iter()
    .map(|(generation, members)| GenerationGroup {
      generation,
      label: generation_label(generation),
      members: members.into_iter().cloned().collect(),
    })
    .collect();
  Json(groups)
}

// ─── Member ───────────────────────────────────────────────────────────────────

/// `GET /members/:id`
pub async fn member<S>(
  State(trees): State<Arc<TreeStore<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<FamilyMember>, ApiError>
where
  S: FamilyStore,
{
  trees
    .tree()
    .await
    .member(id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("member {id} not found")))
}
