//! Pagination cache: reuses page annotations for content already paginated
//! with the same renderer build.
//!
//! Keys combine a SHA-256 of the annotation-free content with the renderer's
//! identity and version, so editing the content or upgrading the template both
//! miss. Entries are never evicted implicitly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::PaginationError;
use crate::models::annotations::PageAnnotations;
use crate::models::resume::ResumeContentModel;
use crate::render::RendererIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub content_hash: String,
    pub renderer: RendererIdentity,
}

impl CacheKey {
    /// Key for `model` painted by `renderer`. Existing page numbers on `model`
    /// do not affect the hash.
    pub fn for_content(
        model: &ResumeContentModel,
        renderer: &RendererIdentity,
    ) -> Result<Self, PaginationError> {
        let mut stripped = model.clone();
        stripped.clear_page_numbers();
        let json = serde_json::to_vec(&stripped)?;
        Ok(Self {
            content_hash: format!("{:x}", Sha256::digest(&json)),
            renderer: renderer.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPagination {
    pub annotations: PageAnnotations,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct PaginationCache {
    entries: RwLock<HashMap<CacheKey, CachedPagination>>,
}

impl PaginationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CachedPagination> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: CacheKey, annotations: PageAnnotations) {
        let entry = CachedPagination {
            annotations,
            computed_at: Utc::now(),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Returns true if an entry was removed.
    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Drops every entry produced by the named renderer, across all versions.
    /// Returns the number of entries removed.
    pub async fn invalidate_renderer(&self, name: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|k, _| k.renderer.name != name);
        let removed = before - entries.len();
        debug!(renderer = name, removed, "Invalidated cached paginations");
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
