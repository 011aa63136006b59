use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::ApiResult;
use crate::models::{FetchedImage, Id, ImageSource};

/// Resolve a fetch into something displayable, falling back to the default image.
pub fn or_default(result: ApiResult<FetchedImage>, default_path: &str) -> ImageSource {
    match result {
        Ok(img) => ImageSource::Fetched(img),
        Err(e) => {
            debug!("image unavailable ({e}), using default");
            ImageSource::Default(default_path.to_string())
        }
    }
}

/// Author id → resolved avatar. Entries live as long as the page; never evicted.
#[derive(Clone)]
pub struct AvatarCache {
    store: Arc<DashMap<Id, ImageSource>>,
    default_path: String,
}

impl AvatarCache {
    pub fn new(default_path: impl Into<String>) -> Self {
        Self { store: Arc::new(DashMap::new()), default_path: default_path.into() }
    }

    pub fn get(&self, author_id: Id) -> Option<ImageSource> {
        self.store.get(&author_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Cached avatar, or fetch it once. Failed fetches cache the default image too.
    pub async fn resolve(&self, backend: &dyn Backend, author_id: Id) -> ImageSource {
        if let Some(hit) = self.get(author_id) {
            return hit;
        }
        let result = backend.user_profile_image(author_id).await;
        if let Err(e) = &result {
            warn!("avatar for author {author_id} failed: {e}");
        }
        let source = or_default(result, &self.default_path);
        self.store.entry(author_id).or_insert(source).value().clone()
    }
}
