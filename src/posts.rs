use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use futures_util::future::join_all;
use tracing::{debug, info};

use crate::format::{format_count, format_date_time, truncate_title};
use crate::images::AvatarCache;
use crate::models::{Id, ImageSource, PageRequest, PostSummary};
use crate::shell::{PageContext, Route};

pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// `documentElement` scroll geometry at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold_px: u32) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - f64::from(threshold_px)
    }
}

/// One rendered summary card, all fields already display-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: Id,
    pub title: String,
    pub created_at: String,
    pub likes: String,
    pub comments: String,
    pub views: String,
    pub author_id: Option<Id>,
    pub author_name: String,
    pub avatar: ImageSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Busy or already at the end; nothing was requested.
    Skipped,
    Appended(usize),
    /// The server returned no items; the end flag is now set.
    Empty,
    Failed,
}

#[derive(Default)]
struct ListState {
    cursor: u32,
    last_page: bool,
    busy: bool,
    cards: Vec<PostCard>,
}

/// Infinite-scroll list of post summaries, newest first.
pub struct PostListController {
    ctx: PageContext,
    state: Mutex<ListState>,
    avatars: AvatarCache,
}

impl PostListController {
    pub fn new(ctx: PageContext) -> Self {
        let avatars = AvatarCache::new(ctx.config.default_avatar.clone());
        Self { ctx, state: Mutex::new(ListState::default()), avatars }
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cursor(&self) -> u32 {
        self.state().cursor
    }

    pub fn is_last_page(&self) -> bool {
        self.state().last_page
    }

    pub fn is_loading(&self) -> bool {
        self.state().busy
    }

    pub fn cards(&self) -> Vec<PostCard> {
        self.state().cards.clone()
    }

    pub fn avatars(&self) -> &AvatarCache {
        &self.avatars
    }

    /// Initial load.
    pub async fn init(&self) -> FetchOutcome {
        self.fetch_next_page().await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> FetchOutcome {
        {
            let st = self.state();
            if st.busy || st.last_page {
                return FetchOutcome::Skipped;
            }
        }
        if !metrics.near_bottom(self.ctx.config.scroll_threshold_px) {
            return FetchOutcome::Skipped;
        }
        self.fetch_next_page().await
    }

    pub async fn fetch_next_page(&self) -> FetchOutcome {
        let page = {
            let mut st = self.state();
            if st.busy || st.last_page {
                return FetchOutcome::Skipped;
            }
            st.busy = true;
            st.cursor
        };

        let req = PageRequest::newest_first(page, self.ctx.config.page_size);
        let outcome = match self.ctx.backend.list_posts(&req).await {
            Err(e) => {
                self.ctx.report_failure("list posts", &e, "Failed to load posts.");
                FetchOutcome::Failed
            }
            Ok(p) if p.content.is_empty() => {
                info!("page {page} empty, end of list");
                self.state().last_page = true;
                FetchOutcome::Empty
            }
            Ok(p) => {
                let cards = self.build_cards(p.content).await;
                let n = cards.len();
                let mut st = self.state();
                st.cards.extend(cards);
                st.cursor += 1;
                // unknown total: keep paging until an empty page
                if p.total_pages.is_some_and(|total| st.cursor >= total) {
                    st.last_page = true;
                }
                debug!("page {page}: {n} posts, cursor now {}", st.cursor);
                FetchOutcome::Appended(n)
            }
        };

        self.state().busy = false;
        outcome
    }

    /// One fetch per distinct author on the page, all running concurrently
    /// through the cache.
    async fn build_cards(&self, posts: Vec<PostSummary>) -> Vec<PostCard> {
        let backend = self.ctx.backend.as_ref();
        let mut authors: Vec<Id> = posts.iter().filter_map(|p| p.author_id).collect();
        authors.sort_unstable();
        authors.dedup();

        let resolved: HashMap<Id, ImageSource> = join_all(authors.into_iter().map(|id| async move {
            (id, self.avatars.resolve(backend, id).await)
        }))
        .await
        .into_iter()
        .collect();

        posts
            .into_iter()
            .map(|p| {
                let avatar = match (p.author_id, &p.author_avatar_url) {
                    (Some(id), _) => resolved.get(&id).cloned(),
                    (None, Some(url)) => Some(ImageSource::Remote(url.clone())),
                    (None, None) => None,
                }
                .unwrap_or_else(|| ImageSource::Default(self.ctx.config.default_avatar.clone()));
                card(p, avatar)
            })
            .collect()
    }

    pub fn open_post(&self, id: Id) {
        self.ctx.shell.navigate(Route::Post(id));
    }

    pub fn write_post(&self) {
        self.ctx.shell.navigate(Route::MakePost);
    }
}

fn card(p: PostSummary, avatar: ImageSource) -> PostCard {
    PostCard {
        id: p.id,
        title: truncate_title(&p.title),
        created_at: format_date_time(p.created_at.as_deref()),
        likes: format_count(p.like_count),
        comments: format_count(p.comment_count),
        views: format_count(p.view_count),
        author_id: p.author_id,
        author_name: p.author_nickname.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        avatar,
    }
}
