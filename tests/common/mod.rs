#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use postboard::backend::{CommentApi, PostApi, SessionApi, UserApi};
use postboard::error::{ApiError, ApiResult};
use postboard::models::*;
use postboard::{ClientConfig, PageContext, Route, Shell};

// ---------------- In-memory Mock Backend (tests only) ----------------
#[derive(Default)]
pub struct MockState {
    pub calls: Vec<String>,
    pub me: Option<CurrentUser>,
    pub posts: HashMap<Id, Post>,
    pub post_images: HashMap<Id, Vec<u8>>,
    pub avatars: HashMap<Id, Vec<u8>>,
    pub my_avatar: Option<Vec<u8>>,
    pub pages: Vec<PostPage>,
    pub comments: HashMap<Id, Vec<Comment>>,
    pub next_comment_id: Id,
    /// operation name -> error it should return
    pub fail: HashMap<&'static str, ApiError>,
    /// overrides the count returned by like/unlike (`Some(None)` = field missing)
    pub like_response: Option<Option<i64>>,
    pub list_delay: Option<Duration>,
    pub avatar_delay: Option<Duration>,
    pub last_signup: Option<Signup>,
    pub last_profile: Option<ProfileUpdate>,
    pub last_draft: Option<PostDraft>,
}

#[derive(Default)]
pub struct MockBackend {
    pub state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<F: FnOnce(&mut MockState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn fail(&self, op: &'static str, err: ApiError) {
        self.state.lock().unwrap().fail.insert(op, err);
    }

    pub fn heal(&self, op: &'static str) {
        self.state.lock().unwrap().fail.remove(op);
    }

    /// Records the call and returns the configured failure, if any.
    fn enter(&self, op: &'static str, call: String) -> ApiResult<()> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(call);
        match st.fail.get(op) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SessionApi for MockBackend {
    async fn login(&self, req: &LoginRequest) -> ApiResult<()> {
        self.enter("login", format!("POST /api/auth/login {}", req.email))
    }
    async fn logout(&self) -> ApiResult<()> {
        self.enter("logout", "POST /api/auth/logout".into())
    }
}

#[async_trait::async_trait]
impl UserApi for MockBackend {
    async fn signup(&self, req: Signup) -> ApiResult<()> {
        self.enter("signup", "POST /api/users".into())?;
        self.state.lock().unwrap().last_signup = Some(req);
        Ok(())
    }
    async fn current_user(&self) -> ApiResult<CurrentUser> {
        self.enter("current_user", "GET /api/users/me".into())?;
        self.state.lock().unwrap().me.clone().ok_or(ApiError::Unauthorized)
    }
    async fn delete_account(&self) -> ApiResult<()> {
        self.enter("delete_account", "DELETE /api/users/me".into())
    }
    async fn update_profile(&self, req: ProfileUpdate) -> ApiResult<()> {
        self.enter("update_profile", "PATCH /api/users/me/profile".into())?;
        self.state.lock().unwrap().last_profile = Some(req);
        Ok(())
    }
    async fn change_password(&self, _req: &PasswordChange) -> ApiResult<()> {
        self.enter("change_password", "PATCH /api/users/me/password".into())
    }
    async fn my_profile_image(&self) -> ApiResult<FetchedImage> {
        self.enter("my_profile_image", "GET /api/users/me/profile-image".into())?;
        self.state.lock().unwrap().my_avatar.clone().map(FetchedImage::new).ok_or(ApiError::NotFound)
    }
    async fn user_profile_image(&self, user_id: Id) -> ApiResult<FetchedImage> {
        self.enter("user_profile_image", format!("GET /api/users/{user_id}/profile-image"))?;
        let delay = self.state.lock().unwrap().avatar_delay;
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        let st = self.state.lock().unwrap();
        st.avatars.get(&user_id).cloned().map(FetchedImage::new).ok_or(ApiError::NotFound)
    }
}

#[async_trait::async_trait]
impl PostApi for MockBackend {
    async fn list_posts(&self, req: &PageRequest) -> ApiResult<PostPage> {
        self.enter(
            "list_posts",
            format!("GET /api/posts?page={}&size={}&sort={}&dir={}", req.page, req.size, req.sort, req.dir),
        )?;
        let delay = self.state.lock().unwrap().list_delay;
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        let st = self.state.lock().unwrap();
        Ok(st.pages.get(req.page as usize).cloned().unwrap_or_default())
    }
    async fn create_post(&self, draft: PostDraft) -> ApiResult<()> {
        self.enter("create_post", "POST /api/posts".into())?;
        self.state.lock().unwrap().last_draft = Some(draft);
        Ok(())
    }
    async fn get_post(&self, id: Id) -> ApiResult<Post> {
        self.enter("get_post", format!("GET /api/posts/{id}"))?;
        self.state.lock().unwrap().posts.get(&id).cloned().ok_or(ApiError::NotFound)
    }
    async fn update_post(&self, id: Id, draft: PostDraft) -> ApiResult<()> {
        self.enter("update_post", format!("PATCH /api/posts/{id}"))?;
        self.state.lock().unwrap().last_draft = Some(draft);
        Ok(())
    }
    async fn delete_post(&self, id: Id) -> ApiResult<()> {
        self.enter("delete_post", format!("DELETE /api/posts/{id}"))
    }
    async fn post_image(&self, id: Id) -> ApiResult<FetchedImage> {
        self.enter("post_image", format!("GET /api/posts/{id}/image"))?;
        self.state.lock().unwrap().post_images.get(&id).cloned().map(FetchedImage::new).ok_or(ApiError::NotFound)
    }
    async fn like_post(&self, id: Id) -> ApiResult<LikeCount> {
        self.enter("like", format!("POST /api/posts/{id}/like"))?;
        Ok(self.bump_likes(id, 1))
    }
    async fn unlike_post(&self, id: Id) -> ApiResult<LikeCount> {
        self.enter("unlike", format!("DELETE /api/posts/{id}/like"))?;
        Ok(self.bump_likes(id, -1))
    }
}

impl MockBackend {
    fn bump_likes(&self, id: Id, delta: i64) -> LikeCount {
        let mut st = self.state.lock().unwrap();
        if let Some(forced) = st.like_response {
            return LikeCount { like_count: forced };
        }
        let post = st.posts.entry(id).or_default();
        post.like_count += delta;
        LikeCount { like_count: Some(post.like_count) }
    }
}

#[async_trait::async_trait]
impl CommentApi for MockBackend {
    async fn list_comments(&self, post_id: Id) -> ApiResult<Vec<Comment>> {
        self.enter("list_comments", format!("GET /api/posts/{post_id}/comments"))?;
        Ok(self.state.lock().unwrap().comments.get(&post_id).cloned().unwrap_or_default())
    }
    async fn create_comment(&self, post_id: Id, body: &CommentBody) -> ApiResult<()> {
        self.enter("create_comment", format!("POST /api/posts/{post_id}/comments {}", body.content))?;
        let mut st = self.state.lock().unwrap();
        st.next_comment_id += 1;
        let id = 1000 + st.next_comment_id;
        st.comments.entry(post_id).or_default().push(Comment {
            id,
            content: body.content.clone(),
            author_nickname: Some("me".into()),
            created_at: None,
            mine: true,
        });
        Ok(())
    }
    async fn update_comment(&self, id: Id, body: &CommentBody) -> ApiResult<()> {
        self.enter("update_comment", format!("PATCH /api/comments/{id} {}", body.content))?;
        let mut st = self.state.lock().unwrap();
        for list in st.comments.values_mut() {
            for c in list.iter_mut().filter(|c| c.id == id) {
                c.content = body.content.clone();
            }
        }
        Ok(())
    }
    async fn delete_comment(&self, id: Id) -> ApiResult<()> {
        self.enter("delete_comment", format!("DELETE /api/comments/{id}"))?;
        let mut st = self.state.lock().unwrap();
        for list in st.comments.values_mut() {
            list.retain(|c| c.id != id);
        }
        Ok(())
    }
}

// ---------------- Recording shell ----------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Alert(String),
    Toast(String),
    Navigate(Route),
}

#[derive(Default)]
pub struct RecordingShell {
    pub events: Mutex<Vec<ShellEvent>>,
}

impl RecordingShell {
    pub fn events(&self) -> Vec<ShellEvent> {
        self.events.lock().unwrap().clone()
    }
    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| if let ShellEvent::Alert(m) = e { Some(m) } else { None })
            .collect()
    }
    pub fn toasts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| if let ShellEvent::Toast(m) = e { Some(m) } else { None })
            .collect()
    }
    pub fn navigations(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|e| if let ShellEvent::Navigate(r) = e { Some(r) } else { None })
            .collect()
    }
}

impl Shell for RecordingShell {
    fn alert(&self, message: &str) {
        self.events.lock().unwrap().push(ShellEvent::Alert(message.to_string()));
    }
    fn toast(&self, message: &str) {
        self.events.lock().unwrap().push(ShellEvent::Toast(message.to_string()));
    }
    fn navigate(&self, route: Route) {
        self.events.lock().unwrap().push(ShellEvent::Navigate(route));
    }
}

pub fn page(backend: &Arc<MockBackend>) -> (PageContext, Arc<RecordingShell>) {
    let shell = Arc::new(RecordingShell::default());
    let ctx = PageContext::new(backend.clone(), shell.clone(), ClientConfig::default());
    (ctx, shell)
}

// Minimal 1x1 PNG (transparent)
pub fn sample_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
        0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
        0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
        0x42, 0x60, 0x82,
    ]
}

pub fn post(id: Id, author_id: Option<Id>) -> Post {
    Post {
        id,
        title: format!("post {id}"),
        content: "body".into(),
        author_id,
        author_nickname: Some("writer".into()),
        created_at: Some("2024-05-01T10:20:30".into()),
        like_count: 3,
        view_count: 12,
        comment_count: 99,
        liked: false,
    }
}

pub fn comment(id: Id, content: &str, mine: bool) -> Comment {
    Comment {
        id,
        content: content.into(),
        author_nickname: Some(format!("user{id}")),
        created_at: Some("2024-05-02T08:00:00".into()),
        mine,
    }
}

pub fn summary(id: Id, author_id: Option<Id>) -> PostSummary {
    PostSummary {
        id,
        title: format!("title {id}"),
        author_id,
        author_nickname: Some(format!("author{}", author_id.unwrap_or(0))),
        author_avatar_url: None,
        created_at: Some("2024-05-01T10:20:30".into()),
        like_count: 1200,
        comment_count: 4,
        view_count: 56,
    }
}

pub fn page_of(items: Vec<PostSummary>, page: u32, total_pages: u32) -> PostPage {
    PostPage { total_elements: items.len() as u64, content: items, page, size: 10, total_pages: Some(total_pages) }
}
