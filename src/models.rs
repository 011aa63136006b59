use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type Id = i64;

/// Whoever the session cookie belongs to (`GET /api/users/me`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<Id>,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub author_id: Option<Id>,
    pub author_nickname: Option<String>,
    pub created_at: Option<String>, // raw server timestamp, formatted at render time
    pub like_count: i64,
    pub view_count: i64,
    pub comment_count: i64,
    pub liked: bool,
}

/// One entry of the paginated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSummary {
    pub id: Id,
    pub title: String,
    pub author_id: Option<Id>,
    pub author_nickname: Option<String>,
    /// Avatar URL some payloads carry; used only when there is no author id to fetch by.
    pub author_avatar_url: Option<String>,
    pub created_at: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub view_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    pub content: Vec<PostSummary>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    /// `None` when the server left it out.
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: Id,
    pub content: String,
    pub author_nickname: Option<String>,
    pub created_at: Option<String>,
    pub mine: bool,
}

/// Body of a like/unlike response. `None` when the server omitted the count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeCount {
    pub like_count: Option<i64>,
}

/// Query for `GET /api/posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: String,
    pub dir: String,
}

impl PageRequest {
    /// Newest first, which is the only ordering the list page uses.
    pub fn newest_first(page: u32, size: u32) -> Self {
        Self { page, size, sort: "createdAt".into(), dir: "desc".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentBody {
    pub content: String,
}

/// A file the user picked, attached to a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub profile_image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub nickname: String,
    pub profile_image: Option<ImageUpload>,
}

/// Title/content/image for both creating and editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

/// Image bytes as fetched from the backend, with a sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Arc<[u8]>,
    pub mime: String,
}

impl FetchedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        let mime = infer::get(&bytes)
            .map(|t| t.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        Self { bytes: bytes.into(), mime }
    }
}

/// What an `<img>` ends up pointing at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Fetched(FetchedImage),
    /// URL handed out by the server inside a payload.
    Remote(String),
    Default(String),
}
