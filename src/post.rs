//! Post detail page: one post, its like state, its comment thread, and the
//! ownership-gated edit/delete controls.
//!
//! Two small state machines drive the interactive parts:
//!
//! * [`CommentForm`]: `Create` ↔ `Editing(id)`. Starting an edit on another
//!   comment silently replaces the current one; there is no cancel, the only
//!   way back to `Create` is a successful submit.
//! * [`ConfirmModal`]: `Closed` ↔ `Open(target)`, shared by post and comment
//!   deletion. A confirmed delete always ends `Closed`, even when it failed.

use tracing::{debug, info, warn};

use crate::format::{format_count, format_date_time};
use crate::models::{Comment, CommentBody, FetchedImage, Id, Post};
use crate::shell::{post_id_from_query, PageContext, Route};
use crate::validate;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const ANONYMOUS: &str = "Anonymous";
pub const INVALID_ACCESS: &str = "Invalid access: no post id.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentForm {
    #[default]
    Create,
    Editing(Id),
}

impl CommentForm {
    pub fn submit_label(&self) -> &'static str {
        match self {
            CommentForm::Create => "Post comment",
            CommentForm::Editing(_) => "Edit comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Post(Id),
    Comment(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmModal {
    #[default]
    Closed,
    Open(DeleteTarget),
}

impl ConfirmModal {
    pub fn target(&self) -> Option<DeleteTarget> {
        match self {
            ConfirmModal::Closed => None,
            ConfirmModal::Open(t) => Some(*t),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ConfirmModal::Open(_))
    }

    pub fn title(&self) -> Option<&'static str> {
        self.target().map(|t| match t {
            DeleteTarget::Post(_) => "Delete this post?",
            DeleteTarget::Comment(_) => "Delete this comment?",
        })
    }

    pub fn message(&self) -> Option<&'static str> {
        self.target().map(|_| "Deleted content cannot be recovered.")
    }
}

/// Client-side view of the like aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub liked: bool,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostImage {
    #[default]
    Pending,
    Shown(FetchedImage),
    Hidden,
}

/// Display-ready post header/body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub title: String,
    pub author: String,
    pub created_at: String,
    pub content: String,
    pub likes: String,
    pub views: String,
}

/// Display-ready comment row. `editable` gates the edit/delete buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentItem {
    pub id: Id,
    pub author: String,
    pub created_at: String,
    pub content: String,
    pub editable: bool,
}

pub struct PostDetailController {
    ctx: PageContext,
    post_id: Id,
    current_user_id: Option<Id>,
    post: Option<Post>,
    like: LikeState,
    owner: bool,
    image: PostImage,
    comments: Vec<Comment>,
    comment_input: String,
    comment_helper: Option<String>,
    form: CommentForm,
    modal: ConfirmModal,
}

impl PostDetailController {
    pub fn new(ctx: PageContext, post_id: Id) -> Self {
        Self {
            ctx,
            post_id,
            current_user_id: None,
            post: None,
            like: LikeState::default(),
            owner: false,
            image: PostImage::Pending,
            comments: Vec::new(),
            comment_input: String::new(),
            comment_helper: None,
            form: CommentForm::Create,
            modal: ConfirmModal::Closed,
        }
    }

    /// Build from the page query string. Without a usable `postId` the user is
    /// sent back to the list and no controller is produced.
    pub fn from_query(ctx: PageContext, query: &str) -> Option<Self> {
        match post_id_from_query(query) {
            Some(id) => Some(Self::new(ctx, id)),
            None => {
                ctx.shell.alert(INVALID_ACCESS);
                ctx.shell.navigate(Route::Posts);
                None
            }
        }
    }

    /// Ordered load chain; ownership needs both the session and the post.
    pub async fn init(&mut self) {
        self.load_current_user().await;
        if !self.load_post_detail().await {
            return;
        }
        self.load_post_image().await;
        self.load_comments().await;
    }

    pub async fn load_current_user(&mut self) {
        match self.ctx.backend.current_user().await {
            Ok(user) => self.current_user_id = user.id,
            Err(e) => debug!("no current user: {e}"),
        }
    }

    /// Returns false when the page has been abandoned.
    pub async fn load_post_detail(&mut self) -> bool {
        match self.ctx.backend.get_post(self.post_id).await {
            Ok(post) => {
                self.render_post(post);
                true
            }
            Err(e) => {
                warn!("post {} failed to load: {e}", self.post_id);
                self.ctx.shell.alert("Failed to load the post.");
                self.ctx.shell.navigate(Route::Posts);
                false
            }
        }
    }

    fn render_post(&mut self, post: Post) {
        self.like = LikeState { liked: post.liked, count: post.like_count };
        self.owner = matches!(
            (post.author_id, self.current_user_id),
            (Some(author), Some(me)) if author == me
        );
        self.post = Some(post);
    }

    /// Best effort: any failure just hides the image region.
    pub async fn load_post_image(&mut self) {
        self.image = match self.ctx.backend.post_image(self.post_id).await {
            Ok(img) => PostImage::Shown(img),
            Err(e) => {
                debug!("post {} has no image: {e}", self.post_id);
                PostImage::Hidden
            }
        };
    }

    pub async fn load_comments(&mut self) {
        match self.ctx.backend.list_comments(self.post_id).await {
            Ok(list) => self.comments = list,
            Err(e) => warn!("comment list failed: {e}"),
        }
    }

    /// Count comes back from the server; `liked` is flipped locally and not
    /// re-read. A failed call leaves both untouched.
    pub async fn toggle_like(&mut self) {
        let result = if self.like.liked {
            self.ctx.backend.unlike_post(self.post_id).await
        } else {
            self.ctx.backend.like_post(self.post_id).await
        };
        match result {
            Ok(resp) => {
                self.like.count = resp.like_count.unwrap_or(self.like.count);
                self.like.liked = !self.like.liked;
            }
            Err(e) => self.ctx.report_failure("like toggle", &e, "Failed to update like."),
        }
    }

    pub fn set_comment_input(&mut self, text: impl Into<String>) {
        self.comment_input = text.into();
    }

    /// Create or edit depending on the form state. Returns true on success.
    pub async fn submit_comment(&mut self) -> bool {
        let text = self.comment_input.trim().to_string();
        let check = validate::comment(&text);
        if !check.ok {
            self.comment_helper = Some(check.reason);
            return false;
        }
        self.comment_helper = None;

        let body = CommentBody { content: text };
        let result = match self.form {
            CommentForm::Create => self.ctx.backend.create_comment(self.post_id, &body).await,
            CommentForm::Editing(id) => self.ctx.backend.update_comment(id, &body).await,
        };
        if let Err(e) = result {
            let msg = match self.form {
                CommentForm::Create => "Failed to post the comment.",
                CommentForm::Editing(_) => "Failed to edit the comment.",
            };
            self.ctx.report_failure("comment submit", &e, msg);
            return false;
        }

        self.reset_comment_form();
        self.load_comments().await;
        true
    }

    /// Enter edit mode for `comment_id`, replacing any edit already in progress.
    pub fn start_edit_comment(&mut self, comment_id: Id) -> bool {
        let Some(c) = self.comments.iter().find(|c| c.id == comment_id) else {
            return false;
        };
        self.comment_input = c.content.clone();
        self.form = CommentForm::Editing(comment_id);
        true
    }

    fn reset_comment_form(&mut self) {
        self.form = CommentForm::Create;
        self.comment_input.clear();
    }

    pub fn request_delete_post(&mut self) {
        self.modal = ConfirmModal::Open(DeleteTarget::Post(self.post_id));
    }

    pub fn request_delete_comment(&mut self, comment_id: Id) {
        self.modal = ConfirmModal::Open(DeleteTarget::Comment(comment_id));
    }

    pub fn cancel_delete(&mut self) {
        self.modal = ConfirmModal::Closed;
    }

    /// Click on the overlay outside the dialog.
    pub fn dismiss_modal_outside(&mut self) {
        self.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(target) = self.modal.target() else {
            return;
        };
        let result = match target {
            DeleteTarget::Post(id) => self.ctx.backend.delete_post(id).await,
            DeleteTarget::Comment(id) => self.ctx.backend.delete_comment(id).await,
        };
        self.modal = ConfirmModal::Closed;

        match (target, result) {
            (DeleteTarget::Post(_), Err(e)) => {
                self.ctx.report_failure("delete post", &e, "Failed to delete the post.")
            }
            (DeleteTarget::Comment(_), Err(e)) => {
                self.ctx.report_failure("delete comment", &e, "Failed to delete the comment.")
            }
            (DeleteTarget::Post(id), Ok(())) => {
                info!("post {id} deleted");
                self.ctx.shell.alert("The post has been deleted.");
                self.ctx.shell.navigate(Route::Posts);
            }
            (DeleteTarget::Comment(_), Ok(())) => self.load_comments().await,
        }
    }

    pub fn go_back(&self) {
        self.ctx.shell.navigate(Route::Posts);
    }

    pub fn edit_post(&self) {
        self.ctx.shell.navigate(Route::EditPost(self.post_id));
    }

    pub fn post_id(&self) -> Id {
        self.post_id
    }

    pub fn current_user_id(&self) -> Option<Id> {
        self.current_user_id
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Edit/delete controls are visible only to the author.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn like_state(&self) -> LikeState {
        self.like
    }

    pub fn image(&self) -> &PostImage {
        &self.image
    }

    pub fn comment_form(&self) -> CommentForm {
        self.form
    }

    pub fn modal(&self) -> ConfirmModal {
        self.modal
    }

    pub fn comment_input(&self) -> &str {
        &self.comment_input
    }

    pub fn comment_helper(&self) -> Option<&str> {
        self.comment_helper.as_deref()
    }

    pub fn comment_submit_enabled(&self) -> bool {
        validate::comment(&self.comment_input).ok
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Always the length of the loaded list, never the post's own counter.
    pub fn comment_count_label(&self) -> String {
        format_count(self.comments.len() as i64)
    }

    pub fn view(&self) -> Option<PostView> {
        self.post.as_ref().map(|p| PostView {
            title: p.title.clone(),
            author: p.author_nickname.clone().unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            created_at: format_date_time(p.created_at.as_deref()),
            content: p.content.clone(),
            likes: format_count(self.like.count),
            views: format_count(p.view_count),
        })
    }

    pub fn comment_items(&self) -> Vec<CommentItem> {
        self.comments
            .iter()
            .map(|c| CommentItem {
                id: c.id,
                author: c.author_nickname.clone().unwrap_or_else(|| ANONYMOUS.to_string()),
                created_at: format_date_time(c.created_at.as_deref()),
                content: c.content.clone(),
                editable: c.mine,
            })
            .collect()
    }
}
