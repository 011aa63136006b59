use tracing::info;

use crate::models::{Id, ImageUpload, PostDraft};
use crate::shell::{post_id_from_query, PageContext, Route};
use crate::validate;

pub const NO_FILE: &str = "Please choose a file.";

/// Title/content/image fields shared by the create and edit pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl PostFields {
    pub fn is_valid(&self) -> bool {
        validate::post_title(&self.title).ok && validate::post_content(&self.content).ok
    }

    pub fn image_label(&self) -> &str {
        self.image.as_ref().map(|i| i.file_name.as_str()).unwrap_or(NO_FILE)
    }

    fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostHelpers {
    pub title: Option<String>,
    pub content: Option<String>,
    pub form: Option<String>,
}

pub struct MakePostForm {
    ctx: PageContext,
    fields: PostFields,
    helpers: PostHelpers,
}

impl MakePostForm {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx, fields: PostFields::default(), helpers: PostHelpers::default() }
    }

    pub fn fields(&self) -> &PostFields {
        &self.fields
    }

    pub fn helpers(&self) -> &PostHelpers {
        &self.helpers
    }

    pub fn submit_enabled(&self) -> bool {
        self.fields.is_valid()
    }

    pub fn set_title(&mut self, v: impl Into<String>) {
        self.fields.title = v.into();
        self.on_input();
    }

    pub fn set_content(&mut self, v: impl Into<String>) {
        self.fields.content = v.into();
        self.on_input();
    }

    pub fn set_image(&mut self, upload: Option<ImageUpload>) {
        self.fields.image = upload;
    }

    /// While typing only the title length is flagged; empties wait for submit.
    fn on_input(&mut self) {
        let title = validate::post_title(&self.fields.title);
        self.helpers.title = (!title.ok && !self.fields.title.trim().is_empty()).then_some(title.reason);
    }

    pub async fn submit(&mut self) -> bool {
        let title = validate::post_title(&self.fields.title);
        let content = validate::post_content(&self.fields.content);
        let title_empty = self.fields.title.trim().is_empty();
        if title_empty || !content.ok {
            self.helpers.form = Some("* Please fill in both the title and the content.".into());
            if title_empty {
                self.helpers.title = Some(title.reason.clone());
            }
            if !content.ok {
                self.helpers.content = Some(content.reason);
            }
            return false;
        }
        if !title.ok {
            self.helpers.title = Some(title.reason);
            return false;
        }
        self.helpers.form = None;

        match self.ctx.backend.create_post(self.fields.draft()).await {
            Ok(()) => {
                info!("post created");
                self.ctx.shell.alert("Your post has been published.");
                self.ctx.shell.navigate(Route::Posts);
                true
            }
            Err(e) => {
                self.ctx.report_failure("create post", &e, "Failed to publish the post.");
                false
            }
        }
    }

    pub fn go_back(&self) {
        self.ctx.shell.navigate(Route::Posts);
    }
}

pub struct EditPostForm {
    ctx: PageContext,
    post_id: Id,
    fields: PostFields,
    helpers: PostHelpers,
}

impl EditPostForm {
    pub fn new(ctx: PageContext, post_id: Id) -> Self {
        Self { ctx, post_id, fields: PostFields::default(), helpers: PostHelpers::default() }
    }

    pub fn from_query(ctx: PageContext, query: &str) -> Option<Self> {
        match post_id_from_query(query) {
            Some(id) => Some(Self::new(ctx, id)),
            None => {
                ctx.shell.alert(crate::post::INVALID_ACCESS);
                ctx.shell.navigate(Route::Posts);
                None
            }
        }
    }

    pub fn post_id(&self) -> Id {
        self.post_id
    }

    pub fn fields(&self) -> &PostFields {
        &self.fields
    }

    pub fn helpers(&self) -> &PostHelpers {
        &self.helpers
    }

    pub fn submit_enabled(&self) -> bool {
        self.fields.is_valid()
    }

    /// Pre-fill from the server; failure abandons the page.
    pub async fn load(&mut self) -> bool {
        match self.ctx.backend.get_post(self.post_id).await {
            Ok(post) => {
                self.fields.title = post.title;
                self.fields.content = post.content;
                self.validate();
                true
            }
            Err(e) => {
                tracing::warn!("post {} failed to load: {e}", self.post_id);
                self.ctx.shell.alert("Failed to load the post.");
                self.ctx.shell.navigate(Route::Posts);
                false
            }
        }
    }

    pub fn set_title(&mut self, v: impl Into<String>) {
        self.fields.title = v.into();
        self.validate();
    }

    pub fn set_content(&mut self, v: impl Into<String>) {
        self.fields.content = v.into();
        self.validate();
    }

    pub fn set_image(&mut self, upload: Option<ImageUpload>) {
        self.fields.image = upload;
    }

    fn validate(&mut self) {
        let title = validate::post_title(&self.fields.title);
        let content = validate::post_content(&self.fields.content);
        self.helpers.title = (!title.ok).then_some(title.reason);
        self.helpers.content = (!content.ok).then_some(content.reason);
    }

    pub async fn submit(&mut self) -> bool {
        self.validate();
        if !self.fields.is_valid() {
            self.ctx.shell.alert("Please fill in both the title and the content.");
            return false;
        }
        match self.ctx.backend.update_post(self.post_id, self.fields.draft()).await {
            Ok(()) => {
                self.ctx.shell.alert("Your post has been updated.");
                self.ctx.shell.navigate(Route::Post(self.post_id));
                true
            }
            Err(e) => {
                self.ctx.report_failure("update post", &e, "Failed to update the post.");
                false
            }
        }
    }

    pub fn go_back(&self) {
        self.ctx.shell.navigate(Route::Post(self.post_id));
    }
}
