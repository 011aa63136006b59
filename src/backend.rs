use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::decode;
use crate::error::{ApiError, ApiResult};
use crate::models::*;

#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> ApiResult<()>;
    async fn logout(&self) -> ApiResult<()>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn signup(&self, req: Signup) -> ApiResult<()>;
    async fn current_user(&self) -> ApiResult<CurrentUser>;
    async fn delete_account(&self) -> ApiResult<()>;
    async fn update_profile(&self, req: ProfileUpdate) -> ApiResult<()>;
    async fn change_password(&self, req: &PasswordChange) -> ApiResult<()>;
    async fn my_profile_image(&self) -> ApiResult<FetchedImage>;
    async fn user_profile_image(&self, user_id: Id) -> ApiResult<FetchedImage>;
}

#[async_trait]
pub trait PostApi: Send + Sync {
    async fn list_posts(&self, req: &PageRequest) -> ApiResult<PostPage>;
    async fn create_post(&self, draft: PostDraft) -> ApiResult<()>;
    async fn get_post(&self, id: Id) -> ApiResult<Post>;
    async fn update_post(&self, id: Id, draft: PostDraft) -> ApiResult<()>;
    async fn delete_post(&self, id: Id) -> ApiResult<()>;
    async fn post_image(&self, id: Id) -> ApiResult<FetchedImage>;
    async fn like_post(&self, id: Id) -> ApiResult<LikeCount>;
    async fn unlike_post(&self, id: Id) -> ApiResult<LikeCount>;
}

#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn list_comments(&self, post_id: Id) -> ApiResult<Vec<Comment>>;
    async fn create_comment(&self, post_id: Id, body: &CommentBody) -> ApiResult<()>;
    async fn update_comment(&self, id: Id, body: &CommentBody) -> ApiResult<()>;
    async fn delete_comment(&self, id: Id) -> ApiResult<()>;
}

/// The whole REST surface the pages consume.
pub trait Backend: SessionApi + UserApi + PostApi + CommentApi {}

impl<T> Backend for T where T: SessionApi + UserApi + PostApi + CommentApi {}

// ---------------- reqwest implementation ----------------

/// Talks to the real backend. Session credentials ride in the cookie store.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()?;
        Ok(Self { client, base_url: config.api_base_url.trim_end_matches('/').to_string() })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and turn any non-2xx into an `ApiError`.
    async fn send(&self, rb: RequestBuilder, what: &str) -> ApiResult<Response> {
        let res = rb.send().await.map_err(|e| {
            error!("{what}: request failed: {e}");
            ApiError::from(e)
        })?;
        let status = res.status();
        if status.is_success() {
            debug!("{what}: {status}");
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        warn!("{what}: {status} {body}");
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    async fn send_json(&self, rb: RequestBuilder, what: &str) -> ApiResult<Value> {
        let res = self.send(rb, what).await?;
        Ok(res.json::<Value>().await?)
    }

    async fn send_empty(&self, rb: RequestBuilder, what: &str) -> ApiResult<()> {
        self.send(rb, what).await.map(|_| ())
    }

    async fn send_image(&self, rb: RequestBuilder, what: &str) -> ApiResult<FetchedImage> {
        let res = self.send(rb, what).await?;
        let bytes = res.bytes().await?;
        Ok(FetchedImage::new(bytes.to_vec()))
    }
}

/// Multipart file field, content type sniffed from the bytes when recognisable.
fn file_part(upload: ImageUpload) -> ApiResult<Part> {
    let mime = infer::get(&upload.bytes).map(|kind| kind.mime_type());
    let part = Part::bytes(upload.bytes).file_name(upload.file_name);
    Ok(match mime {
        Some(m) => part.mime_str(m)?,
        None => part,
    })
}

#[async_trait]
impl SessionApi for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> ApiResult<()> {
        self.send_empty(self.request(Method::POST, "/api/auth/login").json(req), "login").await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.send_empty(self.request(Method::POST, "/api/auth/logout"), "logout").await
    }
}

#[async_trait]
impl UserApi for HttpBackend {
    async fn signup(&self, req: Signup) -> ApiResult<()> {
        let mut form = Form::new()
            .text("email", req.email)
            .text("password", req.password)
            .text("nickname", req.nickname);
        if let Some(img) = req.profile_image {
            form = form.part("profileImage", file_part(img)?);
        }
        self.send_empty(self.request(Method::POST, "/api/users").multipart(form), "signup").await
    }

    async fn current_user(&self) -> ApiResult<CurrentUser> {
        let v = self.send_json(self.request(Method::GET, "/api/users/me"), "current user").await?;
        Ok(decode::current_user(&v))
    }

    async fn delete_account(&self) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, "/api/users/me"), "delete account").await
    }

    async fn update_profile(&self, req: ProfileUpdate) -> ApiResult<()> {
        let mut form = Form::new().text("nickname", req.nickname);
        if let Some(img) = req.profile_image {
            form = form.part("profileImage", file_part(img)?);
        }
        self.send_empty(self.request(Method::PATCH, "/api/users/me/profile").multipart(form), "update profile")
            .await
    }

    async fn change_password(&self, req: &PasswordChange) -> ApiResult<()> {
        self.send_empty(self.request(Method::PATCH, "/api/users/me/password").json(req), "change password")
            .await
    }

    async fn my_profile_image(&self) -> ApiResult<FetchedImage> {
        self.send_image(self.request(Method::GET, "/api/users/me/profile-image"), "my profile image").await
    }

    async fn user_profile_image(&self, user_id: Id) -> ApiResult<FetchedImage> {
        let path = format!("/api/users/{user_id}/profile-image");
        self.send_image(self.request(Method::GET, &path), "user profile image").await
    }
}

#[async_trait]
impl PostApi for HttpBackend {
    async fn list_posts(&self, req: &PageRequest) -> ApiResult<PostPage> {
        let path = format!(
            "/api/posts?page={}&size={}&sort={}&dir={}",
            req.page,
            req.size,
            urlencoding::encode(&req.sort),
            urlencoding::encode(&req.dir)
        );
        let v = self.send_json(self.request(Method::GET, &path), "list posts").await?;
        decode::post_page(&v)
    }

    async fn create_post(&self, draft: PostDraft) -> ApiResult<()> {
        let form = draft_form(draft)?;
        self.send_empty(self.request(Method::POST, "/api/posts").multipart(form), "create post").await
    }

    async fn get_post(&self, id: Id) -> ApiResult<Post> {
        let v = self.send_json(self.request(Method::GET, &format!("/api/posts/{id}")), "get post").await?;
        decode::post(&v)
    }

    async fn update_post(&self, id: Id, draft: PostDraft) -> ApiResult<()> {
        let form = draft_form(draft)?;
        self.send_empty(self.request(Method::PATCH, &format!("/api/posts/{id}")).multipart(form), "update post")
            .await
    }

    async fn delete_post(&self, id: Id) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/posts/{id}")), "delete post").await
    }

    async fn post_image(&self, id: Id) -> ApiResult<FetchedImage> {
        self.send_image(self.request(Method::GET, &format!("/api/posts/{id}/image")), "post image").await
    }

    async fn like_post(&self, id: Id) -> ApiResult<LikeCount> {
        let v = self.send_json(self.request(Method::POST, &format!("/api/posts/{id}/like")), "like").await?;
        Ok(decode::like_count(&v))
    }

    async fn unlike_post(&self, id: Id) -> ApiResult<LikeCount> {
        let v = self.send_json(self.request(Method::DELETE, &format!("/api/posts/{id}/like")), "unlike").await?;
        Ok(decode::like_count(&v))
    }
}

fn draft_form(draft: PostDraft) -> ApiResult<Form> {
    let mut form = Form::new().text("title", draft.title).text("content", draft.content);
    if let Some(img) = draft.image {
        form = form.part("image", file_part(img)?);
    }
    Ok(form)
}

#[async_trait]
impl CommentApi for HttpBackend {
    async fn list_comments(&self, post_id: Id) -> ApiResult<Vec<Comment>> {
        let path = format!("/api/posts/{post_id}/comments");
        let v = self.send_json(self.request(Method::GET, &path), "list comments").await?;
        decode::comments(&v)
    }

    async fn create_comment(&self, post_id: Id, body: &CommentBody) -> ApiResult<()> {
        let path = format!("/api/posts/{post_id}/comments");
        self.send_empty(self.request(Method::POST, &path).json(body), "create comment").await
    }

    async fn update_comment(&self, id: Id, body: &CommentBody) -> ApiResult<()> {
        let path = format!("/api/comments/{id}");
        self.send_empty(self.request(Method::PATCH, &path).json(body), "update comment").await
    }

    async fn delete_comment(&self, id: Id) -> ApiResult<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/comments/{id}")), "delete comment").await
    }
}
