//! Tolerant decoding of backend payloads.
//!
//! The backend has shipped several shapes for the same resource over time
//! (`id` vs `userId` vs `user.id`, `authorId` vs `author.id`, ...). All of
//! that guessing happens here; the rest of the crate only sees `models`.

use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::models::*;

/// First value found along any of `paths`, each path being a chain of object keys.
fn lookup<'a>(v: &'a Value, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let found = path.iter().try_fold(v, |cur, key| cur.get(*key))?;
        (!found.is_null()).then_some(found)
    })
}

/// Only JSON numbers count as ids; `"5"` does not.
fn number_at(v: &Value, paths: &[&[&str]]) -> Option<i64> {
    lookup(v, paths).and_then(Value::as_i64)
}

fn string_at(v: &Value, paths: &[&[&str]]) -> Option<String> {
    lookup(v, paths).and_then(Value::as_str).map(str::to_string)
}

fn count_at(v: &Value, key: &str) -> i64 {
    v.get(key).and_then(Value::as_f64).map(|n| n as i64).unwrap_or(0)
}

fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Resource ids may arrive as numbers or numeric strings. Ownership checks
/// never go through here; they use [`number_at`].
fn resource_id(v: &Value) -> Option<Id> {
    match v.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn require_id(v: &Value, what: &str) -> Result<Id, ApiError> {
    resource_id(v).ok_or_else(|| ApiError::Decode(format!("{what} without usable id")))
}

/// Decode every row of `items`, dropping the ones that fail.
fn rows<T>(items: &[Value], what: &str, decode: fn(&Value) -> Result<T, ApiError>) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match decode(item) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("skipping {what} row: {e}");
                None
            }
        })
        .collect()
}

fn u32_at(v: &Value, key: &str) -> Option<u32> {
    v.get(key).and_then(Value::as_u64).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

pub fn current_user(v: &Value) -> CurrentUser {
    CurrentUser {
        id: number_at(v, &[&["id"], &["userId"], &["user", "id"], &["data", "id"]]),
        email: string_at(v, &[&["email"], &["data", "email"], &["user", "email"]]),
        nickname: string_at(v, &[&["nickname"], &["data", "nickname"], &["user", "nickname"]]),
    }
}

fn author_id(v: &Value) -> Option<Id> {
    number_at(v, &[&["authorId"], &["author", "id"], &["userId"], &["authorUserId"]])
}

pub fn post(v: &Value) -> Result<Post, ApiError> {
    Ok(Post {
        id: require_id(v, "post")?,
        title: string_at(v, &[&["title"]]).unwrap_or_default(),
        content: string_at(v, &[&["content"]]).unwrap_or_default(),
        author_id: author_id(v),
        author_nickname: string_at(v, &[&["authorNickname"]]),
        created_at: string_at(v, &[&["createdAt"]]),
        like_count: count_at(v, "likeCount"),
        view_count: count_at(v, "viewCount"),
        comment_count: count_at(v, "commentCount"),
        liked: truthy(v.get("liked")),
    })
}

pub fn post_summary(v: &Value) -> Result<PostSummary, ApiError> {
    Ok(PostSummary {
        id: require_id(v, "post summary")?,
        title: string_at(v, &[&["title"]]).unwrap_or_default(),
        author_id: number_at(v, &[&["authorId"], &["author", "id"], &["userId"]]),
        author_nickname: string_at(v, &[&["authorNickname"]]),
        author_avatar_url: string_at(v, &[&["authorProfileImageUrl"], &["profileImageUrl"]])
            .filter(|u| !u.is_empty()),
        created_at: string_at(v, &[&["createdAt"]]),
        like_count: count_at(v, "likeCount"),
        comment_count: count_at(v, "commentCount"),
        view_count: count_at(v, "viewCount"),
    })
}

/// A missing or non-array `content` decodes as an empty page. Rows without a
/// usable id are dropped; an absent `totalPages` stays unknown.
pub fn post_page(v: &Value) -> Result<PostPage, ApiError> {
    let content = match v.get("content") {
        Some(Value::Array(items)) => rows(items, "post summary", post_summary),
        _ => Vec::new(),
    };
    Ok(PostPage {
        content,
        page: u32_at(v, "page").unwrap_or(0),
        size: u32_at(v, "size").unwrap_or(0),
        total_elements: v.get("totalElements").and_then(Value::as_u64).unwrap_or(0),
        total_pages: u32_at(v, "totalPages"),
    })
}

pub fn comment(v: &Value) -> Result<Comment, ApiError> {
    Ok(Comment {
        id: require_id(v, "comment")?,
        content: string_at(v, &[&["content"]]).unwrap_or_default(),
        author_nickname: string_at(v, &[&["authorNickname"]]),
        created_at: string_at(v, &[&["createdAt"]]),
        mine: truthy(v.get("mine")),
    })
}

pub fn comments(v: &Value) -> Result<Vec<Comment>, ApiError> {
    match v {
        Value::Array(items) => Ok(rows(items, "comment", comment)),
        _ => Err(ApiError::Decode("comment list is not an array".into())),
    }
}

pub fn like_count(v: &Value) -> LikeCount {
    LikeCount { like_count: v.get("likeCount").and_then(Value::as_i64) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_user_id_variants() {
        assert_eq!(current_user(&json!({"id": 3})).id, Some(3));
        assert_eq!(current_user(&json!({"userId": 4})).id, Some(4));
        assert_eq!(current_user(&json!({"user": {"id": 5, "nickname": "kim"}})).id, Some(5));
        assert_eq!(current_user(&json!({"data": {"id": 6}})).id, Some(6));
        // string ids are not ids
        assert_eq!(current_user(&json!({"id": "7"})).id, None);
        let u = current_user(&json!({"user": {"nickname": "lee"}}));
        assert_eq!(u.nickname.as_deref(), Some("lee"));
    }

    #[test]
    fn post_author_and_defaults() {
        let p = post(&json!({"id": 1, "author": {"id": 9}})).unwrap();
        assert_eq!(p.author_id, Some(9));
        assert_eq!(p.title, "");
        assert_eq!(p.like_count, 0);
        assert!(!p.liked);

        let p = post(&json!({"id": 2, "authorUserId": 11, "liked": true, "likeCount": 4})).unwrap();
        assert_eq!(p.author_id, Some(11));
        assert!(p.liked);
        assert_eq!(p.like_count, 4);

        assert!(post(&json!({"title": "no id"})).is_err());
    }

    #[test]
    fn page_with_missing_content_is_empty() {
        let page = post_page(&json!({"content": null, "totalPages": 0})).unwrap();
        assert!(page.content.is_empty());
        let page = post_page(&json!({"content": [{"id": 1, "title": "a"}], "totalPages": 3, "page": 0})).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_pages, Some(3));
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let page = post_page(&json!({
            "content": [{"id": 1}, {"title": "no id"}, {"id": "2"}, {"id": "x"}],
            "totalPages": 1
        }))
        .unwrap();
        assert_eq!(page.content.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        let list = comments(&json!([{"id": 1, "content": "a"}, {"content": "b"}, {"id": "3"}])).unwrap();
        assert_eq!(list.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(comments(&json!({"content": []})).is_err());
    }

    #[test]
    fn string_resource_id_but_numeric_author_only() {
        let p = post(&json!({"id": "12", "authorId": "7"})).unwrap();
        assert_eq!(p.id, 12);
        assert_eq!(p.author_id, None);
    }

    #[test]
    fn total_pages_absent_or_huge() {
        let page = post_page(&json!({"content": [{"id": 1}]})).unwrap();
        assert_eq!(page.total_pages, None);
        let page = post_page(&json!({"content": [], "totalPages": 4294967296u64})).unwrap();
        assert_eq!(page.total_pages, Some(u32::MAX));
    }

    #[test]
    fn summary_avatar_url_variants() {
        let s = post_summary(&json!({"id": 1, "authorProfileImageUrl": "/a.png"})).unwrap();
        assert_eq!(s.author_avatar_url.as_deref(), Some("/a.png"));
        let s = post_summary(&json!({"id": 1, "profileImageUrl": "/b.png"})).unwrap();
        assert_eq!(s.author_avatar_url.as_deref(), Some("/b.png"));
        let s = post_summary(&json!({"id": 1, "profileImageUrl": ""})).unwrap();
        assert_eq!(s.author_avatar_url, None);
    }

    #[test]
    fn like_count_optional() {
        assert_eq!(like_count(&json!({"likeCount": 8})).like_count, Some(8));
        assert_eq!(like_count(&json!({})).like_count, None);
    }
}
