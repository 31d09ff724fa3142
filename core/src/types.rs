//! Entities returned by the Discuit API.
//!
//! # Design
//! Every entity is built from one JSON object. Keys are camelCase on the wire
//! and snake_case here. Keys an entity does not model are collected into its
//! `extra` map and written back out on serialization, so a payload survives a
//! decode/encode cycle even when the service grows new fields.
//!
//! Viewer-dependent flags (`user_joined`, `user_voted`, ...) are `Option`
//! because the service sends `null` for anonymous requests.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{DiscuitError, Result};

/// Unmodeled JSON keys of an entity.
pub type Extra = Map<String, Value>;

/// Accept `null` wherever a list is expected.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Image metadata. Identified by its URL only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub average_color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// External link attached to a post.
///
/// `content` is never part of the payload; it is filled in by
/// `DiscuitClient::fetch_link_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(skip)]
    content: Option<Vec<u8>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Link {
    pub fn new(url: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            hostname: hostname.into(),
            content: None,
            extra: Extra::new(),
        }
    }

    /// Fetched bytes, if any.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = Some(content);
    }

    /// Last path segment of `url`, ignoring query string and fragment.
    pub fn default_filename(&self) -> Option<&str> {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().filter(|segment| !segment.is_empty())
    }

    /// Write the fetched content to `dir/filename`, creating `dir` and any
    /// missing parents. `filename` defaults to [`Link::default_filename`].
    /// Returns the path written.
    pub fn save_to(&self, dir: impl AsRef<Path>, filename: Option<&str>) -> Result<PathBuf> {
        let content = self.content.as_deref().ok_or_else(|| DiscuitError::NoData {
            url: self.url.clone(),
        })?;
        let filename = filename.or_else(|| self.default_filename()).ok_or_else(|| {
            DiscuitError::InvalidArgument(format!("no filename given and none in {}", self.url))
        })?;

        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| DiscuitError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(filename);
        fs::write(&path, content).map_err(|source| DiscuitError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// A single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    /// `text`, `image` or `link`.
    #[serde(rename = "type", default)]
    pub post_type: Option<String>,
    pub public_id: String,
    pub user_id: String,
    pub username: String,
    pub community_id: String,
    pub community_name: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub link: Option<Link>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub locked_by: Option<String>,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    #[serde(default)]
    pub hotness: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_by: Option<String>,
    #[serde(rename = "noComments", default)]
    pub comment_count: i64,
    /// Only present on single-post payloads.
    #[serde(default)]
    pub comments: Option<Vec<Comment>>,
    /// Cursor for the next page of `comments`.
    #[serde(default)]
    pub comments_next: Option<String>,
    #[serde(default)]
    pub user_voted: Option<bool>,
    #[serde(default)]
    pub user_voted_up: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Post {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// One page of posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Posts {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub posts: Vec<Post>,
    /// Pass back as `PostsQuery::next` to get the following page.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Posts {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

impl IntoIterator for Posts {
    type Item = Post;
    type IntoIter = std::vec::IntoIter<Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.into_iter()
    }
}

impl<'a> IntoIterator for &'a Posts {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

/// A comment on a post.
///
/// Comments form a tree: `parent_id` points at the immediate parent and
/// `ancestors` lists every ancestor id from the root down to the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub post_public_id: String,
    pub community_id: String,
    #[serde(default)]
    pub community_name: Option<String>,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// 0 for top-level comments.
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub no_replies: i64,
    #[serde(default)]
    pub no_replies_direct: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ancestors: Vec<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_voted: Option<bool>,
    #[serde(default)]
    pub user_voted_up: Option<bool>,
    #[serde(default)]
    pub post_deleted: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Comment {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 0 && self.parent_id.is_none()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// One page of comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comments {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Comments {
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Comment> {
        self.comments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

impl IntoIterator for Comments {
    type Item = Comment;
    type IntoIter = std::vec::IntoIter<Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Comments {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRule {
    pub id: i64,
    pub rule: String,
    #[serde(default)]
    pub description: Option<String>,
    pub community_id: String,
    /// Display position, ascending.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    /// Creator.
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(rename = "about", default)]
    pub description: Option<String>,
    #[serde(rename = "noMembers", default)]
    pub member_count: i64,
    #[serde(rename = "proPic", default)]
    pub avatar: Option<Image>,
    #[serde(default)]
    pub banner_image: Option<Image>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_joined: Option<bool>,
    #[serde(default)]
    pub user_mod: Option<bool>,
    #[serde(default)]
    pub mods: Option<Vec<User>>,
    #[serde(default)]
    pub rules: Option<Vec<CommunityRule>>,
    #[serde(rename = "ReportsDetails", default)]
    pub reports_details: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Community {
    /// Rules in display order.
    pub fn sorted_rules(&self) -> Vec<&CommunityRule> {
        let mut rules: Vec<&CommunityRule> = self.rules.iter().flatten().collect();
        rules.sort_by_key(|rule| rule.z_index);
        rules
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(rename = "aboutMe", default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(rename = "noPosts", default)]
    pub post_count: i64,
    #[serde(rename = "noComments", default)]
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub banned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(rename = "notificationsNewCount", default)]
    pub unread_notifications: i64,
    /// Ids of the communities this user moderates.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modding_list: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Sort orders accepted by the posts listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Latest,
    Hot,
    Activity,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl PostSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostSort::Latest => "latest",
            PostSort::Hot => "hot",
            PostSort::Activity => "activity",
            PostSort::Day => "day",
            PostSort::Week => "week",
            PostSort::Month => "month",
            PostSort::Year => "year",
            PostSort::All => "all",
        }
    }
}

/// Parameters for the `posts` listing.
///
/// Pagination is caller driven: feed `Posts::next` from one page into
/// [`PostsQuery::next`] for the following call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsQuery {
    pub community_id: Option<String>,
    pub sort: Option<PostSort>,
    pub limit: Option<u32>,
    pub next: Option<String>,
}

impl PostsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn community(mut self, community_id: impl Into<String>) -> Self {
        self.community_id = Some(community_id.into());
        self
    }

    pub fn sort(mut self, sort: PostSort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn next(mut self, cursor: impl Into<String>) -> Self {
        self.next = Some(cursor.into());
        self
    }

    /// Query-string pairs for this query, in a fixed order.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(id) = &self.community_id {
            params.push(("communityID".to_string(), id.clone()));
        }
        if let Some(sort) = self.sort {
            params.push(("sort".to_string(), sort.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(next) = &self.next {
            params.push(("next".to_string(), next.clone()));
        }
        params
    }
}
