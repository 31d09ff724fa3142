//! The API facade: one method per Discuit operation.
//!
//! # Design
//! Each method performs exactly one `RestAdapter` call and one decode step.
//! Adapter failures pass through untouched; a payload that does not fit the
//! expected entity becomes `DiscuitError::Decode`. Nothing is cached between
//! calls and pagination cursors are never followed automatically.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, instrument, Span};

use crate::adapter::RestAdapter;
use crate::config::ClientConfig;
use crate::error::{DiscuitError, Result};
use crate::http::{Transport, UreqTransport};
use crate::types::{Comments, Community, CommunityRule, Link, Post, Posts, PostsQuery, User};

/// Blocking client for the Discuit API.
#[derive(Debug)]
pub struct DiscuitClient<T = UreqTransport> {
    adapter: RestAdapter<T>,
}

impl DiscuitClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            adapter: RestAdapter::new(config),
        }
    }
}

impl Default for DiscuitClient<UreqTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> DiscuitClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            adapter: RestAdapter::with_transport(config, transport),
        }
    }

    pub fn from_adapter(adapter: RestAdapter<T>) -> Self {
        Self { adapter }
    }

    /// Log every request inside `span`.
    pub fn with_span(self, span: Span) -> Self {
        Self {
            adapter: self.adapter.with_span(span),
        }
    }

    pub fn adapter(&self) -> &RestAdapter<T> {
        &self.adapter
    }

    /// One page of the `posts` listing.
    #[instrument(level = "debug", skip(self))]
    pub fn get_posts(&self, query: &PostsQuery) -> Result<Posts> {
        if let Some(id) = &query.community_id {
            require("community id", id)?;
        }
        let result = self.adapter.get("posts", &query.params())?;
        decode(result.data, "posts")
    }

    /// Most recent posts, site-wide.
    pub fn get_all_posts(&self) -> Result<Posts> {
        self.get_posts(&PostsQuery::new())
    }

    /// Most recent posts in one community.
    pub fn get_community_posts(&self, community_id: &str) -> Result<Posts> {
        self.get_posts(&PostsQuery::new().community(community_id))
    }

    /// A post by its public id (the short id in post URLs).
    ///
    /// The endpoint answers with a page of posts; the first one is returned
    /// and an empty page is `NotFound`. A bare post object is accepted too.
    #[instrument(level = "debug", skip(self))]
    pub fn get_post_by_id(&self, public_id: &str) -> Result<Post> {
        require("post id", public_id)?;
        let result = self.adapter.get(&format!("posts/{public_id}"), &[])?;

        if result.data.get("posts").is_none() && result.data.get("publicId").is_some() {
            return decode(result.data, "post");
        }
        let posts: Posts = decode(result.data, "posts")?;
        posts
            .into_iter()
            .next()
            .ok_or_else(|| DiscuitError::NotFound(format!("post {public_id}")))
    }

    /// First page of comments on a post.
    pub fn get_post_comments(&self, public_id: &str) -> Result<Comments> {
        self.get_post_comments_page(public_id, None)
    }

    /// A page of comments on a post; pass `Comments::next` from the previous
    /// page as `next`.
    #[instrument(level = "debug", skip(self))]
    pub fn get_post_comments_page(&self, public_id: &str, next: Option<&str>) -> Result<Comments> {
        require("post id", public_id)?;
        let params: Vec<(String, String)> = next
            .map(|cursor| vec![("next".to_string(), cursor.to_string())])
            .unwrap_or_default();
        let result = self
            .adapter
            .get(&format!("posts/{public_id}/comments"), &params)?;
        decode(result.data, "comments")
    }

    /// Download the content behind `link.url` into `link`.
    #[instrument(level = "debug", skip(self, link), fields(url = %link.url))]
    pub fn fetch_link_data(&self, link: &mut Link) -> Result<()> {
        let content = self.adapter.fetch_data(&link.url)?;
        link.set_content(content);
        Ok(())
    }

    /// Fetch `link` and write it under `dir`. See [`Link::save_to`].
    pub fn save_link(
        &self,
        link: &mut Link,
        dir: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        self.fetch_link_data(link)?;
        link.save_to(dir, filename)
    }

    /// Every community, site-wide.
    #[instrument(level = "debug", skip(self))]
    pub fn get_communities(&self) -> Result<Vec<Community>> {
        let result = self.adapter.get("communities", &[])?;
        decode_each(result.data, "community")
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_community_by_id(&self, community_id: &str) -> Result<Community> {
        require("community id", community_id)?;
        let result = self.adapter.get(&format!("communities/{community_id}"), &[])?;
        decode(result.data, "community")
    }

    /// Rules of a community, in the order the service returns them.
    #[instrument(level = "debug", skip(self))]
    pub fn get_community_rules(&self, community_id: &str) -> Result<Vec<CommunityRule>> {
        require("community id", community_id)?;
        let result = self
            .adapter
            .get(&format!("communities/{community_id}/rules"), &[])?;
        decode_each(result.data, "community rule")
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_community_mods(&self, community_id: &str) -> Result<Vec<User>> {
        require("community id", community_id)?;
        let result = self
            .adapter
            .get(&format!("communities/{community_id}/mods"), &[])?;
        decode_each(result.data, "moderator")
    }

    /// Discuit has no user-by-id endpoint; use `get_user_by_username`.
    pub fn get_user_by_id(&self, _user_id: &str) -> Result<User> {
        Err(DiscuitError::NotImplemented("get_user_by_id"))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        require("username", username)?;
        let result = self.adapter.get(&format!("users/{username}"), &[])?;
        decode(result.data, "user")
    }
}

/// Ids and usernames become a single path segment, so only URL-unreserved
/// characters are accepted.
fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DiscuitError::InvalidArgument(format!("{what} must not be empty")));
    }
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
    if !value.chars().all(unreserved) || value == "." || value == ".." {
        return Err(DiscuitError::InvalidArgument(format!(
            "{what} {value:?} is not a valid path segment"
        )));
    }
    Ok(())
}

fn decode<D: DeserializeOwned>(data: Value, context: &str) -> Result<D> {
    serde_json::from_value(data).map_err(|e| {
        error!(context, error = %e, "payload does not match entity");
        DiscuitError::decode(context, e)
    })
}

/// Decode a JSON array element by element so a failure names its index.
fn decode_each<D: DeserializeOwned>(data: Value, context: &str) -> Result<Vec<D>> {
    let items = match data {
        Value::Array(items) => items,
        other => {
            let e = serde_json::from_value::<Vec<Value>>(other)
                .err()
                .unwrap_or_else(|| serde::de::Error::custom("expected a list"));
            error!(context, error = %e, "payload is not a list");
            return Err(DiscuitError::decode(format!("{context} list"), e));
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode(item, &format!("{context} #{index}")))
        .collect()
}
