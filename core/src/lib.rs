//! Blocking client for the Discuit forum API.
//!
//! # Overview
//! `DiscuitClient` exposes one method per API operation (posts, comments,
//! communities, users, link downloads). Each call goes through `RestAdapter`,
//! which performs exactly one HTTP request and sorts the outcome into an
//! `ApiResult` or a `DiscuitError`, and is then decoded into a typed entity.
//!
//! # Design
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default; tests plug in scripted transports.
//! - Entities keep unknown JSON keys in an `extra` map, so fields the service
//!   adds later are carried along instead of breaking decoding.
//! - No state is written during a call: configuration is fixed at
//!   construction, and pagination cursors are handed back to the caller.
//!
//! ```no_run
//! use discuit_core::{ClientConfig, DiscuitClient};
//!
//! let client = DiscuitClient::new(ClientConfig::default());
//! let page = client.get_community_posts("177a1ae4ee883ca82b22d914")?;
//! for post in &page {
//!     println!("{} ({})", post.title, post.score());
//! }
//! # Ok::<(), discuit_core::DiscuitError>(())
//! ```

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

#[cfg(test)]
mod testing;

pub use adapter::{ApiResult, RestAdapter};
pub use client::DiscuitClient;
pub use config::ClientConfig;
pub use error::{DiscuitError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{
    Comment, Comments, Community, CommunityRule, Image, Link, Post, PostSort, Posts, PostsQuery,
    User,
};
