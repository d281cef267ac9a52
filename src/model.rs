//! Plain data types exchanged between the network layer, the controller,
//! and the renderer.
//!
//! A [`User`] is the subject whose posts are fetched; it is owned by the
//! caller and never mutated by the controller.  A [`Post`] is one record of
//! the `GET /users/<id>/posts` response body.

use serde::{Deserialize, Serialize};

/// The subject of a fetch cycle.
///
/// Equality is by value: observing a `User` equal to the current one does not
/// start a new cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Used to build the request path.
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// A single post belonging to a user.
///
/// The controller does not validate posts beyond "the body decoded".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Stable key for list rendering.
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Build the posts path for `user_id` under `base`.
///
/// A trailing slash on `base` is tolerated.
pub fn posts_url(base: &str, user_id: u64) -> String {
    format!("{}/users/{user_id}/posts", base.trim_end_matches('/'))
}
