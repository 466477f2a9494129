//! Wire model.
//!
//! Read-through copies of server entities. The client never mutates these
//! except to replace them with a fresher copy from the server; transient
//! interaction state (likes, reply targets) lives in the application layer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a server-assigned identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier as sent on the wire.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Opaque user identifier.
    UserId
);
string_id!(
    /// Opaque post identifier.
    PostId
);
string_id!(
    /// Opaque comment identifier.
    CommentId
);

/// A user as embedded in posts, comments and like lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server identifier.
    pub id: UserId,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Contact email. Only present on the viewer's own profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Unique handle used for mentions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account is active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Computed follower count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    /// Computed following count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Minimal active user with a handle and no profile fields.
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            email: None,
            username: Some(username.into()),
            is_active: true,
            avatar_url: None,
            followers_count: None,
            following_count: None,
        }
    }

    /// Set first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// "First Last", falling back to the handle and then the id.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() { self.handle().to_owned() } else { full }
    }

    /// Mention handle without the `@`. Falls back to the id.
    pub fn handle(&self) -> &str {
        self.username.as_deref().filter(|u| !u.is_empty()).unwrap_or(self.id.as_str())
    }
}

/// A top-level feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server identifier.
    pub id: PostId,
    /// Headline.
    #[serde(default)]
    pub title: String,
    /// Body text.
    pub content: String,
    /// Attached image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Post author.
    pub author: User,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Server like count at fetch time.
    #[serde(default)]
    pub likes_count: u64,
    /// Server comment count at fetch time.
    #[serde(default)]
    pub comments_count: u64,
    /// Whether the viewer liked this post, if the server computed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked_by_current_user: Option<bool>,
}

/// A comment on a post, or a reply to another comment.
///
/// `replies` makes this a tree rooted at each top-level comment. The server
/// guarantees the tree is acyclic; depth is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Server identifier.
    pub id: CommentId,
    /// Comment text.
    pub content: String,
    /// Comment author.
    pub author: User,
    /// Post this comment belongs to.
    pub post_id: PostId,
    /// Parent comment for replies. `None` for top-level comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Users who liked this comment.
    #[serde(default)]
    pub likes: Vec<User>,
    /// Child replies in server order.
    #[serde(default)]
    pub replies: Vec<Comment>,
}

/// Entity a like applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    /// A post.
    Post(PostId),
    /// A comment at any depth.
    Comment(CommentId),
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post(id) => write!(f, "post {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
        }
    }
}

/// Server answer to a like toggle or like check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    /// Viewer likes the target after the call.
    pub liked: bool,
}

/// Request body for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Comment text.
    pub content: String,
    /// Post to comment on.
    pub post_id: PostId,
    /// Comment being replied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

/// Request body for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Previously uploaded image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Authenticated viewer.
    pub user: User,
}
