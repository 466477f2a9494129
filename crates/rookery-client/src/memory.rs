//! In-memory API implementation.
//!
//! [`MemoryClient`] models the remote server closely enough for
//! deterministic tests and offline demo mode: it owns counters and like sets,
//! assembles comment trees on read, enforces author-only deletion, and can be
//! switched offline to inject network failures.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Duration, Utc};

use crate::{
    ClientError, Comment, CommentId, Credentials, InteractionClient, LikeStatus, LikeTarget,
    NewComment, NewPost, Post, PostId, Session, User, UserId,
};

/// Shared in-memory server.
///
/// Clones share state, so a test can hold one handle for seeding and
/// inspection while the application drives another.
#[derive(Clone)]
pub struct MemoryClient {
    inner: Arc<Mutex<MemoryServer>>,
}

struct StoredPost {
    id: PostId,
    author: UserId,
    title: String,
    content: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

struct StoredComment {
    id: CommentId,
    author: UserId,
    post_id: PostId,
    parent_id: Option<CommentId>,
    content: String,
    created_at: DateTime<Utc>,
}

struct Account {
    password: String,
    user_id: UserId,
}

struct MemoryServer {
    users: HashMap<UserId, User>,
    accounts: HashMap<String, Account>,
    viewer: Option<UserId>,
    /// Posts in creation order. Listing returns newest first.
    posts: Vec<StoredPost>,
    /// Comments in creation order across all posts.
    comments: Vec<StoredComment>,
    /// Likers per target, in like order.
    likes: HashMap<LikeTarget, Vec<UserId>>,
    next_id: u64,
    /// Logical clock for creation timestamps.
    clock: DateTime<Utc>,
    offline: bool,
    requests: usize,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    /// Empty server with no users and no viewer.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Empty server whose logical clock starts at `clock`.
    ///
    /// Each created entity advances the clock by one minute.
    pub fn starting_at(clock: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryServer {
                users: HashMap::new(),
                accounts: HashMap::new(),
                viewer: None,
                posts: Vec::new(),
                comments: Vec::new(),
                likes: HashMap::new(),
                next_id: 1,
                clock,
                offline: false,
                requests: 0,
            })),
        }
    }

    /// Server populated with a few users, posts and a nested thread.
    ///
    /// The viewer is signed in as `ada`.
    pub fn demo() -> Self {
        let client = Self::starting_at(Utc::now() - Duration::days(2));
        let ada = client.add_user(User::new("u-ada", "ada").with_name("Ada", "Byron"));
        let bo = client.add_user(User::new("u-bo", "bo").with_name("Bo", "Kim"));
        let cy = client.add_user(User::new("u-cy", "cy").with_name("Cy", "Ortiz"));
        client.add_account("ada@rookery.test", "rookery", &ada);

        let welcome = client.seed_post(
            &bo,
            "Hello rookery",
            "First post on the new instance. Say hi in the comments!",
        );
        let first = client.seed_comment(&ada, &welcome, None, "Hi Bo!");
        let reply = client.seed_comment(&bo, &welcome, Some(&first), "@ada welcome aboard");
        client.seed_comment(&cy, &welcome, Some(&reply), "@bo nested replies work too");
        client.seed_comment(&cy, &welcome, None, "Great to be here.");
        client.seed_like(&ada, LikeTarget::Post(welcome.clone()));
        client.seed_like(&cy, LikeTarget::Post(welcome));
        client.seed_like(&bo, LikeTarget::Comment(first));

        client.seed_post(&ada, "Notes", "Press c to open a thread, l to like, r to reply.");
        client.sign_in_as(&ada);
        client
    }

    fn lock(&self) -> MutexGuard<'_, MemoryServer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a request and fail it if the server is offline.
    fn begin(&self) -> Result<MutexGuard<'_, MemoryServer>, ClientError> {
        let mut server = self.lock();
        server.requests += 1;
        if server.offline {
            return Err(ClientError::Network("server unreachable".into()));
        }
        Ok(server)
    }

    /// Register a user. Returns its id.
    pub fn add_user(&self, user: User) -> UserId {
        let id = user.id.clone();
        self.lock().users.insert(id.clone(), user);
        id
    }

    /// Register login credentials for an existing user.
    pub fn add_account(&self, email: &str, password: &str, user_id: &UserId) {
        self.lock().accounts.insert(
            email.to_owned(),
            Account { password: password.to_owned(), user_id: user_id.clone() },
        );
    }

    /// Authenticate subsequent calls as `user_id`.
    pub fn sign_in_as(&self, user_id: &UserId) {
        self.lock().viewer = Some(user_id.clone());
    }

    /// Drop authentication.
    pub fn sign_out(&self) {
        self.lock().viewer = None;
    }

    /// Insert a post authored by `author`, bypassing authentication.
    pub fn seed_post(&self, author: &UserId, title: &str, content: &str) -> PostId {
        let mut server = self.lock();
        let id = PostId::new(server.allocate_id("p"));
        let created_at = server.tick();
        server.posts.push(StoredPost {
            id: id.clone(),
            author: author.clone(),
            title: title.to_owned(),
            content: content.to_owned(),
            image_url: None,
            created_at,
        });
        id
    }

    /// Insert a comment authored by `author`, bypassing authentication.
    pub fn seed_comment(
        &self,
        author: &UserId,
        post_id: &PostId,
        parent_id: Option<&CommentId>,
        content: &str,
    ) -> CommentId {
        let mut server = self.lock();
        let id = CommentId::new(server.allocate_id("c"));
        let created_at = server.tick();
        server.comments.push(StoredComment {
            id: id.clone(),
            author: author.clone(),
            post_id: post_id.clone(),
            parent_id: parent_id.cloned(),
            content: content.to_owned(),
            created_at,
        });
        id
    }

    /// Record a like by `user_id`, bypassing authentication. Idempotent.
    pub fn seed_like(&self, user_id: &UserId, target: LikeTarget) {
        let mut server = self.lock();
        let likers = server.likes.entry(target).or_default();
        if !likers.contains(user_id) {
            likers.push(user_id.clone());
        }
    }

    /// Make every subsequent call fail with [`ClientError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Number of API calls received, including failed ones.
    pub fn request_count(&self) -> usize {
        self.lock().requests
    }

    /// Number of posts currently stored.
    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }
}

impl MemoryServer {
    fn allocate_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::minutes(1);
        self.clock
    }

    fn viewer(&self) -> Result<UserId, ClientError> {
        self.viewer.clone().ok_or_else(|| ClientError::Unauthorized("not signed in".into()))
    }

    fn user(&self, id: &UserId) -> User {
        self.users.get(id).cloned().unwrap_or_else(|| User::new(id.clone(), id.as_str()))
    }

    fn post(&self, id: &PostId) -> Result<&StoredPost, ClientError> {
        self.posts
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("post {id}")))
    }

    fn target_exists(&self, target: &LikeTarget) -> bool {
        match target {
            LikeTarget::Post(id) => self.posts.iter().any(|p| &p.id == id),
            LikeTarget::Comment(id) => self.comments.iter().any(|c| &c.id == id),
        }
    }

    fn likers(&self, target: &LikeTarget) -> &[UserId] {
        self.likes.get(target).map_or(&[], Vec::as_slice)
    }

    fn render_post(&self, stored: &StoredPost) -> Post {
        let target = LikeTarget::Post(stored.id.clone());
        let likers = self.likers(&target);
        Post {
            id: stored.id.clone(),
            title: stored.title.clone(),
            content: stored.content.clone(),
            image_url: stored.image_url.clone(),
            author: self.user(&stored.author),
            created_at: stored.created_at,
            likes_count: likers.len() as u64,
            comments_count: self.comments.iter().filter(|c| c.post_id == stored.id).count() as u64,
            is_liked_by_current_user: self.viewer.as_ref().map(|v| likers.contains(v)),
        }
    }

    fn render_comment(&self, stored: &StoredComment) -> Comment {
        let target = LikeTarget::Comment(stored.id.clone());
        Comment {
            id: stored.id.clone(),
            content: stored.content.clone(),
            author: self.user(&stored.author),
            post_id: stored.post_id.clone(),
            parent_id: stored.parent_id.clone(),
            created_at: stored.created_at,
            likes: self.likers(&target).iter().map(|id| self.user(id)).collect(),
            replies: self.replies(&stored.post_id, Some(&stored.id)),
        }
    }

    /// Children of `parent` on `post_id`, in creation order.
    fn replies(&self, post_id: &PostId, parent: Option<&CommentId>) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| &c.post_id == post_id && c.parent_id.as_ref() == parent)
            .map(|c| self.render_comment(c))
            .collect()
    }
}

impl InteractionClient for MemoryClient {
    async fn toggle_like(&self, target: LikeTarget) -> Result<LikeStatus, ClientError> {
        let mut server = self.begin()?;
        let viewer = server.viewer()?;
        if !server.target_exists(&target) {
            return Err(ClientError::NotFound(target.to_string()));
        }

        let likers = server.likes.entry(target).or_default();
        let liked = if let Some(pos) = likers.iter().position(|id| id == &viewer) {
            likers.remove(pos);
            false
        } else {
            likers.push(viewer);
            true
        };
        Ok(LikeStatus { liked })
    }

    async fn is_liked(&self, target: LikeTarget) -> Result<LikeStatus, ClientError> {
        let server = self.begin()?;
        let viewer = server.viewer()?;
        if !server.target_exists(&target) {
            return Err(ClientError::NotFound(target.to_string()));
        }
        Ok(LikeStatus { liked: server.likers(&target).contains(&viewer) })
    }

    async fn like_count(&self, target: LikeTarget) -> Result<u64, ClientError> {
        let server = self.begin()?;
        if !server.target_exists(&target) {
            return Err(ClientError::NotFound(target.to_string()));
        }
        Ok(server.likers(&target).len() as u64)
    }

    async fn comment_thread(&self, post_id: PostId) -> Result<Vec<Comment>, ClientError> {
        let server = self.begin()?;
        server.post(&post_id)?;
        Ok(server.replies(&post_id, None))
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, ClientError> {
        let mut server = self.begin()?;
        let viewer = server.viewer()?;
        if comment.content.trim().is_empty() {
            return Err(ClientError::Validation("comment content is empty".into()));
        }
        server.post(&comment.post_id)?;
        if let Some(parent) = &comment.parent_id {
            let parent_on_post =
                server.comments.iter().any(|c| &c.id == parent && c.post_id == comment.post_id);
            if !parent_on_post {
                return Err(ClientError::NotFound(format!("comment {parent}")));
            }
        }

        let id = CommentId::new(server.allocate_id("c"));
        let created_at = server.tick();
        let stored = StoredComment {
            id,
            author: viewer,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at,
        };
        let rendered = server.render_comment(&stored);
        server.comments.push(stored);
        Ok(rendered)
    }

    async fn delete_post(&self, post_id: PostId) -> Result<(), ClientError> {
        let mut server = self.begin()?;
        let viewer = server.viewer()?;
        if server.post(&post_id)?.author != viewer {
            return Err(ClientError::Unauthorized(format!("post {post_id} belongs to another user")));
        }

        server.posts.retain(|p| p.id != post_id);
        let removed: HashSet<CommentId> = server
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.id.clone())
            .collect();
        server.comments.retain(|c| c.post_id != post_id);
        server.likes.retain(|target, _| match target {
            LikeTarget::Post(id) => id != &post_id,
            LikeTarget::Comment(id) => !removed.contains(id),
        });
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        let server = self.begin()?;
        Ok(server.posts.iter().rev().map(|p| server.render_post(p)).collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, ClientError> {
        let mut server = self.begin()?;
        let viewer = server.viewer()?;
        if post.content.trim().is_empty() && post.image_url.is_none() {
            return Err(ClientError::Validation("post is empty".into()));
        }

        let id = PostId::new(server.allocate_id("p"));
        let created_at = server.tick();
        let stored = StoredPost {
            id,
            author: viewer,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            created_at,
        };
        let rendered = server.render_post(&stored);
        server.posts.push(stored);
        Ok(rendered)
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        let server = self.begin()?;
        let viewer = server.viewer()?;
        Ok(server.user(&viewer))
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, ClientError> {
        let mut server = self.begin()?;
        let user_id = match server.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.user_id.clone(),
            _ => return Err(ClientError::Unauthorized("invalid credentials".into())),
        };

        server.viewer = Some(user_id.clone());
        Ok(Session { token: format!("memory-{user_id}"), user: server.user(&user_id) })
    }
}
