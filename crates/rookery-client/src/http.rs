//! REST transport.
//!
//! [`HttpClient`] implements [`InteractionClient`] over plain HTTP/JSON with
//! bearer-token authentication. Requests carry no timeout and are never
//! retried; callers see each failure exactly once.

#![allow(clippy::disallowed_types, reason = "Token swap only, never held across await")]

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    ClientConfig, ClientError, Comment, Credentials, InteractionClient, LikeStatus, LikeTarget,
    NewComment, NewPost, Post, PostId, Session, User, json,
};

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// HTTP implementation of [`InteractionClient`].
///
/// Clones share the connection pool and the bearer token, so a login
/// through any clone authenticates all of them.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ClientError::Validation(format!("invalid API url: {e}")))?;

        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url: config.base_url, token: Arc::new(RwLock::new(config.token)) })
    }

    /// API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base_url));
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "request rejected");
        Err(ClientError::from_status(status.as_u16(), body))
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let body = Self::send(request).await?.bytes().await?;
        json::from_slice(&body)
    }
}

/// Path for toggling a like.
fn toggle_like_path(target: &LikeTarget) -> String {
    match target {
        LikeTarget::Post(id) => format!("/likes/post/{id}"),
        LikeTarget::Comment(id) => format!("/comments/{id}/like"),
    }
}

/// Path for reading a like count.
fn like_count_path(target: &LikeTarget) -> String {
    match target {
        LikeTarget::Post(id) => format!("/likes/post/{id}"),
        LikeTarget::Comment(id) => format!("/likes/comment/{id}"),
    }
}

/// Path for checking whether the viewer likes a target.
fn like_check_path(target: &LikeTarget) -> String {
    format!("{}/check", like_count_path(target))
}

impl InteractionClient for HttpClient {
    async fn toggle_like(&self, target: LikeTarget) -> Result<LikeStatus, ClientError> {
        Self::send_json(self.request(Method::POST, &toggle_like_path(&target))).await
    }

    async fn is_liked(&self, target: LikeTarget) -> Result<LikeStatus, ClientError> {
        Self::send_json(self.request(Method::GET, &like_check_path(&target))).await
    }

    async fn like_count(&self, target: LikeTarget) -> Result<u64, ClientError> {
        Self::send_json(self.request(Method::GET, &like_count_path(&target))).await
    }

    async fn comment_thread(&self, post_id: PostId) -> Result<Vec<Comment>, ClientError> {
        Self::send_json(self.request(Method::GET, &format!("/comments/post/{post_id}"))).await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, ClientError> {
        Self::send_json(self.request(Method::POST, "/comments").json(&comment)).await
    }

    async fn delete_post(&self, post_id: PostId) -> Result<(), ClientError> {
        Self::send(self.request(Method::DELETE, &format!("/posts/{post_id}"))).await.map(|_| ())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        Self::send_json(self.request(Method::GET, "/posts")).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, ClientError> {
        Self::send_json(self.request(Method::POST, "/posts").json(&post)).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        Self::send_json(self.request(Method::GET, "/users/profile")).await
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, ClientError> {
        let response: LoginResponse =
            Self::send_json(self.request(Method::POST, "/auth/login").json(&credentials)).await?;

        self.set_token(Some(response.access_token.clone()));
        let user = self.current_user().await?;
        tracing::info!(user = %user.id, "logged in");

        Ok(Session { token: response.access_token, user })
    }
}
