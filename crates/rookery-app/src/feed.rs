//! Feed state machine.
//!
//! This module defines the [`Feed`] state machine, which owns the session,
//! the list of [`PostView`]s, selection and input modes, completely decoupled
//! from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Resolves the viewer, then loads the feed and mounts one view per post.
//! - Routes post-scoped API completions to the owning view. Completions for
//!   posts no longer in the feed are dropped.
//! - Maps keys to post operations depending on focus and mode.
//! - Drops a post from the feed when its view reports it was deleted.

use rookery_client::{ClientError, CommentId, Credentials, NewPost, Post, PostId};

use crate::{
    AppAction, AppConfig, AppEvent, Focus, KeyInput, Mode, PostView, SessionState, TextInput,
};

/// Feed state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct Feed {
    config: AppConfig,
    session: SessionState,
    posts: Vec<PostView>,
    /// Feed listing request in flight.
    loading: bool,
    /// Index into `posts`. 0 when the feed is empty.
    selected: usize,
    focus: Focus,
    mode: Mode,
    /// Draft for a new post.
    post_draft: TextInput,
    creating_post: bool,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Error that must be acknowledged before input continues.
    alert: Option<String>,
}

impl Feed {
    /// Create an empty feed.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session: SessionState::Resolving,
            posts: Vec::new(),
            loading: false,
            selected: 0,
            focus: Focus::Posts,
            mode: Mode::Browse,
            post_draft: TextInput::new(),
            creating_post: false,
            terminal_size: (80, 24),
            status_message: None,
            alert: None,
        }
    }

    /// Resolve the viewer. With credentials a login is performed, otherwise
    /// the client's existing token is used. The feed loads once the session
    /// settles either way.
    pub fn start(&mut self, credentials: Option<Credentials>) -> Vec<AppAction> {
        self.session = SessionState::Resolving;
        let action = match credentials {
            Some(credentials) => AppAction::Login { credentials },
            None => AppAction::ResolveSession,
        };
        vec![action, AppAction::Render]
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        let actions = match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SessionStarted { user } => {
                tracing::info!(user_id = %user.id, "signed in");
                for view in &mut self.posts {
                    view.set_viewer(Some(user.id.clone()));
                }
                self.status_message = Some(format!("Signed in as {}", user.display_name()));
                self.session = SessionState::SignedIn(user);
                if matches!(self.mode, Mode::ConfirmDelete { .. }) {
                    self.mode = Mode::Browse;
                }
                self.refresh()
            },
            AppEvent::SessionFailed { error } => {
                tracing::info!(%error, "browsing anonymously");
                if !matches!(error, ClientError::Unauthorized(_)) {
                    self.status_message = Some(format!("Sign-in failed: {error}"));
                }
                self.session = SessionState::Anonymous;
                for view in &mut self.posts {
                    view.set_viewer(None);
                }
                if matches!(self.mode, Mode::ConfirmDelete { .. }) {
                    self.mode = Mode::Browse;
                }
                self.refresh()
            },
            AppEvent::FeedLoaded { posts } => self.replace_posts(posts),
            AppEvent::FeedFailed { error } => {
                tracing::warn!(%error, "failed to load feed");
                self.loading = false;
                self.status_message = Some(format!("Could not load feed: {error}"));
                vec![AppAction::Render]
            },
            AppEvent::PostCreated { post } => {
                tracing::debug!(post_id = %post.id, "post created");
                self.creating_post = false;
                self.post_draft.clear();
                if self.mode == Mode::ComposePost {
                    self.mode = Mode::Browse;
                }
                self.status_message = Some("Post published".into());
                self.refresh()
            },
            AppEvent::PostCreateFailed { error } => {
                tracing::warn!(%error, "failed to create post");
                self.creating_post = false;
                self.status_message = Some(format!("Could not publish post: {error}"));
                vec![AppAction::Render]
            },
            scoped => self.route(scoped),
        };
        self.clamp_focus();
        actions
    }

    fn route(&mut self, event: AppEvent) -> Vec<AppAction> {
        let Some(post_id) = event.post_id().cloned() else {
            return vec![];
        };
        let Some(index) = self.index_of(&post_id) else {
            tracing::debug!(%post_id, ?event, "dropping completion for unmounted post");
            return vec![];
        };

        self.note_completion(&event);
        let actions = self.posts[index].handle(event);
        if actions.iter().any(|action| matches!(action, AppAction::PostRemoved { .. })) {
            self.remove_post(&post_id);
        }
        actions
    }

    fn note_completion(&mut self, event: &AppEvent) {
        match event {
            AppEvent::LikeFailed { error, .. } => {
                self.status_message = Some(if error.is_unauthorized() {
                    "Sign in to like".to_owned()
                } else {
                    format!("Could not update like: {error}")
                });
            },
            AppEvent::ThreadFailed { error, .. } => {
                self.status_message = Some(format!("Could not load comments: {error}"));
            },
            AppEvent::CommentCreated { post_id, .. } => {
                if matches!(&self.mode, Mode::ComposeComment { post_id: composing } if composing == post_id)
                {
                    self.mode = Mode::Browse;
                }
                self.status_message = Some("Comment posted".into());
            },
            AppEvent::CommentFailed { error, .. } => {
                self.status_message = Some(format!("Could not post comment: {error}"));
            },
            AppEvent::DeleteFailed { error, .. } => {
                self.alert = Some(format!("Failed to delete post: {error}"));
            },
            AppEvent::PostDeleted { .. } => {
                self.status_message = Some("Post deleted".into());
            },
            _ => {},
        }
    }

    fn replace_posts(&mut self, posts: Vec<Post>) -> Vec<AppAction> {
        self.loading = false;
        let viewer = self.session.user().map(|user| user.id.clone());
        let selected_id = self.selected_post().map(|view| view.id().clone());

        let mut previous = std::mem::take(&mut self.posts);
        let mut actions = Vec::with_capacity(posts.len() + 1);
        for post in posts {
            if self.index_of(&post.id).is_some() {
                tracing::debug!(post_id = %post.id, "skipping duplicate post in listing");
                continue;
            }
            let mut view = match previous.iter().position(|view| view.id() == &post.id) {
                Some(at) => {
                    let mut view = previous.swap_remove(at);
                    view.refresh(post);
                    view
                },
                None => PostView::new(post, viewer.clone(), &self.config.share_base_url),
            };
            actions.extend(view.mount());
            self.posts.push(view);
        }

        self.selected = selected_id
            .and_then(|id| self.index_of(&id))
            .unwrap_or(0)
            .min(self.posts.len().saturating_sub(1));
        self.drop_stale_mode();
        actions.push(AppAction::Render);
        actions
    }

    fn remove_post(&mut self, post_id: &PostId) {
        let Some(index) = self.index_of(post_id) else {
            return;
        };
        self.posts.remove(index);
        if index < self.selected || self.selected >= self.posts.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        if index == self.selected || self.posts.is_empty() {
            self.focus = Focus::Posts;
        }
        self.drop_stale_mode();
    }

    /// Leave any mode that refers to a post no longer in the feed.
    fn drop_stale_mode(&mut self) {
        let stale = match &self.mode {
            Mode::ComposeComment { post_id } | Mode::ConfirmDelete { post_id } => {
                self.index_of(post_id).is_none()
            },
            Mode::Browse | Mode::ComposePost => false,
        };
        if stale {
            self.mode = Mode::Browse;
        }
    }

    fn clamp_focus(&mut self) {
        if let Focus::Thread { row } = self.focus {
            let rows = self.selected_post().map_or(0, |view| view.visible_rows().len());
            self.focus = if rows == 0 { Focus::Posts } else { Focus::Thread { row: row.min(rows - 1) } };
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.alert.is_some() {
            return self.dismiss_alert();
        }
        match self.mode.clone() {
            Mode::Browse => self.handle_browse_key(key),
            Mode::ComposeComment { post_id } => self.handle_comment_key(&post_id, key),
            Mode::ComposePost => self.handle_post_key(key),
            Mode::ConfirmDelete { .. } => match key {
                KeyInput::Char('y' | 'Y') | KeyInput::Enter => self.confirm_delete(),
                _ => self.cancel(),
            },
        }
    }

    fn handle_browse_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char('q') => self.quit(),
            KeyInput::Esc => match self.focus {
                Focus::Thread { .. } => {
                    self.focus = Focus::Posts;
                    vec![AppAction::Render]
                },
                Focus::Posts => self.quit(),
            },
            KeyInput::Up | KeyInput::Char('k') => self.select_previous(),
            KeyInput::Down | KeyInput::Char('j') => self.select_next(),
            KeyInput::Tab => self.toggle_focus(),
            KeyInput::Char('l') => self.toggle_like(),
            KeyInput::Char('c') => self.toggle_comments(),
            KeyInput::Char('r') => match self.focus {
                Focus::Thread { .. } => self.reply(),
                Focus::Posts => self.compose_comment(),
            },
            KeyInput::Char('i') => self.compose_comment(),
            KeyInput::Char('n') => self.compose_post(),
            KeyInput::Char('d') => self.request_delete(),
            KeyInput::Char('s') => self.share(),
            KeyInput::Char('R') => self.refresh(),
            _ => vec![],
        }
    }

    fn handle_comment_key(&mut self, post_id: &PostId, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Enter => self.submit(),
            KeyInput::Esc => self.cancel(),
            other => {
                let edited = self.view_mut(post_id).is_some_and(|view| view.draft_mut().edit(other));
                if edited { vec![AppAction::Render] } else { vec![] }
            },
        }
    }

    fn handle_post_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Enter => self.submit(),
            KeyInput::Esc => self.cancel(),
            other => {
                if self.post_draft.edit(other) { vec![AppAction::Render] } else { vec![] }
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Refetch the feed listing.
    pub fn refresh(&mut self) -> Vec<AppAction> {
        if self.loading {
            return vec![AppAction::Render];
        }
        self.loading = true;
        vec![AppAction::LoadFeed, AppAction::Render]
    }

    /// Move the selection down, through posts or thread rows.
    pub fn select_next(&mut self) -> Vec<AppAction> {
        match self.focus {
            Focus::Posts => {
                if self.selected + 1 < self.posts.len() {
                    self.selected += 1;
                }
            },
            Focus::Thread { row } => self.focus = Focus::Thread { row: row + 1 },
        }
        self.clamp_focus();
        vec![AppAction::Render]
    }

    /// Move the selection up, through posts or thread rows.
    pub fn select_previous(&mut self) -> Vec<AppAction> {
        match self.focus {
            Focus::Posts => self.selected = self.selected.saturating_sub(1),
            Focus::Thread { row } => self.focus = Focus::Thread { row: row.saturating_sub(1) },
        }
        vec![AppAction::Render]
    }

    /// Select a post by id. Unknown ids are ignored.
    pub fn select_post(&mut self, post_id: &PostId) {
        if let Some(index) = self.index_of(post_id) {
            self.selected = index;
            self.focus = Focus::Posts;
        }
    }

    /// Move focus between the feed and the selected post's visible thread.
    pub fn toggle_focus(&mut self) -> Vec<AppAction> {
        self.focus = match self.focus {
            Focus::Thread { .. } => Focus::Posts,
            Focus::Posts => Focus::Thread { row: 0 },
        };
        self.clamp_focus();
        vec![AppAction::Render]
    }

    /// Toggle the like on the focused post or comment.
    pub fn toggle_like(&mut self) -> Vec<AppAction> {
        let comment_id = self.selected_comment_id();
        let Some(view) = self.selected_post_mut() else {
            return vec![];
        };
        match comment_id {
            Some(comment_id) => view.toggle_comment_like(&comment_id),
            None => view.toggle_like(),
        }
    }

    /// Show or hide the selected post's comments.
    pub fn toggle_comments(&mut self) -> Vec<AppAction> {
        self.focus = Focus::Posts;
        match self.selected_post_mut() {
            Some(view) => view.toggle_comments(),
            None => vec![],
        }
    }

    /// Start a top-level comment on the selected post. An existing draft and
    /// reply target are kept.
    pub fn compose_comment(&mut self) -> Vec<AppAction> {
        let Some(post_id) = self.selected_post().map(|view| view.id().clone()) else {
            return vec![];
        };
        self.mode = Mode::ComposeComment { post_id };
        vec![AppAction::Render]
    }

    /// Reply to the focused comment.
    pub fn reply(&mut self) -> Vec<AppAction> {
        let Some(comment_id) = self.selected_comment_id() else {
            return self.compose_comment();
        };
        let Some(view) = self.selected_post_mut() else {
            return vec![];
        };
        if !view.set_reply_target(&comment_id) {
            return vec![];
        }
        let post_id = view.id().clone();
        self.mode = Mode::ComposeComment { post_id };
        vec![AppAction::Render]
    }

    /// Start writing a new post.
    pub fn compose_post(&mut self) -> Vec<AppAction> {
        self.mode = Mode::ComposePost;
        vec![AppAction::Render]
    }

    /// Submit whatever is being composed.
    pub fn submit(&mut self) -> Vec<AppAction> {
        match self.mode.clone() {
            Mode::ComposeComment { post_id } => {
                let Some(view) = self.view_mut(&post_id) else {
                    return vec![];
                };
                if view.draft().is_blank() {
                    self.status_message = Some("Comment cannot be empty".into());
                    return vec![AppAction::Render];
                }
                let actions = view.submit_comment();
                if !actions.is_empty() {
                    self.status_message = Some("Posting comment...".into());
                }
                actions
            },
            Mode::ComposePost => {
                if self.post_draft.is_blank() {
                    self.status_message = Some("Post cannot be empty".into());
                    return vec![AppAction::Render];
                }
                if self.creating_post {
                    return vec![];
                }
                self.creating_post = true;
                self.status_message = Some("Publishing...".into());
                let post = NewPost {
                    title: String::new(),
                    content: self.post_draft.text().trim().to_owned(),
                    image_url: None,
                };
                vec![AppAction::CreatePost { post }, AppAction::Render]
            },
            Mode::Browse | Mode::ConfirmDelete { .. } => vec![],
        }
    }

    /// Back out of the current mode. While replying, the first cancel only
    /// drops the reply target and keeps the draft.
    pub fn cancel(&mut self) -> Vec<AppAction> {
        if let Mode::ComposeComment { post_id } = self.mode.clone() {
            if let Some(view) = self.view_mut(&post_id) {
                if view.reply_target().is_some() {
                    view.clear_reply_target();
                    return vec![AppAction::Render];
                }
            }
        }
        self.mode = Mode::Browse;
        vec![AppAction::Render]
    }

    /// Ask for confirmation before deleting the selected post. Only offered
    /// to its author.
    pub fn request_delete(&mut self) -> Vec<AppAction> {
        let Some(view) = self.selected_post() else {
            return vec![];
        };
        if !view.can_delete() {
            self.status_message = Some("Only the author can delete this post".into());
            return vec![AppAction::Render];
        }
        self.mode = Mode::ConfirmDelete { post_id: view.id().clone() };
        vec![AppAction::Render]
    }

    /// Delete the post awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Vec<AppAction> {
        let Mode::ConfirmDelete { post_id } = self.mode.clone() else {
            return vec![];
        };
        self.mode = Mode::Browse;
        let actions = match self.view_mut(&post_id) {
            Some(view) => view.confirm_delete(),
            None => vec![],
        };
        if !actions.is_empty() {
            self.status_message = Some("Deleting post...".into());
        }
        actions
    }

    /// Copy the selected post's link.
    pub fn share(&self) -> Vec<AppAction> {
        self.selected_post().map(PostView::share).unwrap_or_default()
    }

    /// Dismiss the alert popup.
    pub fn dismiss_alert(&mut self) -> Vec<AppAction> {
        self.alert = None;
        vec![AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    fn index_of(&self, post_id: &PostId) -> Option<usize> {
        self.posts.iter().position(|view| view.id() == post_id)
    }

    fn view_mut(&mut self, post_id: &PostId) -> Option<&mut PostView> {
        self.posts.iter_mut().find(|view| view.id() == post_id)
    }

    fn selected_post_mut(&mut self) -> Option<&mut PostView> {
        self.posts.get_mut(self.selected)
    }

    fn selected_comment_id(&self) -> Option<CommentId> {
        let Focus::Thread { row } = self.focus else {
            return None;
        };
        let view = self.selected_post()?;
        view.visible_rows().get(row).map(|row| row.comment.id.clone())
    }

    /// Application config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Posts in feed order.
    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    /// View for a post in the feed.
    pub fn post(&self, post_id: &PostId) -> Option<&PostView> {
        self.posts.iter().find(|view| view.id() == post_id)
    }

    /// Index of the selected post.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected post. `None` if the feed is empty.
    pub fn selected_post(&self) -> Option<&PostView> {
        self.posts.get(self.selected)
    }

    /// Selection focus.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Input mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Feed listing request in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Draft for a new post.
    pub fn post_draft(&self) -> &TextInput {
        &self.post_draft
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Pending alert. `None` if nothing needs acknowledging.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }
}
