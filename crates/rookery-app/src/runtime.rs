//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`Feed`]: UI state machine
//! - [`Bridge`]: API bridge to the client
//! - [`Driver`]: Platform-specific I/O
//!
//! Every API request runs as its own tokio task so the UI keeps handling
//! input while requests are in flight. Completions come back over a channel
//! and are applied one at a time on the runtime's task, so state machines
//! never see concurrent mutation. Completions may arrive in any order.

use rookery_client::{Credentials, InteractionClient};
use tokio::sync::mpsc;

use crate::{AppAction, AppEvent, Bridge, Driver, Feed};

/// Generic runtime that orchestrates Feed, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `C`: Remote API client
pub struct Runtime<D, C>
where
    D: Driver,
    C: InteractionClient,
{
    driver: D,
    feed: Feed,
    bridge: Bridge<C>,
    credentials: Option<Credentials>,
    completions_tx: mpsc::UnboundedSender<Option<AppEvent>>,
    completions_rx: mpsc::UnboundedReceiver<Option<AppEvent>>,
    in_flight: usize,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: InteractionClient,
{
    /// Create a new runtime around a feed, a driver and a client.
    pub fn new(driver: D, feed: Feed, client: C) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            driver,
            feed,
            bridge: Bridge::new(client),
            credentials: None,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    /// Log in with credentials at startup instead of resolving the client's
    /// existing token.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Run the main event loop until the feed asks to quit or the driver
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.feed)?;
        if self.start()? {
            return Ok(());
        }

        loop {
            let should_quit = tokio::select! {
                biased;

                Some(completion) = self.completions_rx.recv() => self.complete(completion)?,
                event = self.driver.poll_event() => match event? {
                    Some(event) => self.dispatch(event)?,
                    None => false,
                },
            };
            if should_quit {
                return Ok(());
            }
        }
    }

    /// Issue the startup actions.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn start(&mut self) -> Result<bool, D::Error> {
        let actions = self.feed.start(self.credentials.take());
        self.process_actions(actions)
    }

    /// Feed one event into the state machine and execute what it asks for.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.feed.handle(event);
        self.process_actions(actions)
    }

    /// Wait for every in-flight request, including ones issued while
    /// waiting, and apply their completions.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub async fn settle(&mut self) -> Result<bool, D::Error> {
        while self.in_flight > 0 {
            let Some(completion) = self.completions_rx.recv().await else {
                break;
            };
            if self.complete(completion)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Requests issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn complete(&mut self, completion: Option<AppEvent>) -> Result<bool, D::Error> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Some(event) => self.dispatch(event),
            None => Ok(false),
        }
    }

    /// Process actions returned by the Feed.
    ///
    /// Renders are coalesced into one draw after the batch.
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut render = false;

        for action in actions {
            match action {
                AppAction::Render => render = true,
                AppAction::Quit => return Ok(true),
                AppAction::CopyToClipboard { text } => {
                    match self.driver.copy_to_clipboard(&text) {
                        Ok(()) => self.feed.set_status("Link copied to clipboard"),
                        Err(e) => {
                            tracing::warn!("Failed to copy to clipboard: {e}");
                            self.feed.set_status(format!("Link: {text}"));
                        },
                    }
                    render = true;
                },
                AppAction::PostRemoved { post_id } => {
                    tracing::info!(%post_id, "post removed from feed");
                },

                // API operations go through the bridge
                request => self.spawn_request(request),
            }
        }

        if render {
            self.driver.render(&self.feed)?;
        }
        Ok(false)
    }

    fn spawn_request(&mut self, action: AppAction) {
        tracing::debug!(?action, "spawning request");
        let bridge = self.bridge.clone();
        let completions = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let completion = bridge.execute(action).await;
            if completions.send(completion).is_err() {
                tracing::debug!("runtime stopped, dropping completion");
            }
        });
    }

    /// Get a reference to the Feed
    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Get a mutable reference to the Feed
    pub fn feed_mut(&mut self) -> &mut Feed {
        &mut self.feed
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Underlying API client.
    pub fn client(&self) -> &C {
        self.bridge.client()
    }
}
