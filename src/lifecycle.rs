//! Request lifecycle controller.
//!
//! Owns the posts, the loading flag, and the error record for whichever
//! [`User`] was observed last.  Each change of user starts a *cycle*:
//!
//! 1. the previous cycle's token is cancelled and the state is reset to
//!    [`ViewState::pending`], synchronously, inside [`PostsController::observe`];
//! 2. one task is spawned that issues `GET <base>/users/<id>/posts`;
//! 3. when the call settles the outcome is classified into success or
//!    failure;
//! 4. the terminal state is written only if the cycle's token is still live.
//!
//! The in-flight request is never aborted.  A superseded cycle runs to
//! completion and its result is simply dropped.
//!
//! State is published through a [`watch`] channel.  Renderers hold a
//! receiver and pull the latest [`ViewState`] whenever it changes.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::model::{posts_url, Post, User};
use crate::source::Transport;
use crate::state::ViewState;

pub struct PostsController {
    runtime: Handle,
    transport: Arc<dyn Transport>,
    base_url: String,
    state: Arc<watch::Sender<ViewState>>,
    subject: Option<User>,
    cycle: u64,
    token: CancellationToken,
}

impl PostsController {
    /// Create an idle controller.  Cycles are spawned on `runtime`.
    pub fn new(runtime: Handle, transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            runtime,
            transport,
            base_url: base_url.into(),
            state: Arc::new(state),
            subject: None,
            cycle: 0,
            token: CancellationToken::new(),
        }
    }

    /// Start a cycle for `subject` unless it equals the current subject.
    ///
    /// Returns whether a new cycle (and so a network call) was started.
    pub fn observe(&mut self, subject: User) -> bool {
        if self.subject.as_ref() == Some(&subject) {
            return false;
        }

        self.token.cancel();
        self.token = CancellationToken::new();
        self.cycle += 1;
        let cycle = self.cycle;
        self.state.send_modify(|state| *state = ViewState::pending(cycle));

        let url = posts_url(&self.base_url, subject.id);
        debug!(cycle, user = subject.id, %url, transport = self.transport.name(), "starting fetch cycle");
        self.subject = Some(subject);

        self.runtime.spawn(run_cycle(
            self.transport.clone(),
            url,
            cycle,
            self.token.clone(),
            self.state.clone(),
        ));
        true
    }

    /// Abandon the current cycle.  Its settlement will not touch the state,
    /// and observing the same subject again starts a fresh cycle.
    pub fn dispose(&mut self) {
        if !self.token.is_cancelled() {
            debug!(cycle = self.cycle, "disposing controller");
        }
        self.token.cancel();
        self.subject = None;
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subject(&self) -> Option<&User> {
        self.subject.as_ref()
    }
}

impl Drop for PostsController {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Body of one cycle's task.
async fn run_cycle(
    transport: Arc<dyn Transport>,
    url: String,
    cycle: u64,
    token: CancellationToken,
    state: Arc<watch::Sender<ViewState>>,
) {
    let outcome = fetch_posts(transport.as_ref(), &url).await;

    // The staleness check and the write share the channel's write lock, so a
    // reset in `observe` either happens before (and we skip) or after (and
    // overwrites us).
    let applied = state.send_if_modified(|view| {
        if token.is_cancelled() {
            return false;
        }
        match outcome {
            Ok(posts) => {
                info!(cycle, %url, count = posts.len(), "posts fetched");
                view.succeeded(posts);
            }
            Err(err) => {
                warn!(cycle, %url, error = %err, "fetch failed");
                view.failed(err.to_string());
            }
        }
        true
    });

    if !applied {
        debug!(cycle, %url, "cycle superseded; settlement discarded");
    }
}

/// Fetch and classify.  A failure status short-circuits before the body is
/// read.
pub async fn fetch_posts(transport: &dyn Transport, url: &str) -> Result<Vec<Post>, FetchError> {
    let reply = transport.get(url).await?;
    if !reply.ok() {
        return Err(FetchError::Status {
            status: reply.status(),
            status_text: reply.status_text().to_string(),
        });
    }
    let body = reply.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
