use chrono::Local;
use ratatui::widgets::ListState;
use tokio::sync::watch;
use tracing::debug;

use crate::lifecycle::PostsController;
use crate::model::User;
use crate::state::{View, ViewState};

pub struct App {
    /// Users the viewer can switch between.
    pub users: Vec<User>,
    /// Index into `users` of the user being shown.
    pub selected_user: usize,
    controller: PostsController,
    updates: watch::Receiver<ViewState>,
    /// Latest state pulled from the controller.
    pub view: ViewState,
    /// Selection within the post list.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// One-line summary of the latest transition.
    pub status: String,
}

impl App {
    /// Build the app and start fetching posts for the first user, if any.
    pub fn new(users: Vec<User>, controller: PostsController) -> Self {
        let updates = controller.subscribe();
        let mut app = Self {
            users,
            selected_user: 0,
            controller,
            updates,
            view: ViewState::default(),
            list_state: ListState::default(),
            quit: false,
            status: "No users configured".into(),
        };
        app.select_user(0);
        app.sync();
        app
    }

    pub fn current_user(&self) -> Option<&User> {
        self.controller.subject()
    }

    /// Pull the latest controller state.  Returns `true` if it changed.
    pub fn sync(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let latest = self.updates.borrow_and_update().clone();
        if latest.cycle != self.view.cycle {
            self.list_state = ListState::default();
        }
        self.view = latest;
        self.status = self.describe();
        debug!(cycle = self.view.cycle, status = %self.status, "view updated");
        true
    }

    fn describe(&self) -> String {
        let name = self.current_user().map(|u| u.name.as_str()).unwrap_or("nobody");
        match self.view.display() {
            View::Error(msg) => format!("Error: {msg}"),
            View::Loading => format!("Loading posts for {name}…"),
            View::Content(posts) => format!(
                "Fetched {} posts for {name} at {}",
                posts.len(),
                Local::now().format("%H:%M:%S")
            ),
        }
    }

    // -- user switching ------------------------------------------------------

    /// Show the user at `index`.  Re-selecting the current user is a no-op.
    pub fn select_user(&mut self, index: usize) {
        let Some(user) = self.users.get(index) else {
            return;
        };
        self.selected_user = index;
        self.controller.observe(user.clone());
    }

    pub fn next_user(&mut self) {
        if !self.users.is_empty() {
            self.select_user((self.selected_user + 1) % self.users.len());
        }
    }

    pub fn previous_user(&mut self) {
        if !self.users.is_empty() {
            let len = self.users.len();
            self.select_user((self.selected_user + len - 1) % len);
        }
    }

    // -- post navigation -----------------------------------------------------

    fn post_count(&self) -> usize {
        match self.view.display() {
            View::Content(posts) => posts.len(),
            _ => 0,
        }
    }

    pub fn select_next(&mut self) {
        let count = self.post_count();
        if count == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.post_count() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.post_count() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let count = self.post_count();
        if count > 0 {
            self.list_state.select(Some(count - 1));
        }
    }

    /// Abandon any in-flight fetch.
    pub fn shutdown(&mut self) {
        self.controller.dispose();
    }
}
