//! The observable state published by the lifecycle controller.

use crate::model::Post;

/// Either no error, or an error with a human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorRecord {
    #[default]
    None,
    Occurred(String),
}

impl ErrorRecord {
    pub fn happened(&self) -> bool {
        matches!(self, ErrorRecord::Occurred(_))
    }

    /// The stored message, or `""` when no error happened.
    pub fn msg(&self) -> &str {
        match self {
            ErrorRecord::None => "",
            ErrorRecord::Occurred(msg) => msg,
        }
    }
}

/// Snapshot of the controller's three pieces of state.
///
/// `cycle` counts fetch cycles; it is `0` before any subject was observed
/// and identifies which cycle the rest of the fields belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: ErrorRecord,
    pub cycle: u64,
}

/// Which of the three mutually exclusive views a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Error(&'a str),
    Loading,
    Content(&'a [Post]),
}

impl ViewState {
    /// State at the start of cycle `cycle`.
    pub fn pending(cycle: u64) -> Self {
        Self {
            posts: Vec::new(),
            loading: true,
            error: ErrorRecord::None,
            cycle,
        }
    }

    pub fn succeeded(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.loading = false;
        self.error = ErrorRecord::None;
    }

    /// Posts are left as they were; the error takes display priority.
    pub fn failed(&mut self, msg: String) {
        self.loading = false;
        self.error = ErrorRecord::Occurred(msg);
    }

    /// Error beats loading beats content.
    pub fn display(&self) -> View<'_> {
        if self.error.happened() {
            View::Error(self.error.msg())
        } else if self.loading {
            View::Loading
        } else {
            View::Content(&self.posts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64) -> Post {
        Post {
            id,
            title: format!("t{id}"),
            body: format!("b{id}"),
        }
    }

    #[test]
    fn idle_state_shows_empty_content() {
        let state = ViewState::default();
        assert!(!state.loading);
        assert!(!state.error.happened());
        assert_eq!(state.display(), View::Content(&[]));
    }

    #[test]
    fn pending_shows_loading() {
        let state = ViewState::pending(1);
        assert_eq!(state.display(), View::Loading);
        assert!(state.posts.is_empty());
    }

    #[test]
    fn failed_clears_loading_and_shows_error() {
        let mut state = ViewState::pending(1);
        state.failed("boom".into());
        assert!(!state.loading);
        assert_eq!(state.display(), View::Error("boom"));
    }

    #[test]
    fn error_beats_content() {
        let mut state = ViewState::pending(1);
        state.posts = vec![post(1)];
        state.failed("boom".into());
        assert_eq!(state.display(), View::Error("boom"));
    }

    #[test]
    fn error_beats_loading() {
        let state = ViewState {
            loading: true,
            error: ErrorRecord::Occurred("x".into()),
            ..ViewState::default()
        };
        assert_eq!(state.display(), View::Error("x"));
    }

    #[test]
    fn succeeded_replaces_posts_wholesale() {
        let mut state = ViewState::pending(1);
        state.posts = vec![post(9)];
        state.succeeded(vec![post(1), post(2)]);
        assert_eq!(state.posts, vec![post(1), post(2)]);
        assert_eq!(state.display(), View::Content(&[post(1), post(2)]));
    }

    #[test]
    fn no_error_record_has_empty_message() {
        assert!(!ErrorRecord::None.happened());
        assert_eq!(ErrorRecord::None.msg(), "");
        assert_eq!(ErrorRecord::Occurred("m".into()).msg(), "m");
    }
}
