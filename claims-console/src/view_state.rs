use crate::error::{ConsoleError, Result};

/// What a screen shows. Exactly one state at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Fetch succeeded with nothing to show; rendered as a call to action, not an error.
    Empty,
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn failed(err: &ConsoleError) -> Self {
        LoadState::Failed(err.user_message())
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => Self::failed(&err),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(value) => LoadState::Loaded(f(value)),
            LoadState::Empty => LoadState::Empty,
            LoadState::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// An empty collection becomes [`LoadState::Empty`].
    pub fn from_list(result: Result<Vec<T>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => LoadState::Empty,
            other => Self::from_result(other),
        }
    }
}
