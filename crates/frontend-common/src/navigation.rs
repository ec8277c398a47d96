//! Navigation side effects
//!
//! Only two places navigate on their own: logout, and the session-expiry
//! middleware reacting to a 401.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path);
    }
}

/// Records every navigation in order. Used by tests and the command line
/// frontend, where "navigating" means reporting where the user would go.
#[derive(Clone, Debug, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of navigations to `path`
    pub fn count(&self, path: &str) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| *p == path)
            .count()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocationNavigator;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::Navigator;
    use tracing::warn;

    /// Navigates by assigning `window.location`
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocationNavigator;

    impl Navigator for LocationNavigator {
        fn navigate(&self, path: &str) {
            let Some(window) = web_sys::window() else {
                warn!(path, "No window to navigate");
                return;
            };
            if let Err(e) = window.location().assign(path) {
                warn!(path, "Navigation failed: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_history_records_in_order() {
        let navigator = HistoryNavigator::new();
        navigator.navigate("/products");
        navigator.navigate("/login");
        navigator.navigate("/login");

        assert_eq!(navigator.history(), vec!["/products", "/login", "/login"]);
        assert_eq!(navigator.last().as_deref(), Some("/login"));
        assert_eq!(navigator.count("/login"), 2);
    }

    #[test]
    fn test_closures_are_navigators() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let navigator: Arc<dyn Navigator> = Arc::new(move |_: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        navigator.navigate("/login");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
