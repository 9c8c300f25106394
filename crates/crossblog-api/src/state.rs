use std::sync::Arc;

use crossblog_core::repository::RepositoryFactory;

/// Shared application state
///
/// Holds the repository factory only; the unit of work itself is opened per
/// request.
pub struct AppState<F> {
    factory: Arc<F>,
}

impl<F: RepositoryFactory> AppState<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Open a repository for one request
    pub fn repository(&self) -> F::Repository {
        self.factory.open()
    }
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}
