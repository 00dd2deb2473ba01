//! Catalog UI
//!
//! Front end for a library catalog: search books, list them in a table, add
//! a book and delete a book, with the mutating actions reserved to
//! superusers. Views are headless state machines driven by the console front
//! end; all data comes from the catalog API through [`api::CatalogService`].

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use api::CatalogService;
use models::BooksPage;
use services::{Notifier, QueryCache, Session};

/// Shared state handed to every view
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn CatalogService>,
    pub books_cache: Arc<QueryCache<BooksPage>>,
    pub session: Session,
    pub notifier: Notifier,
}

impl AppContext {
    /// Build a context with an empty cache and an anonymous session
    pub fn new(config: AppConfig, catalog: Arc<dyn CatalogService>, notifier: Notifier) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            books_cache: Arc::new(QueryCache::new()),
            session: Session::anonymous(),
            notifier,
        }
    }

    /// Page size used by every book search
    pub fn page_size(&self) -> i64 {
        self.config.search.effective_page_size()
    }
}
